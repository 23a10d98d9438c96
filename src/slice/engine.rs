//! Slicing round driver
//!
//! Owns the round state, the timers and the reporter. The host calls
//! `advance` once per frame with the wall-clock delta and forwards pointer
//! events; everything else (spawn cadence, countdown, round end, the score
//! handoff) happens in here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{SwipeOutcome, resolve_swipe};
use super::physics::{self, clamp_dt};
use super::spawn::spawn_object;
use super::state::{EndReason, SlicePhase, SliceState};
use crate::config::SliceConfig;
use crate::error::ConfigError;
use crate::report::ScoreReporter;
use crate::schedule::{Fired, Scheduler};

/// Timers owned by a slicing round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceTimer {
    Spawn,
    Countdown,
}

/// Countdown tick length (ms)
const COUNTDOWN_MS: f64 = 1000.0;

/// A slicing game instance
#[derive(Debug)]
pub struct SliceEngine {
    config: SliceConfig,
    state: SliceState,
    scheduler: Scheduler<SliceTimer>,
    rng: Pcg32,
    reporter: ScoreReporter,
}

impl SliceEngine {
    /// Validate the config and start the first round
    pub fn new(
        config: SliceConfig,
        reporter: ScoreReporter,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = SliceState::new(config.round_seconds, config.play_width, config.play_height);
        let mut engine = Self {
            config,
            state,
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            reporter,
        };
        engine.start_timers();
        log::info!(
            "Slice round started ({}s, seed {})",
            engine.config.round_seconds,
            seed
        );
        Ok(engine)
    }

    /// Read-only view for drawing
    pub fn state(&self) -> &SliceState {
        &self.state
    }

    /// Frame snapshot for a JS or remote renderer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.state)
    }

    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    pub fn reporter(&self) -> &ScoreReporter {
        &self.reporter
    }

    pub fn phase(&self) -> SlicePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.state.time_remaining
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.state.end_reason
    }

    /// Whether the final score unlocks the end-of-round reveal
    pub fn reveal_unlocked(&self) -> bool {
        self.state.score >= self.config.reveal_threshold
    }

    /// Engine clock (ms)
    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Timers still scheduled for this round
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Play area changed (window resize). Degenerate sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if usable(width) && usable(height) {
            self.state.width = width;
            self.state.height = height;
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        if !self.state.is_playing() {
            return;
        }
        let now = self.now_ms();
        self.state.trail.press(pos, now);
    }

    /// Pointer moved: test the swept segment and resolve hits
    pub fn pointer_move(&mut self, pos: Vec2) -> SwipeOutcome {
        if !self.state.is_playing() {
            return SwipeOutcome::default();
        }
        let now = self.now_ms();
        let Some((a, b)) = self.state.trail.drag(pos, now, self.config.trail_window_ms) else {
            return SwipeOutcome::default();
        };

        let outcome = resolve_swipe(&mut self.state, &self.config, a, b, now);
        if !outcome.targets.is_empty() {
            log::debug!(
                "Sliced {} target(s), score {}",
                outcome.targets.len(),
                self.state.score
            );
        }
        if outcome.hazard.is_some() {
            self.end_round(EndReason::Hazard);
        }
        outcome
    }

    pub fn pointer_up(&mut self) {
        self.state.trail.release();
    }

    /// Advance by one host frame (`dt` in seconds)
    pub fn advance(&mut self, dt: f32) {
        if !self.state.is_playing() {
            return;
        }

        let dt_ms = if dt.is_finite() { dt.max(0.0) as f64 * 1000.0 } else { 0.0 };
        for fired in self.scheduler.advance(dt_ms) {
            self.handle_timer(fired);
        }

        if !self.state.is_playing() {
            return;
        }
        let now = self.now_ms();
        physics::step(
            &mut self.state,
            &self.config,
            clamp_dt(dt, self.config.max_frame_dt),
            now,
        );
        self.state.trail.prune(now, self.config.trail_window_ms);
    }

    /// Start a fresh round. Timers of the previous round are cancelled first.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();

        let (width, height) = (self.state.width, self.state.height);
        self.state = SliceState::new(self.config.round_seconds, width, height);
        self.reporter.rearm();
        self.start_timers();
        log::info!("Slice round reset");
    }

    fn start_timers(&mut self) {
        let spawn_ms = self.config.spawn_interval_ms as f64;
        self.scheduler.every(SliceTimer::Spawn, spawn_ms);
        self.scheduler.every(SliceTimer::Countdown, COUNTDOWN_MS);
    }

    fn handle_timer(&mut self, fired: Fired<SliceTimer>) {
        // Fires from a cancelled batch, or after the round ended, are dropped
        if !self.scheduler.is_current(&fired) || !self.state.is_playing() {
            log::trace!("Dropping stale {:?} timer", fired.kind);
            return;
        }

        match fired.kind {
            SliceTimer::Spawn => {
                let now = self.now_ms();
                spawn_object(&mut self.state, &mut self.rng, &self.config, now);
            }
            SliceTimer::Countdown => {
                self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
                if self.state.time_remaining == 0 {
                    self.end_round(EndReason::Time);
                }
            }
        }
    }

    /// Single-fire transition out of `Playing`. Returns false if already over.
    fn end_round(&mut self, reason: EndReason) -> bool {
        if !self.state.is_playing() {
            return false;
        }

        self.state.phase = SlicePhase::Over;
        self.state.end_reason = Some(reason);
        self.state.trail.release();
        self.scheduler.cancel_all();
        // The frame freezes here; sliced objects must not linger in it
        self.state.objects.retain(|o| !o.consumed);

        log::info!(
            "Slice round over ({:?}), score {}",
            reason,
            self.state.score
        );
        self.reporter.report(self.state.score);
        true
    }
}
