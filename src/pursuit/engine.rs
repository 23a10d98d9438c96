//! Pursuit round driver
//!
//! Movement runs on a fixed tick owned by the engine's scheduler. After each
//! tick the player collects, then capture is checked, then the win. Capture
//! wins a tie: taking the last bean on the same tick as being caught is a
//! loss.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::grid::Grid;
use super::movement::{Direction, bean_value, step_player, step_pursuer};
use super::state::{PursuitPhase, PursuitState};
use crate::config::PursuitConfig;
use crate::error::LayoutError;
use crate::report::ScoreReporter;
use crate::schedule::{Fired, Scheduler};

/// Timers owned by a pursuit round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuitTimer {
    Move,
}

/// A pursuit game instance
#[derive(Debug)]
pub struct PursuitEngine {
    config: PursuitConfig,
    /// Freshly generated grid, copied for every round
    template: Grid,
    state: PursuitState,
    scheduler: Scheduler<PursuitTimer>,
    rng: Pcg32,
    reporter: ScoreReporter,
}

impl PursuitEngine {
    /// Validate the config and build the grid. The round waits in
    /// `Instructions` until `start`.
    pub fn new(
        config: PursuitConfig,
        reporter: ScoreReporter,
        seed: u64,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        let template =
            Grid::generate(&config.layout, config.player_start, &config.pursuer_starts)?;
        let state =
            PursuitState::new(template.clone(), config.player_start, &config.pursuer_starts);

        log::info!(
            "Pursuit grid {}x{} with {} beans, {} pursuers",
            template.width(),
            template.height(),
            template.collectibles_remaining(),
            config.pursuer_starts.len()
        );
        Ok(Self {
            config,
            template,
            state,
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            reporter,
        })
    }

    pub fn state(&self) -> &PursuitState {
        &self.state
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.state)
    }

    pub fn config(&self) -> &PursuitConfig {
        &self.config
    }

    pub fn reporter(&self) -> &ScoreReporter {
        &self.reporter
    }

    pub fn phase(&self) -> PursuitPhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    /// Score including the win bonus, fixed when the round ends
    pub fn final_score(&self) -> Option<u64> {
        self.state.final_score
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Begin a round from the instructions or the reveal screen.
    ///
    /// Returns false (and changes nothing) from any other phase.
    pub fn start(&mut self) -> bool {
        if !matches!(self.state.phase, PursuitPhase::Instructions | PursuitPhase::Reveal) {
            log::debug!("Ignoring start in {:?}", self.state.phase);
            return false;
        }

        self.scheduler.cancel_all();
        self.state = PursuitState::new(
            self.template.clone(),
            self.config.player_start,
            &self.config.pursuer_starts,
        );
        self.state.phase = PursuitPhase::Playing;
        self.state.round_start_ms = self.now_ms();
        self.reporter.rearm();
        let tick_ms = self.config.tick_ms as f64;
        self.scheduler.every(PursuitTimer::Move, tick_ms);

        log::info!("Pursuit round started");
        true
    }

    /// Queue a turn (last write wins). Ignored outside `Playing`.
    pub fn queue_direction(&mut self, dir: Direction) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.state.player.queued = Some(dir);
        true
    }

    /// Keyboard input by key name
    pub fn key(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(dir) => self.queue_direction(dir),
            None => false,
        }
    }

    /// Touch swipe input by total displacement
    pub fn swipe(&mut self, dx: f32, dy: f32) -> bool {
        match Direction::from_swipe(dx, dy, self.config.swipe_threshold) {
            Some(dir) => self.queue_direction(dir),
            None => false,
        }
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
    }

    /// Leave the win/over screen for the reveal
    pub fn reveal(&mut self) -> bool {
        if !self.state.phase.is_terminal() {
            return false;
        }
        self.state.phase = PursuitPhase::Reveal;
        true
    }

    fn handle_timer(&mut self, fired: Fired<PursuitTimer>) {
        if !self.scheduler.is_current(&fired) || !self.state.is_playing() {
            log::trace!("Dropping stale {:?} timer", fired.kind);
            return;
        }
        match fired.kind {
            PursuitTimer::Move => self.tick(),
        }
    }

    /// One movement tick followed by collection and end checks
    fn tick(&mut self) {
        if !self.state.is_playing() {
            return;
        }

        step_player(&self.state.grid, &mut self.state.player);
        for pursuer in self.state.pursuers.iter_mut() {
            *pursuer = step_pursuer(&self.state.grid, *pursuer, &mut self.rng);
        }

        let cell = self.state.player.cell;
        if self.state.grid.collect(cell) {
            let elapsed = (self.now_ms() - self.state.round_start_ms) / 1000.0;
            let value = bean_value(
                elapsed,
                self.config.bean_base_value,
                self.config.bean_decay_divisor,
            );
            self.state.score += value as u64;
            log::debug!(
                "Bean at {} worth {}, {} left",
                cell,
                value,
                self.state.collectibles_remaining()
            );
        }

        if self.state.player_caught() {
            self.finish(false);
        } else if self.state.collectibles_remaining() == 0 {
            self.finish(true);
        }
    }

    /// Single-fire transition out of `Playing`
    fn finish(&mut self, won: bool) -> bool {
        if !self.state.is_playing() {
            return false;
        }

        let bonus = if won { self.config.win_bonus } else { 0 };
        let final_score = self.state.score + bonus;
        self.state.phase = if won { PursuitPhase::Win } else { PursuitPhase::Over };
        self.state.won = won;
        self.state.final_score = Some(final_score);
        self.scheduler.cancel_all();

        log::info!(
            "Pursuit round {} with {} points (final {})",
            if won { "won" } else { "lost" },
            self.state.score,
            final_score
        );
        self.reporter.report(final_score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pursuit::grid::Tile;
    use crate::report::tests::{SpyLeaderboard, spy_reporter};
    use glam::IVec2;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Slightly over one tick; 0.11f32 rounds to just under 110 ms
    const TICK: f32 = 0.1105;

    /// Open room on the left, pursuer sealed in a cell on the right
    fn room_config() -> PursuitConfig {
        PursuitConfig {
            layout: vec![
                "1111111".into(),
                "1000101".into(),
                "1000111".into(),
                "1111111".into(),
            ],
            player_start: IVec2::new(1, 2),
            pursuer_starts: vec![IVec2::new(5, 1)],
            ..Default::default()
        }
    }

    fn new_engine(config: PursuitConfig) -> (PursuitEngine, Rc<RefCell<SpyLeaderboard>>) {
        let (reporter, spy) = spy_reporter(5);
        (PursuitEngine::new(config, reporter, 7).unwrap(), spy)
    }

    /// What a bean collected on the engine's latest tick is worth
    fn bean_now(engine: &PursuitEngine) -> u64 {
        let elapsed = (engine.now_ms() - engine.state().round_start_ms) / 1000.0;
        let config = engine.config();
        bean_value(elapsed, config.bean_base_value, config.bean_decay_divisor) as u64
    }

    /// Collect everything except `keep`
    fn leave_only(engine: &mut PursuitEngine, keep: IVec2) {
        let cells: Vec<IVec2> = engine.state.grid.collectible_cells().collect();
        for cell in cells.into_iter().filter(|c| *c != keep) {
            engine.state.grid.collect(cell);
        }
    }

    #[test]
    fn test_bad_layout_is_fatal() {
        let (reporter, _) = spy_reporter(5);
        let config = PursuitConfig {
            pursuer_starts: vec![IVec2::new(11, 8)],
            ..Default::default()
        };
        assert!(matches!(
            PursuitEngine::new(config, reporter, 1),
            Err(LayoutError::StartOnWall { .. })
        ));
    }

    #[test]
    fn test_invalid_tuning_is_fatal() {
        let (reporter, _) = spy_reporter(5);
        let config = PursuitConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            PursuitEngine::new(config, reporter, 1),
            Err(LayoutError::Config(_))
        ));
    }

    #[test]
    fn test_waits_for_start() {
        let (mut engine, _) = new_engine(PursuitConfig::default());
        assert_eq!(engine.phase(), PursuitPhase::Instructions);
        assert!(!engine.queue_direction(Direction::Down));

        engine.advance(1.0);
        assert_eq!(engine.state().player.cell, IVec2::new(1, 1));
        assert_eq!(engine.pending_timers(), 0);

        assert!(engine.start());
        assert_eq!(engine.phase(), PursuitPhase::Playing);
        assert_eq!(engine.pending_timers(), 1);
        assert!(!engine.start());
    }

    #[test]
    fn test_moves_on_tick() {
        let (mut engine, _) = new_engine(PursuitConfig::default());
        engine.start();
        let before = engine.state().collectibles_remaining();

        engine.advance(0.1);
        assert_eq!(engine.state().player.cell, IVec2::new(1, 1));
        engine.advance(0.02);
        assert_eq!(engine.state().player.cell, IVec2::new(2, 1));
        assert_eq!(engine.state().collectibles_remaining(), before - 1);
        // 120 ms in: floor(12 - 0.12 / 6)
        assert_eq!(engine.score(), 11);
        assert_eq!(engine.score(), bean_now(&engine));
    }

    #[test]
    fn test_input_queues_turn() {
        let (mut engine, _) = new_engine(PursuitConfig::default());
        engine.start();
        assert!(engine.key("ArrowDown"));
        assert!(!engine.key("Enter"));
        assert!(!engine.swipe(3.0, 4.0));
        assert_eq!(engine.state().player.queued, Some(Direction::Down));

        engine.advance(TICK);
        assert_eq!(engine.state().player.cell, IVec2::new(1, 2));
        assert_eq!(engine.state().player.facing, Direction::Down);

        assert!(engine.swipe(50.0, -5.0));
        assert_eq!(engine.state().player.queued, Some(Direction::Right));
    }

    #[test]
    fn test_last_bean_wins_with_bonus() {
        let (mut engine, spy) = new_engine(room_config());
        engine.start();
        leave_only(&mut engine, IVec2::new(2, 2));
        assert_eq!(engine.state().collectibles_remaining(), 1);

        engine.advance(TICK);
        assert_eq!(engine.state().player.cell, IVec2::new(2, 2));
        assert_eq!(engine.phase(), PursuitPhase::Win);
        let points = bean_now(&engine);
        assert_eq!(points, 11);
        assert_eq!(engine.score(), points);
        assert_eq!(engine.final_score(), Some(points + 250));
        assert_eq!(engine.pending_timers(), 0);

        let spy = spy.borrow();
        assert_eq!(spy.submitted.len(), 1);
        assert_eq!(spy.submitted[0].score, 261);
    }

    #[test]
    fn test_blocked_player_holds() {
        let (mut engine, _) = new_engine(room_config());
        engine.start();
        engine.state.player.cell = IVec2::new(1, 1);
        engine.state.player.facing = Direction::Left;
        engine.queue_direction(Direction::Up);

        engine.advance(TICK);
        assert_eq!(engine.state().player.cell, IVec2::new(1, 1));
        assert_eq!(engine.state().player.queued, Some(Direction::Up));
        assert_eq!(engine.phase(), PursuitPhase::Playing);
    }

    #[test]
    fn test_capture_ends_round() {
        let (mut engine, spy) = new_engine(room_config());
        engine.start();

        // One-wide corridor: the pursuer's only step is onto the player
        engine.state.grid =
            Grid::generate(&["1111", "1001", "1111"], IVec2::new(1, 1), &[]).unwrap();
        engine.state.player.cell = IVec2::new(1, 1);
        engine.state.player.facing = Direction::Left;
        engine.state.pursuers[0] = IVec2::new(2, 1);
        engine.advance(TICK);

        assert_eq!(engine.phase(), PursuitPhase::Over);
        assert!(!engine.state().won);
        assert_eq!(engine.state().collectibles_remaining(), 1);
        assert_eq!(engine.final_score(), Some(0));
        assert_eq!(engine.pending_timers(), 0);
        assert_eq!(spy.borrow().submitted.len(), 1);

        engine.advance(1.0);
        assert_eq!(engine.state().pursuers[0], IVec2::new(1, 1));
    }

    #[test]
    fn test_capture_beats_last_bean() {
        // Player takes the only bean as the pursuer steps onto it
        let config = PursuitConfig {
            layout: vec!["11111".into(), "10001".into(), "11111".into()],
            player_start: IVec2::new(1, 1),
            pursuer_starts: vec![IVec2::new(3, 1)],
            ..Default::default()
        };
        let (mut engine, spy) = new_engine(config);
        engine.start();
        assert_eq!(engine.state().collectibles_remaining(), 1);

        engine.advance(TICK);
        assert_eq!(engine.state().player.cell, IVec2::new(2, 1));
        assert_eq!(engine.state().pursuers[0], IVec2::new(2, 1));
        assert_eq!(engine.state().collectibles_remaining(), 0);
        assert_eq!(engine.phase(), PursuitPhase::Over);
        // Bean points only, no win bonus
        assert_eq!(engine.final_score(), Some(bean_now(&engine)));
        assert_eq!(spy.borrow().submitted[0].score, 11);
    }

    #[test]
    fn test_reveal_then_restart() {
        let (mut engine, spy) = new_engine(room_config());
        engine.start();
        leave_only(&mut engine, IVec2::new(2, 2));
        engine.advance(TICK);
        assert_eq!(engine.phase(), PursuitPhase::Win);

        // Frozen until revealed
        engine.advance(1.0);
        assert!(!engine.start());
        assert!(engine.reveal());
        assert_eq!(engine.phase(), PursuitPhase::Reveal);
        assert!(!engine.reveal());
        assert_eq!(engine.final_score(), Some(261));

        assert!(engine.start());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.final_score(), None);
        assert_eq!(engine.state().player.cell, IVec2::new(1, 2));
        assert_eq!(
            engine.state().collectibles_remaining(),
            engine.template.collectibles_remaining()
        );
        assert!(!engine.reporter().has_reported());
        assert_eq!(engine.state().grid.tile(IVec2::new(1, 1)), Tile::Collectible);

        // A new round reports again
        leave_only(&mut engine, IVec2::new(2, 2));
        engine.advance(TICK);
        assert_eq!(spy.borrow().submitted.len(), 2);
    }

    #[test]
    fn test_bean_value_decays_with_round_clock() {
        let (mut engine, _) = new_engine(room_config());
        engine.start();
        // Park the player in place so ticks pass without collecting
        engine.state.player.cell = IVec2::new(1, 1);
        engine.state.player.facing = Direction::Up;
        for _ in 0..(13 * 1000 / 110) {
            engine.advance(TICK);
        }
        let elapsed = (engine.now_ms() - engine.state().round_start_ms) / 1000.0;
        assert!(elapsed >= 13.0);

        // The first parking tick took the bean under the player
        let before = engine.score();
        assert_eq!(before, 11);

        engine.queue_direction(Direction::Right);
        engine.advance(TICK);
        assert_eq!(engine.state().player.cell, IVec2::new(2, 1));
        // floor(12 - 13.1 / 6)
        assert_eq!(engine.score() - before, 9);
        assert_eq!(engine.score() - before, bean_now(&engine));
    }

    proptest! {
        #[test]
        fn prop_beans_never_increase(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(0usize..5, 1..300),
        ) {
            let (reporter, _) = spy_reporter(5);
            let mut engine =
                PursuitEngine::new(PursuitConfig::default(), reporter, seed).unwrap();
            engine.start();

            let mut last = engine.state().collectibles_remaining();
            for input in inputs {
                if let Some(dir) = Direction::ALL.get(input) {
                    engine.queue_direction(*dir);
                }
                engine.advance(TICK);

                let state = engine.state();
                prop_assert!(state.collectibles_remaining() <= last);
                prop_assert!(state.grid.is_open(state.player.cell));
                prop_assert!(state.pursuers.iter().all(|p| state.grid.is_open(*p)));
                last = state.collectibles_remaining();

                if !state.is_playing() {
                    prop_assert!(state.final_score.is_some());
                    prop_assert_eq!(state.won, state.phase == PursuitPhase::Win);
                    break;
                }
            }
        }
    }
}
