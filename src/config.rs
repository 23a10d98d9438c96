//! Engine tuning
//!
//! Immutable per-engine configuration passed in at construction. Every field
//! has a default matching `crate::consts`, so a partial JSON file only needs
//! the values it overrides.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::pursuit::grid::{DEFAULT_LAYOUT, DEFAULT_PLAYER_START, DEFAULT_PURSUER_STARTS};

/// Slicing game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Round length (seconds)
    pub round_seconds: u32,
    /// Spawn cadence (ms)
    pub spawn_interval_ms: u32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Gravity multiplier for debris
    pub debris_gravity_scale: f32,
    /// Chance that a spawn is a hazard
    pub hazard_probability: f64,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Horizontal inset and below-screen offset for spawns
    pub spawn_edge_inset: f32,
    /// Horizontal launch speed is sampled in [-max, max]
    pub launch_vx_max: f32,
    pub launch_vy_min: f32,
    pub launch_vy_max: f32,
    /// Physics step clamp (seconds)
    pub max_frame_dt: f32,
    pub cull_margin: f32,
    /// Extra hit distance on top of the object radius
    pub slice_slack: f32,
    pub target_points: u64,
    pub debris_lifetime_ms: f64,
    pub trail_window_ms: f64,
    pub reveal_threshold: u64,
    /// Play area in pixels (the host may resize later)
    pub play_width: f32,
    pub play_height: f32,
    pub level_id: u32,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            round_seconds: ROUND_SECONDS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            gravity: GRAVITY,
            debris_gravity_scale: DEBRIS_GRAVITY_SCALE,
            hazard_probability: HAZARD_PROBABILITY,
            radius_min: OBJECT_RADIUS_MIN,
            radius_max: OBJECT_RADIUS_MAX,
            spawn_edge_inset: SPAWN_EDGE_INSET,
            launch_vx_max: LAUNCH_VX_MAX,
            launch_vy_min: LAUNCH_VY_MIN,
            launch_vy_max: LAUNCH_VY_MAX,
            max_frame_dt: MAX_FRAME_DT,
            cull_margin: CULL_MARGIN,
            slice_slack: SLICE_SLACK,
            target_points: TARGET_POINTS,
            debris_lifetime_ms: DEBRIS_LIFETIME_MS,
            trail_window_ms: TRAIL_WINDOW_MS,
            reveal_threshold: REVEAL_THRESHOLD,
            play_width: 800.0,
            play_height: 600.0,
            level_id: SLICE_LEVEL_ID,
        }
    }
}

impl SliceConfig {
    /// Reject values that would make the simulation meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("round_seconds", self.round_seconds as f64)?;
        positive("spawn_interval_ms", self.spawn_interval_ms as f64)?;
        positive("gravity", self.gravity as f64)?;
        positive("max_frame_dt", self.max_frame_dt as f64)?;
        positive("radius_min", self.radius_min as f64)?;
        positive("play_width", self.play_width as f64)?;
        positive("play_height", self.play_height as f64)?;
        positive("debris_lifetime_ms", self.debris_lifetime_ms)?;
        positive("trail_window_ms", self.trail_window_ms)?;
        probability("hazard_probability", self.hazard_probability)?;

        finite("debris_gravity_scale", self.debris_gravity_scale as f64)?;
        finite("launch_vy_min", self.launch_vy_min as f64)?;
        non_negative("radius_max", self.radius_max)?;
        non_negative("spawn_edge_inset", self.spawn_edge_inset)?;
        non_negative("launch_vx_max", self.launch_vx_max)?;
        non_negative("cull_margin", self.cull_margin)?;
        non_negative("slice_slack", self.slice_slack)?;

        ordered("radius", self.radius_min, self.radius_max)?;
        ordered("launch_vy", self.launch_vy_min, self.launch_vy_max)?;
        ordered("launch_vx", -self.launch_vx_max, self.launch_vx_max)?;
        Ok(())
    }
}

/// Pursuit game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    /// Movement tick (ms)
    pub tick_ms: u32,
    /// Bean value at the start of a round
    pub bean_base_value: u32,
    /// Seconds of play that cost one point of bean value
    pub bean_decay_divisor: f64,
    pub win_bonus: u64,
    pub swipe_threshold: f32,
    /// Static layout rows, '1' = wall, '0' = open
    pub layout: Vec<String>,
    pub player_start: IVec2,
    pub pursuer_starts: Vec<IVec2>,
    pub level_id: u32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            bean_base_value: BEAN_BASE_VALUE,
            bean_decay_divisor: BEAN_DECAY_DIVISOR,
            win_bonus: WIN_BONUS,
            swipe_threshold: SWIPE_THRESHOLD,
            layout: DEFAULT_LAYOUT.iter().map(|row| row.to_string()).collect(),
            player_start: DEFAULT_PLAYER_START,
            pursuer_starts: DEFAULT_PURSUER_STARTS.to_vec(),
            level_id: PURSUIT_LEVEL_ID,
        }
    }
}

impl PursuitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tick_ms", self.tick_ms as f64)?;
        positive("bean_base_value", self.bean_base_value as f64)?;
        positive("bean_decay_divisor", self.bean_decay_divisor)?;
        non_negative("swipe_threshold", self.swipe_threshold)?;
        Ok(())
    }
}

/// Configuration for the whole arcade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub slice: SliceConfig,
    pub pursuit: PursuitConfig,
    /// Extra attempts after a failed leaderboard write
    pub report_retries: u32,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            slice: SliceConfig::default(),
            pursuit: PursuitConfig::default(),
            report_retries: REPORT_RETRIES,
        }
    }
}

impl ArcadeConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ArcadeConfig = serde_json::from_str(json)?;
        config.slice.validate()?;
        config.pursuit.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    let value = value as f64;
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotAProbability { field, value })
    }
}

/// Sample range in f32 space: bounds ordered and the span representable
fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, (max - min) as f64)?;
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange {
            field,
            min: min as f64,
            max: max as f64,
        })
    }
}
