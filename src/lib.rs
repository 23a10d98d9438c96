//! Party Arcade - two arcade mini-game engines for a party-game shell
//!
//! Core modules:
//! - `slice`: Continuous-physics slicing game (spawn, gravity, swipe collision)
//! - `pursuit`: Grid pursuit game (maze movement, random-walk pursuers, beans)
//! - `schedule`: Fixed-interval timers owned by each engine
//! - `report`: One-shot score handoff to the leaderboard and shell
//! - `leaderboard`: In-memory top-N leaderboard
//! - `config`: Data-driven tuning for both engines
//! - `autopilot`: Demo AIs that play either game

pub mod autopilot;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod pursuit;
pub mod report;
pub mod schedule;
pub mod slice;

pub use config::{ArcadeConfig, PursuitConfig, SliceConfig};
pub use error::{ConfigError, LayoutError, ReportError};
pub use leaderboard::{LeaderboardEntry, LocalLeaderboard};
pub use report::{Leaderboard, LevelId, ScoreReport, ScoreReporter};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Largest physics step in seconds; longer frames are clamped
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Slicing round defaults
    pub const ROUND_SECONDS: u32 = 30;
    pub const SPAWN_INTERVAL_MS: u32 = 650;
    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1400.0;
    /// Debris falls slower than whole objects
    pub const DEBRIS_GRAVITY_SCALE: f32 = 0.55;
    pub const HAZARD_PROBABILITY: f64 = 0.12;
    pub const OBJECT_RADIUS_MIN: f32 = 24.0;
    pub const OBJECT_RADIUS_MAX: f32 = 38.0;
    /// Spawn inset from the side edges and below the bottom edge
    pub const SPAWN_EDGE_INSET: f32 = 20.0;
    pub const LAUNCH_VX_MAX: f32 = 260.0;
    pub const LAUNCH_VY_MIN: f32 = -1150.0;
    pub const LAUNCH_VY_MAX: f32 = -900.0;
    /// Objects this far outside the play area are culled
    pub const CULL_MARGIN: f32 = 220.0;
    pub const SLICE_SLACK: f32 = 10.0;
    pub const TARGET_POINTS: u64 = 100;
    pub const DEBRIS_LIFETIME_MS: f64 = 350.0;
    pub const DEBRIS_SPLIT_VX: f32 = 220.0;
    pub const DEBRIS_KICK_VY: f32 = 140.0;
    pub const DEBRIS_RADIUS_SCALE: f32 = 0.4;
    pub const TRAIL_WINDOW_MS: f64 = 120.0;
    /// Score needed to unlock the end-of-round reveal
    pub const REVEAL_THRESHOLD: u64 = 100;

    /// Pursuit round defaults
    pub const TICK_MS: u32 = 110;
    pub const BEAN_BASE_VALUE: u32 = 12;
    pub const BEAN_DECAY_DIVISOR: f64 = 6.0;
    pub const WIN_BONUS: u64 = 250;
    /// Minimum swipe travel (pixels) to register a turn
    pub const SWIPE_THRESHOLD: f32 = 20.0;

    /// Immediate retries after a failed leaderboard write
    pub const REPORT_RETRIES: u32 = 1;

    /// Leaderboard level ids used by the shell
    pub const SLICE_LEVEL_ID: u32 = 4;
    pub const PURSUIT_LEVEL_ID: u32 = 5;
}

/// Squared distance from point `p` to the segment `a`-`b`
///
/// The projection is clamped to the segment, so points beyond either end
/// measure to the nearest endpoint. A degenerate segment measures to `a`.
#[inline]
pub fn dist_to_segment_sq(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let ap = p - a;

    let c1 = ap.dot(ab);
    if c1 <= 0.0 {
        return ap.length_squared();
    }

    let c2 = ab.length_squared();
    if c2 <= c1 {
        return (p - b).length_squared();
    }

    let t = c1 / c2;
    (p - (a + ab * t)).length_squared()
}

/// Uniform sample in `[min, max)`; returns `min` when the range is empty
/// or its width is not representable
#[inline]
pub fn random_in_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min && (max - min).is_finite() {
        rng.random_range(min..max)
    } else {
        min
    }
}
