//! Slicing game
//!
//! Objects launch from below the screen, arc under gravity, and are cut by
//! pointer swipes. Cutting a hazard, or running out the clock, ends the round.
//!
//! - Gravity and motion follow the host's frame delta (clamped)
//! - Spawn cadence and countdown run on engine-owned timers
//! - Every mutation checks the live phase first

pub mod collision;
pub mod engine;
pub mod gesture;
pub mod physics;
pub mod spawn;
pub mod state;

pub use collision::{SwipeOutcome, resolve_swipe, segment_hits};
pub use engine::{SliceEngine, SliceTimer};
pub use gesture::{GestureTrail, TrailPoint};
pub use state::{EndReason, ObjectKind, SimObject, SlicePhase, SliceState};
