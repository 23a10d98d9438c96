//! Swipe-segment collision
//!
//! A swipe is tested one segment at a time: the previous pointer sample to the
//! current one. Every live object is tested against the same segment, in id
//! order, so one fast swipe can cut several targets. A hazard stops the pass.

use glam::Vec2;

use super::spawn::spawn_debris;
use super::state::{ObjectKind, SimObject, SliceState};
use crate::config::SliceConfig;
use crate::dist_to_segment_sq;

/// What a single swipe segment cut
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwipeOutcome {
    /// Targets sliced, in test order
    pub targets: Vec<u32>,
    /// Hazard that ended the pass, if any
    pub hazard: Option<u32>,
}

impl SwipeOutcome {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.hazard.is_none()
    }
}

/// Whether the segment `a`-`b` passes within `radius + slack` of the object
#[inline]
pub fn segment_hits(obj: &SimObject, a: Vec2, b: Vec2, slack: f32) -> bool {
    let reach = obj.radius + slack;
    dist_to_segment_sq(obj.pos, a, b) <= reach * reach
}

/// Test one swipe segment against every live object and resolve the hits.
///
/// Targets hit before a hazard in the same pass still score; nothing after
/// the hazard is tested. Ending the round is left to the caller.
pub fn resolve_swipe(
    state: &mut SliceState,
    config: &SliceConfig,
    a: Vec2,
    b: Vec2,
    now_ms: f64,
) -> SwipeOutcome {
    let mut outcome = SwipeOutcome::default();
    if !state.is_playing() {
        return outcome;
    }

    // Sliced targets, kept for debris (deferred to avoid borrow issues)
    let mut sliced: Vec<SimObject> = Vec::new();

    for obj in state.objects.iter_mut() {
        if !obj.is_live_sliceable() || !segment_hits(obj, a, b, config.slice_slack) {
            continue;
        }
        obj.consumed = true;

        match obj.kind {
            ObjectKind::Hazard => {
                outcome.hazard = Some(obj.id);
                break;
            }
            ObjectKind::Target => {
                outcome.targets.push(obj.id);
                sliced.push(obj.clone());
            }
            ObjectKind::Debris => {}
        }
    }

    for target in &sliced {
        state.score += config.target_points;
        spawn_debris(state, target, now_ms);
    }

    outcome
}
