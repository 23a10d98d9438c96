//! Per-frame integration and culling
//!
//! Semi-implicit Euler with a clamped step: velocity first, then position.
//! Trajectories depend on host frame timing, so tests check invariants
//! (monotonic fall, bounds) rather than exact coordinates.

use super::state::{ObjectKind, SimObject, SliceState};
use crate::config::SliceConfig;

/// Clamp a host frame delta (seconds) to a stable physics step
#[inline]
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, max_dt)
    } else {
        0.0
    }
}

/// Apply gravity and move every live object by `dt` seconds
pub fn integrate(state: &mut SliceState, config: &SliceConfig, dt: f32) {
    for obj in state.objects.iter_mut().filter(|o| !o.consumed) {
        let scale = match obj.kind {
            ObjectKind::Debris => config.debris_gravity_scale,
            _ => 1.0,
        };
        obj.vel.y += config.gravity * scale * dt;
        obj.pos += obj.vel * dt;
    }
}

/// Remove consumed objects, objects that left the play area, and expired debris
pub fn cull(state: &mut SliceState, config: &SliceConfig, now_ms: f64) {
    let (width, height) = (state.width, state.height);
    state
        .objects
        .retain(|obj| keep(obj, width, height, config, now_ms));
}

fn keep(obj: &SimObject, width: f32, height: f32, config: &SliceConfig, now_ms: f64) -> bool {
    match obj.kind {
        ObjectKind::Debris => now_ms - obj.spawn_ms < config.debris_lifetime_ms,
        ObjectKind::Target | ObjectKind::Hazard => {
            let m = config.cull_margin;
            !obj.consumed && obj.pos.y <= height + m && obj.pos.x >= -m && obj.pos.x <= width + m
        }
    }
}

/// One physics step: integrate then cull
pub fn step(state: &mut SliceState, config: &SliceConfig, dt: f32, now_ms: f64) {
    integrate(state, config, dt);
    cull(state, config, now_ms);
}
