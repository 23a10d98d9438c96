//! Pointer stroke tracking
//!
//! The trail keeps a short time window of samples for drawing. Collision only
//! ever uses the segment between the two most recent samples.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Trail sample for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub t_ms: f64,
}

/// Active pointer stroke
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GestureTrail {
    down: bool,
    last: Option<Vec2>,
    /// Oldest first
    points: Vec<TrailPoint>,
}

impl GestureTrail {
    /// Pointer pressed: start a fresh stroke
    pub fn press(&mut self, pos: Vec2, now_ms: f64) {
        self.down = true;
        self.last = Some(pos);
        self.points.clear();
        self.points.push(TrailPoint { pos, t_ms: now_ms });
    }

    /// Pointer moved. Returns the swept segment when the pointer is down and
    /// a previous sample exists.
    pub fn drag(&mut self, pos: Vec2, now_ms: f64, window_ms: f64) -> Option<(Vec2, Vec2)> {
        if !self.down {
            return None;
        }
        let segment = self.last.map(|prev| (prev, pos));
        self.last = Some(pos);
        self.points.push(TrailPoint { pos, t_ms: now_ms });
        self.prune(now_ms, window_ms);
        segment
    }

    /// Pointer released (or the round ended)
    pub fn release(&mut self) {
        self.down = false;
        self.last = None;
        self.points.clear();
    }

    /// Drop samples older than the window
    pub fn prune(&mut self, now_ms: f64, window_ms: f64) {
        let cutoff = now_ms - window_ms;
        self.points.retain(|p| p.t_ms >= cutoff);
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_uses_last_two_samples() {
        let mut trail = GestureTrail::default();
        trail.press(Vec2::new(0.0, 0.0), 0.0);
        let seg = trail.drag(Vec2::new(10.0, 0.0), 5.0, 120.0);
        assert_eq!(seg, Some((Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0))));
        let seg = trail.drag(Vec2::new(20.0, 5.0), 10.0, 120.0);
        assert_eq!(seg, Some((Vec2::new(10.0, 0.0), Vec2::new(20.0, 5.0))));
        assert_eq!(trail.points().len(), 3);
    }

    #[test]
    fn test_no_segment_without_press() {
        let mut trail = GestureTrail::default();
        assert!(trail.drag(Vec2::new(1.0, 1.0), 0.0, 120.0).is_none());
        assert!(trail.points().is_empty());
    }

    #[test]
    fn test_old_samples_pruned() {
        let mut trail = GestureTrail::default();
        trail.press(Vec2::ZERO, 0.0);
        trail.drag(Vec2::new(1.0, 0.0), 50.0, 120.0);
        trail.drag(Vec2::new(2.0, 0.0), 200.0, 120.0);
        // Samples at 0 and 50 are older than 200 - 120
        assert_eq!(trail.points().len(), 1);
        assert_eq!(trail.points()[0].t_ms, 200.0);
    }

    #[test]
    fn test_release_clears() {
        let mut trail = GestureTrail::default();
        trail.press(Vec2::ZERO, 0.0);
        trail.release();
        assert!(!trail.is_down());
        assert!(trail.points().is_empty());
        assert!(trail.drag(Vec2::ONE, 1.0, 120.0).is_none());
    }
}
