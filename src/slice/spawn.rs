//! Object spawning
//!
//! Objects enter just below the play area with a strong upward launch and
//! arc back down under gravity.

use glam::Vec2;
use rand::Rng;

use super::state::{ObjectKind, SimObject, SliceState};
use crate::config::SliceConfig;
use crate::random_in_range;

/// Launch parameters for a new object (before an ID is assigned)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Roll a new launch for a play area of `width` x `height`
pub fn roll_launch<R: Rng>(
    rng: &mut R,
    config: &SliceConfig,
    width: f32,
    height: f32,
) -> Launch {
    let kind = if rng.random_bool(config.hazard_probability) {
        ObjectKind::Hazard
    } else {
        ObjectKind::Target
    };
    let radius = random_in_range(rng, config.radius_min, config.radius_max);

    let inset = radius + config.spawn_edge_inset;
    let x = random_in_range(rng, inset, width - inset);
    let y = height + inset;

    let vx = random_in_range(rng, -config.launch_vx_max, config.launch_vx_max);
    let vy = random_in_range(rng, config.launch_vy_min, config.launch_vy_max);

    Launch {
        kind,
        pos: Vec2::new(x, y),
        vel: Vec2::new(vx, vy),
        radius,
    }
}

/// Spawn one object into the round. No-op once the round is over.
pub fn spawn_object<R: Rng>(
    state: &mut SliceState,
    rng: &mut R,
    config: &SliceConfig,
    now_ms: f64,
) -> Option<u32> {
    if !state.is_playing() {
        return None;
    }

    let launch = roll_launch(rng, config, state.width, state.height);
    let id = state.next_entity_id();
    state.objects.push(SimObject::new(
        id,
        launch.kind,
        launch.pos,
        launch.vel,
        launch.radius,
        now_ms,
    ));
    log::debug!(
        "Spawned {:?} #{} at ({:.0}, {:.0})",
        launch.kind,
        id,
        launch.pos.x,
        launch.pos.y
    );
    Some(id)
}

/// Two fragments flying apart from a sliced target
pub fn spawn_debris(state: &mut SliceState, from: &SimObject, now_ms: f64) {
    use crate::consts::{DEBRIS_KICK_VY, DEBRIS_RADIUS_SCALE, DEBRIS_SPLIT_VX};

    for side in [-1.0, 1.0] {
        let id = state.next_entity_id();
        let vel = Vec2::new(
            from.vel.x + side * DEBRIS_SPLIT_VX,
            from.vel.y - DEBRIS_KICK_VY,
        );
        state.objects.push(SimObject::new(
            id,
            ObjectKind::Debris,
            from.pos,
            vel,
            from.radius * DEBRIS_RADIUS_SCALE,
            now_ms,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::state::SlicePhase;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_stops_when_over() {
        let config = SliceConfig::default();
        let mut state = SliceState::new(30, 800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(7);

        assert!(spawn_object(&mut state, &mut rng, &config, 0.0).is_some());
        state.phase = SlicePhase::Over;
        assert!(spawn_object(&mut state, &mut rng, &config, 0.0).is_none());
        assert_eq!(state.objects.len(), 1);
    }

    #[test]
    fn test_hazard_probability_extremes() {
        let mut rng = Pcg32::seed_from_u64(3);
        let never = SliceConfig {
            hazard_probability: 0.0,
            ..Default::default()
        };
        let always = SliceConfig {
            hazard_probability: 1.0,
            ..Default::default()
        };
        for _ in 0..50 {
            assert_eq!(roll_launch(&mut rng, &never, 800.0, 600.0).kind, ObjectKind::Target);
            assert_eq!(roll_launch(&mut rng, &always, 800.0, 600.0).kind, ObjectKind::Hazard);
        }
    }

    #[test]
    fn test_debris_splits_outward() {
        let mut state = SliceState::new(30, 800.0, 600.0);
        let target = SimObject::new(
            99,
            ObjectKind::Target,
            Vec2::new(100.0, 100.0),
            Vec2::new(10.0, -500.0),
            30.0,
            0.0,
        );
        spawn_debris(&mut state, &target, 5.0);

        assert_eq!(state.count(ObjectKind::Debris), 2);
        let left = &state.objects[0];
        let right = &state.objects[1];
        assert!(left.vel.x < target.vel.x && right.vel.x > target.vel.x);
        assert!(left.vel.y < target.vel.y);
        assert!((left.radius - 12.0).abs() < 1e-4);
        assert_eq!(left.pos, target.pos);
        assert_ne!(left.id, right.id);
    }

    proptest! {
        #[test]
        fn prop_launch_within_bounds(
            seed in any::<u64>(),
            width in 200.0f32..2000.0,
            height in 200.0f32..2000.0,
        ) {
            let config = SliceConfig::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let launch = roll_launch(&mut rng, &config, width, height);

            prop_assert!(launch.radius >= config.radius_min && launch.radius <= config.radius_max);
            prop_assert!(launch.pos.x >= launch.radius && launch.pos.x <= width - launch.radius);
            prop_assert!(launch.pos.y > height);
            prop_assert!(launch.vel.y < 0.0);
            prop_assert!(launch.vel.x.abs() <= config.launch_vx_max);
        }
    }
}
