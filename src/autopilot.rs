//! Demo autopilots
//!
//! Simple AIs that drive each engine through its public input surface, used
//! by the native binary's headless demo and by end-to-end tests.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};

use crate::pursuit::{Direction, Grid, PursuitEngine, PursuitState, Tile};
use crate::slice::{ObjectKind, SliceEngine, SliceState, segment_hits};

/// Length of an autopilot slice (pixels)
const SWIPE_LENGTH: f32 = 120.0;
/// Extra clearance kept from hazards (pixels)
const HAZARD_CLEARANCE: f32 = 25.0;

/// Swipes through the best reachable target while steering clear of hazards
#[derive(Debug, Clone)]
pub struct SliceAutopilot {
    /// Minimum time between swipes (ms)
    pub cooldown_ms: f64,
    last_swipe_ms: f64,
}

impl Default for SliceAutopilot {
    fn default() -> Self {
        Self {
            cooldown_ms: 180.0,
            last_swipe_ms: f64::NEG_INFINITY,
        }
    }
}

impl SliceAutopilot {
    /// Pick a swipe segment, if any target can be cut safely.
    ///
    /// Prefers the target highest on screen (it has been visible longest).
    /// Tries a horizontal cut first, then a vertical one.
    pub fn plan(state: &SliceState, slack: f32) -> Option<(Vec2, Vec2)> {
        let hazards: Vec<_> = state
            .objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Hazard && !o.consumed)
            .collect();

        let mut targets: Vec<_> = state
            .objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Target && o.is_live_sliceable())
            .filter(|o| o.pos.y > 0.0 && o.pos.y < state.height)
            .collect();
        targets.sort_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let half = SWIPE_LENGTH * 0.5;
        targets.into_iter().find_map(|target| {
            [Vec2::new(half, 0.0), Vec2::new(0.0, half)]
                .into_iter()
                .map(|offset| (target.pos - offset, target.pos + offset))
                .find(|&(a, b)| {
                    hazards
                        .iter()
                        .all(|h| !segment_hits(h, a, b, slack + HAZARD_CLEARANCE))
                })
        })
    }

    /// Feed one swipe to the engine when the cooldown allows
    pub fn drive(&mut self, engine: &mut SliceEngine) -> bool {
        let now = engine.now_ms();
        if now - self.last_swipe_ms < self.cooldown_ms {
            return false;
        }
        let Some((a, b)) = Self::plan(engine.state(), engine.config().slice_slack) else {
            return false;
        };

        engine.pointer_down(a);
        engine.pointer_move(b);
        engine.pointer_up();
        self.last_swipe_ms = now;
        true
    }
}

/// Heads for the nearest bean, routing around pursuers when it can
#[derive(Debug, Clone, Copy, Default)]
pub struct PursuitAutopilot;

impl PursuitAutopilot {
    /// First step of a shortest path to the nearest bean.
    ///
    /// Cells on or next to a pursuer are avoided; if that leaves no route the
    /// search is repeated without avoidance.
    pub fn plan(state: &PursuitState) -> Option<Direction> {
        let danger: Vec<IVec2> = state
            .pursuers
            .iter()
            .flat_map(|&p| {
                std::iter::once(p).chain(Direction::ALL.into_iter().map(move |d| p + d.delta()))
            })
            .collect();

        first_step_to_bean(&state.grid, state.player.cell, &danger)
            .or_else(|| first_step_to_bean(&state.grid, state.player.cell, &[]))
    }

    pub fn drive(&mut self, engine: &mut PursuitEngine) -> bool {
        match Self::plan(engine.state()) {
            Some(dir) => engine.queue_direction(dir),
            None => false,
        }
    }
}

/// Breadth-first search from `start`; returns the first move on the path
fn first_step_to_bean(grid: &Grid, start: IVec2, avoid: &[IVec2]) -> Option<Direction> {
    let width = grid.width() as usize;
    let mut visited = vec![false; width * grid.height() as usize];
    let index = |c: IVec2| c.y as usize * width + c.x as usize;

    let mut queue: VecDeque<(IVec2, Direction)> = VecDeque::new();
    visited[index(start)] = true;
    for dir in Direction::ALL {
        let next = start + dir.delta();
        if grid.is_open(next) && !avoid.contains(&next) {
            visited[index(next)] = true;
            queue.push_back((next, dir));
        }
    }

    while let Some((cell, first)) = queue.pop_front() {
        if grid.tile(cell) == Tile::Collectible {
            return Some(first);
        }
        for dir in Direction::ALL {
            let next = cell + dir.delta();
            if grid.is_open(next) && !visited[index(next)] && !avoid.contains(&next) {
                visited[index(next)] = true;
                queue.push_back((next, first));
            }
        }
    }
    None
}
