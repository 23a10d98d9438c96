//! Grid movement
//!
//! The player turns into the queued direction when it can, otherwise keeps
//! going forward, otherwise holds. Pursuers random-walk over legal
//! neighbours. No move ever lands on a wall.

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// One of the four grid directions (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[inline]
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    /// Map a DOM-style key name ("ArrowUp", ...) to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Direction of a touch swipe, or None if it travelled less than
    /// `threshold` on both axes. Ties go to the vertical axis.
    pub fn from_swipe(dx: f32, dy: f32, threshold: f32) -> Option<Self> {
        if !dx.is_finite() || !dy.is_finite() {
            return None;
        }
        if dx.abs() < threshold && dy.abs() < threshold {
            return None;
        }
        Some(if dx.abs() > dy.abs() {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// The player avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub cell: IVec2,
    pub facing: Direction,
    /// Turn request waiting for an opening (last write wins)
    pub queued: Option<Direction>,
}

impl Player {
    pub fn new(cell: IVec2) -> Self {
        Self {
            cell,
            facing: Direction::Right,
            queued: None,
        }
    }
}

/// Refuse any move onto a wall. Reaching this with a wall target is a bug.
fn checked_move(grid: &Grid, actor: &str, from: IVec2, to: IVec2) -> IVec2 {
    debug_assert!(grid.is_open(to), "{} moved onto wall at {}", actor, to);
    if grid.is_open(to) {
        to
    } else {
        log::error!("Refused {} move {} -> {} (wall)", actor, from, to);
        from
    }
}

/// Advance the player one tick. Returns true if it changed cell.
pub fn step_player(grid: &Grid, player: &mut Player) -> bool {
    let from = player.cell;

    if let Some(turn) = player.queued {
        let target = from + turn.delta();
        if grid.is_open(target) {
            player.cell = checked_move(grid, "player", from, target);
            player.facing = turn;
            player.queued = None;
            return player.cell != from;
        }
    }

    let ahead = from + player.facing.delta();
    if grid.is_open(ahead) {
        player.cell = checked_move(grid, "player", from, ahead);
    }
    player.cell != from
}

/// Pick a uniformly random legal neighbour; hold if there is none
pub fn step_pursuer<R: Rng>(grid: &Grid, cell: IVec2, rng: &mut R) -> IVec2 {
    let moves: Vec<IVec2> = Direction::ALL
        .iter()
        .map(|d| cell + d.delta())
        .filter(|&next| grid.is_open(next))
        .collect();

    match moves.choose(rng) {
        Some(&next) => checked_move(grid, "pursuer", cell, next),
        None => cell,
    }
}

/// Points for one bean collected `elapsed_secs` into the round.
///
/// Starts at `base` and loses a point every `decay_divisor` seconds, but
/// never drops below 1.
pub fn bean_value(elapsed_secs: f64, base: u32, decay_divisor: f64) -> u32 {
    let elapsed = if elapsed_secs.is_finite() { elapsed_secs.max(0.0) } else { 0.0 };
    let value = (base as f64 - elapsed / decay_divisor).floor();
    if value >= 1.0 { value as u32 } else { 1 }
}
