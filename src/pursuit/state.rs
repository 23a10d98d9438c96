//! Pursuit round state

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::movement::Player;

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuitPhase {
    /// Waiting for the player to start
    Instructions,
    Playing,
    /// Every bean collected
    Win,
    /// Caught by a pursuer
    Over,
    /// End-of-round screen, shown after either outcome
    Reveal,
}

impl PursuitPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, PursuitPhase::Win | PursuitPhase::Over)
    }
}

/// Complete state for one pursuit round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PursuitState {
    pub phase: PursuitPhase,
    pub grid: Grid,
    pub player: Player,
    pub pursuers: Vec<IVec2>,
    /// Bean points collected so far
    pub score: u64,
    /// Set once, when the round leaves `Playing`
    pub final_score: Option<u64>,
    /// Whether the round was won; meaningful once `final_score` is set
    pub won: bool,
    /// Engine clock at round start (ms)
    pub round_start_ms: f64,
}

impl PursuitState {
    pub fn new(grid: Grid, player_start: IVec2, pursuer_starts: &[IVec2]) -> Self {
        Self {
            phase: PursuitPhase::Instructions,
            grid,
            player: Player::new(player_start),
            pursuers: pursuer_starts.to_vec(),
            score: 0,
            final_score: None,
            won: false,
            round_start_ms: 0.0,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == PursuitPhase::Playing
    }

    pub fn collectibles_remaining(&self) -> u32 {
        self.grid.collectibles_remaining()
    }

    /// Whether any pursuer shares the player's cell
    pub fn player_caught(&self) -> bool {
        self.pursuers.contains(&self.player.cell)
    }
}
