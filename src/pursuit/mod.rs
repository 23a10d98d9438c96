//! Grid pursuit game
//!
//! The player steers through a maze collecting beans while pursuers wander
//! at random. Clearing the maze wins; sharing a cell with a pursuer loses.

pub mod engine;
pub mod grid;
pub mod movement;
pub mod state;

pub use engine::{PursuitEngine, PursuitTimer};
pub use grid::{Grid, Tile};
pub use movement::{Direction, Player, bean_value};
pub use state::{PursuitPhase, PursuitState};
