//! Error types
//!
//! Configuration and layout errors are fatal at load time: an engine is never
//! constructed from bad data. Report errors are recovered by the reporter.

use thiserror::Error;

/// Invalid tuning values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be within [0, 1] (got {value})")]
    NotAProbability { field: &'static str, value: f64 },

    #[error("range {field} is inverted ({min} > {max})")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config read error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

/// Malformed static grid layout
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,

    #[error("row {row} has width {width}, expected {expected}")]
    Ragged {
        row: usize,
        width: usize,
        expected: usize,
    },

    #[error("unknown tile '{ch}' at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },

    #[error("{actor} start ({x}, {y}) is outside the grid")]
    StartOutOfBounds { actor: &'static str, x: i32, y: i32 },

    #[error("{actor} start ({x}, {y}) is a wall")]
    StartOnWall { actor: &'static str, x: i32, y: i32 },

    #[error("layout has no collectibles")]
    NoCollectibles,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Leaderboard write failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),

    #[error("score rejected: {0}")]
    Rejected(String),
}
