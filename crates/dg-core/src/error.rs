//! Error types
//!
//! Configuration problems are rejected before any generation starts.
//! Placement exhaustion is not an error at all: rooms, doors and stairs
//! that find no legal spot are skipped. Invariant violations mean the
//! generator itself is broken.

use thiserror::Error;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid dimensions {rows}x{cols}: each must be within {min}..={max}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        min: usize,
        max: usize,
    },

    #[error("room_min must be at least 1, got {0}")]
    RoomMinTooSmall(usize),

    #[error("room_max must be at most {limit}, got {value}")]
    RoomMaxTooLarge { value: usize, limit: usize },

    #[error("room_min ({min}) is larger than room_max ({max})")]
    RoomBounds { min: usize, max: usize },

    #[error("{field} must be a percentage (0..=100), got {value}")]
    PercentOutOfRange { field: &'static str, value: u8 },

    #[error("max_rooms must be at most {limit}, got {value}")]
    TooManyRooms { value: u16, limit: u16 },

    #[error("custom mask template is empty or ragged")]
    BadMask,

    #[error("custom mask template splits into {0} separate open areas")]
    DisconnectedMask(usize),

    #[error("door weights must not all be zero")]
    NoDoorWeights,
}

/// Errors from a generation run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invariant violated at ({row}, {col}): {reason}")]
    Invariant {
        row: usize,
        col: usize,
        reason: String,
    },
}

impl GenerationError {
    pub(crate) fn invariant(row: usize, col: usize, reason: impl Into<String>) -> Self {
        GenerationError::Invariant {
            row,
            col,
            reason: reason.into(),
        }
    }
}
