//! Error types for the engine and the game layer

use crate::types::Move;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Move is not among the legal moves of the current position
    #[error("Illegal move: {0}")]
    IllegalMove(Move),

    /// A move was offered after the game ended
    #[error("Game is already over")]
    GameOver,

    #[error("Invalid square: {0}")]
    ParseSquare(String),

    #[error("Invalid move: {0}")]
    ParseMove(String),

    #[error("Invalid position notation: {0}")]
    ParsePosition(String),

    /// Push onto a full fixed-capacity stack
    #[error("Stack overflow: capacity {capacity} exceeded")]
    StackOverflow { capacity: usize },

    /// The worker still owns the engine for an earlier search
    #[error("A search is already running")]
    SearchInProgress,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
