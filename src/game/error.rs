//! Error types for the game core
//!
//! Covers move validation, history rewinding, state-machine misuse, and
//! engine failures surfaced through the move policy.

use crate::engine::EngineError;
use shakmaty::Move;

/// Errors that can occur in the game core
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A move outside the current legal-move set was submitted to `apply`.
    ///
    /// Human input is membership-checked before `apply`, so seeing this
    /// for a human move indicates a caller bug rather than bad input.
    #[error("Illegal move: {mv:?} is not legal in the current position")]
    IllegalMove { mv: Move },

    /// Undo requested with an empty move history
    #[error("No moves to undo")]
    NoHistory,

    /// An operation was invoked in a state that cannot accept it
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// The external engine failed; AI play is unusable for the session
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
