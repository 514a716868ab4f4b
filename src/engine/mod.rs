//! External analysis engine boundary
//!
//! The game core never talks to an engine process directly; it goes
//! through the [`MoveEngine`] trait so the move policy and the session
//! can be exercised with a scripted engine in tests. The production
//! implementation is [`UciEngine`], a blocking adapter around a UCI
//! engine process such as Stockfish.

pub mod uci;

pub use uci::UciEngine;

use shakmaty::{Chess, Move};
use std::time::Duration;

/// Errors at the external-engine boundary
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine process could not be started, reached, or it exited
    /// unexpectedly. AI play cannot continue for the session.
    #[error("Engine unavailable: {message}")]
    Unavailable { message: String },

    /// The engine violated the protocol, e.g. returned a move that is
    /// not legal in the position it was asked about. Never silently
    /// accepted or substituted.
    #[error("Engine protocol violation: {message}")]
    Protocol { message: String },
}

/// A strength-rated move source queried with a position and a time budget.
///
/// `best_move` blocks for up to `budget` (plus protocol overhead) and
/// returns exactly one move that is legal in `position`.
pub trait MoveEngine {
    fn best_move(&mut self, position: &Chess, budget: Duration) -> Result<Move, EngineError>;
}
