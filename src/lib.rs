//! clickchess - interactive chess board core
//!
//! A click-driven interaction state machine over shakmaty, with a
//! difficulty-tiered AI opponent backed by an external UCI engine.
//! Rendering and input mapping live outside this crate; the binary
//! ships a minimal text-mode surface.

pub mod engine;
pub mod game;

pub use engine::{EngineError, MoveEngine, UciEngine};
pub use game::{
    Difficulty, GameError, GameMode, GameOutcome, GameOverNotice, GameResult, GameSession,
    InputEvent, MovePolicy, PositionStore, SessionEvent, SessionState,
};
