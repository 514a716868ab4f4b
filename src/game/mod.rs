//! Game core: position ownership, interaction state machine, AI policy
//!
//! # Module organization
//!
//! - [`position`] - Position store wrapping the rules collaborator
//!   (board state, move history, terminal queries)
//! - [`session`] - the click/undo/play-again state machine
//! - [`events`] - events crossing the core/surface boundary
//! - [`ai`] - difficulty tiers and the move-selection policy
//! - [`error`] - error taxonomy
//!
//! # Data flow
//!
//! Surface input -> [`session::GameSession`] -> [`position::PositionStore`]
//! -> (on AI turns) [`ai::MovePolicy`] -> [`crate::engine::MoveEngine`]
//! -> back through the store -> terminal check -> [`events::SessionEvent`]s
//! out to the surface.

pub mod ai;
pub mod error;
pub mod events;
pub mod position;
pub mod session;

pub use ai::{Difficulty, GameMode, MovePolicy};
pub use error::{GameError, GameResult};
pub use events::{GameOverNotice, InputEvent, SessionEvent};
pub use position::{GameOutcome, PositionStore};
pub use session::{GameSession, SessionState};
