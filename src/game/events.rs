//! Events crossing the core/surface boundary
//!
//! The render/input surface feeds [`InputEvent`]s in and consumes the
//! [`SessionEvent`]s emitted by each transition. No wire format is
//! prescribed; the game-over payload is serde-ready since it is the one
//! notification a surface typically forwards verbatim.

use crate::game::position::GameOutcome;
use serde::{Deserialize, Serialize};
use shakmaty::{Color, Move, Square};

/// Input accepted from the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A click resolved to a board square by the surface
    Click(Square),
    RequestUndo,
    RequestPlayAgain,
}

/// Terminal-outcome notification payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverNotice {
    pub result: GameOutcome,
}

/// Notifications emitted by the state machine after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A piece was selected; `targets` are the squares to highlight
    Selected { square: Square, targets: Vec<Square> },

    /// Selection and highlights were cleared without a move
    SelectionCleared,

    /// A move was validated and applied
    MoveApplied { mv: Move, color: Color },

    /// The game reached a terminal state
    GameOver(GameOverNotice),

    /// The engine failed; AI play is disabled for the rest of the session
    EngineFault { reason: String },

    /// One or more plies were rewound
    HistoryRewound { plies: usize },

    /// The board was reset to the starting position
    NewGame,
}
