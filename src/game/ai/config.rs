//! Game mode and difficulty settings for the AI opponent
//!
//! Fixed at session construction and immutable thereafter. The
//! difficulty controls how often the external engine is consulted, not
//! how long it thinks: every engine query uses the same short time
//! budget, and the weaker tiers dilute the engine with random play.
//!
//! | Difficulty | Engine queries | Strength                     |
//! |------------|----------------|------------------------------|
//! | Easy       | never          | beatable by design           |
//! | Medium     | ~50% of moves  | inconsistent, club-ish       |
//! | Hard       | every move     | whatever the engine delivers |

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Who is playing the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Two humans sharing the board (hot-seat); no engine involved
    HumanVsHuman,

    /// One human against the AI opponent
    VsAi {
        /// The color the AI plays; the other side is human input
        ai_color: Color,
        difficulty: Difficulty,
    },
}

impl GameMode {
    /// Whether the AI owns the ply for `side_to_move`
    pub fn is_ai_turn(&self, side_to_move: Color) -> bool {
        matches!(self, GameMode::VsAi { ai_color, .. } if *ai_color == side_to_move)
    }

    pub fn is_vs_ai(&self) -> bool {
        matches!(self, GameMode::VsAi { .. })
    }
}

/// AI strength tier, selected once at game start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random legal moves; guaranteed beatable, zero engine cost
    Easy,

    /// Fair coin per move between a random move and an engine move.
    /// The flip is independent on every call, so strength is
    /// inconsistent the way an intermediate player is.
    Medium,

    /// Every move comes from the engine
    Hard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_turn_matches_ai_color_only() {
        //! is_ai_turn is true exactly when the side to move is the AI's
        let mode = GameMode::VsAi {
            ai_color: Color::Black,
            difficulty: Difficulty::Medium,
        };
        assert!(mode.is_ai_turn(Color::Black));
        assert!(!mode.is_ai_turn(Color::White));
    }

    #[test]
    fn test_hot_seat_never_has_ai_turn() {
        //! HumanVsHuman owns no plies
        assert!(!GameMode::HumanVsHuman.is_ai_turn(Color::White));
        assert!(!GameMode::HumanVsHuman.is_ai_turn(Color::Black));
        assert!(!GameMode::HumanVsHuman.is_vs_ai());
    }
}
