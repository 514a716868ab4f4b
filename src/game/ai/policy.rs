//! Difficulty-tiered move selection
//!
//! Pure decision function from (position, difficulty) to a move; the
//! only side effect is the engine query it may issue. Randomness comes
//! from an explicitly seedable source so tests can pin the coin flips.

use crate::engine::{EngineError, MoveEngine};
use crate::game::ai::Difficulty;
use crate::game::error::{GameError, GameResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shakmaty::{Chess, Move, MoveList, Position};
use std::time::Duration;
use tracing::debug;

/// Wall-clock allowance for one engine query. Input handling blocks for
/// this long on an engine-backed ply, so it stays short.
pub const ENGINE_TIME_BUDGET: Duration = Duration::from_millis(100);

/// Picks the AI's move according to the difficulty tier
#[derive(Debug)]
pub struct MovePolicy {
    difficulty: Difficulty,
    rng: StdRng,
}

impl MovePolicy {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Policy with a pinned random seed, for deterministic tests
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Decide the AI's move for `position`.
    ///
    /// Precondition: the position is not terminal. Calling this with no
    /// legal moves is a caller bug and reports
    /// [`GameError::InvalidState`].
    ///
    /// An engine move that fails the legality gate propagates as a
    /// protocol error; it is never patched over with a random move.
    pub fn select(&mut self, position: &Chess, engine: &mut dyn MoveEngine) -> GameResult<Move> {
        let legal = position.legal_moves();
        if legal.is_empty() {
            return Err(GameError::InvalidState {
                message: "move requested on a terminal position".to_string(),
            });
        }

        match self.difficulty {
            Difficulty::Easy => Ok(self.random_move(&legal)),
            Difficulty::Medium => {
                if self.rng.random_bool(0.5) {
                    debug!("[AI] coin flip: random move");
                    Ok(self.random_move(&legal))
                } else {
                    debug!("[AI] coin flip: engine move");
                    self.engine_move(position, engine)
                }
            }
            Difficulty::Hard => self.engine_move(position, engine),
        }
    }

    fn random_move(&mut self, legal: &MoveList) -> Move {
        legal[self.rng.random_range(0..legal.len())].clone()
    }

    fn engine_move(&mut self, position: &Chess, engine: &mut dyn MoveEngine) -> GameResult<Move> {
        let mv = engine.best_move(position, ENGINE_TIME_BUDGET)?;
        if !position.is_legal(&mv) {
            return Err(EngineError::Protocol {
                message: format!("engine move {mv:?} is not legal in the queried position"),
            }
            .into());
        }
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::uci::UciMove;
    use shakmaty::{Role, Square};

    /// Engine stub that always answers with the first legal move
    struct FirstLegalEngine {
        calls: usize,
    }

    impl MoveEngine for FirstLegalEngine {
        fn best_move(&mut self, position: &Chess, _budget: Duration) -> Result<Move, EngineError> {
            self.calls += 1;
            Ok(position.legal_moves()[0].clone())
        }
    }

    /// Engine stub that answers with a move from the wrong position
    struct RogueEngine;

    impl MoveEngine for RogueEngine {
        fn best_move(&mut self, _position: &Chess, _budget: Duration) -> Result<Move, EngineError> {
            Ok(Move::Normal {
                role: Role::Pawn,
                from: Square::E2,
                to: Square::E5,
                capture: None,
                promotion: None,
            })
        }
    }

    fn terminal_position() -> Chess {
        // Fool's mate
        let mut pos = Chess::default();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            let mv = uci.parse::<UciMove>().unwrap().to_move(&pos).unwrap();
            pos.play_unchecked(&mv);
        }
        pos
    }

    #[test]
    fn test_easy_never_queries_engine() {
        //! Easy draws from the legal set without touching the engine
        let mut policy = MovePolicy::with_seed(Difficulty::Easy, 7);
        let mut engine = FirstLegalEngine { calls: 0 };
        let position = Chess::default();

        for _ in 0..100 {
            let mv = policy.select(&position, &mut engine).unwrap();
            assert!(position.is_legal(&mv));
        }
        assert_eq!(engine.calls, 0);
    }

    #[test]
    fn test_select_on_terminal_position_is_invalid_state() {
        //! Calling the policy on a finished game is a precondition violation
        let mut policy = MovePolicy::with_seed(Difficulty::Easy, 7);
        let mut engine = FirstLegalEngine { calls: 0 };

        let err = policy.select(&terminal_position(), &mut engine).unwrap_err();
        assert!(matches!(err, GameError::InvalidState { .. }));
    }

    #[test]
    fn test_illegal_engine_move_propagates_protocol_error() {
        //! A rogue engine move is reported, never silently replaced
        let mut policy = MovePolicy::with_seed(Difficulty::Hard, 7);
        let err = policy.select(&Chess::default(), &mut RogueEngine).unwrap_err();
        assert!(matches!(err, GameError::Engine(EngineError::Protocol { .. })));
    }

    #[test]
    fn test_engine_failure_propagates() {
        //! Unavailable engines surface as errors on hard difficulty
        struct DeadEngine;
        impl MoveEngine for DeadEngine {
            fn best_move(&mut self, _: &Chess, _: Duration) -> Result<Move, EngineError> {
                Err(EngineError::Unavailable {
                    message: "gone".to_string(),
                })
            }
        }

        let mut policy = MovePolicy::with_seed(Difficulty::Hard, 7);
        let err = policy.select(&Chess::default(), &mut DeadEngine).unwrap_err();
        assert!(matches!(err, GameError::Engine(EngineError::Unavailable { .. })));
    }
}
