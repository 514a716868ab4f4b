//! Position store: single source of truth for board state and history
//!
//! Wraps the rules collaborator (shakmaty) behind the exact operations
//! the interaction state machine needs. All mutation of the board goes
//! through [`PositionStore::apply`] and [`PositionStore::undo`]; the
//! legal-move set is always recomputed from the live position, never
//! cached across a mutation.

use crate::game::error::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color, Move, MoveList, Outcome, Piece, Position, Role, Square};
use tracing::debug;

/// Result of a game, always derived from the position.
///
/// Serialized in kebab-case for the render surface's game-over payload
/// (`white-wins` / `black-wins` / `draw`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameOutcome {
    InProgress,
    WhiteWins,
    BlackWins,
    Draw,
}

/// Owns the current position and the ordered history of applied moves.
///
/// History length always equals successful `apply` calls minus
/// successful `undo` calls. shakmaty positions carry no undo
/// information, so `undo` restores the prior position by replaying the
/// remaining history from the initial position; this exactly reverses
/// captures, castling rights, and en-passant state.
#[derive(Debug, Clone)]
pub struct PositionStore {
    initial: Chess,
    current: Chess,
    history: Vec<Move>,
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionStore {
    /// Store holding the standard starting position with empty history
    pub fn new() -> Self {
        Self {
            initial: Chess::default(),
            current: Chess::default(),
            history: Vec::new(),
        }
    }

    /// All moves legal for the side to move, recomputed fresh
    pub fn legal_moves(&self) -> MoveList {
        self.current.legal_moves()
    }

    /// Membership test against the current legal-move set
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.legal_moves().contains(mv)
    }

    /// Apply `mv`, appending it to history and flipping the side to move.
    ///
    /// Fails with [`GameError::IllegalMove`] when `mv` is not in the
    /// current legal-move set; the position is untouched in that case.
    pub fn apply(&mut self, mv: Move) -> GameResult<()> {
        if !self.is_legal(&mv) {
            return Err(GameError::IllegalMove { mv });
        }
        self.current.play_unchecked(&mv);
        self.history.push(mv);
        debug!("[BOARD] applied ply {} ({:?} to move)", self.history.len(), self.turn());
        Ok(())
    }

    /// Pop the most recent move, restoring the exact prior position.
    ///
    /// Returns the popped move, or [`GameError::NoHistory`] on an empty
    /// history.
    pub fn undo(&mut self) -> GameResult<Move> {
        let mv = self.history.pop().ok_or(GameError::NoHistory)?;
        let mut replayed = self.initial.clone();
        for past in &self.history {
            replayed.play_unchecked(past);
        }
        self.current = replayed;
        debug!("[BOARD] undid ply {}", self.history.len() + 1);
        Ok(mv)
    }

    /// Back to the initial position with empty history (play again)
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
        self.history.clear();
    }

    pub fn turn(&self) -> Color {
        self.current.turn()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Terminal iff checkmate, stalemate, or insufficient material
    pub fn is_terminal(&self) -> bool {
        self.current.outcome().is_some()
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.current.outcome() {
            Some(Outcome::Decisive { winner: Color::White }) => GameOutcome::WhiteWins,
            Some(Outcome::Decisive { winner: Color::Black }) => GameOutcome::BlackWins,
            Some(Outcome::Draw) => GameOutcome::Draw,
            None => GameOutcome::InProgress,
        }
    }

    /// Read access for the move policy and the engine adapter
    pub fn position(&self) -> &Chess {
        &self.current
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.current.board().piece_at(square)
    }

    /// Full square-to-piece layout for redraw after every transition
    pub fn pieces(&self) -> Vec<(Square, Piece)> {
        Square::ALL
            .iter()
            .filter_map(|&sq| self.piece_at(sq).map(|p| (sq, p)))
            .collect()
    }

    /// Legal destination squares from `from`, for highlighting
    pub fn moves_from(&self, from: Square) -> Vec<Square> {
        self.legal_moves()
            .iter()
            .filter(|m| m.from() == Some(from))
            .map(|m| m.to())
            .collect()
    }

    /// Resolve a click pair to a legal move.
    ///
    /// When several legal moves share the pair (promotion choices), the
    /// queen promotion wins; a click-driven surface has no way to ask
    /// for an under-promotion.
    pub fn find_move(&self, from: Square, to: Square) -> Option<Move> {
        let legal = self.legal_moves();
        let mut candidates = legal
            .iter()
            .filter(|m| m.from() == Some(from) && m.to() == to);

        let first = candidates.next()?.clone();
        if first.promotion().is_none() {
            return Some(first);
        }
        std::iter::once(first.clone())
            .chain(candidates.cloned())
            .find(|m| m.promotion() == Some(Role::Queen))
            .or(Some(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::uci::UciMove;

    fn mv(store: &PositionStore, uci: &str) -> Move {
        uci.parse::<UciMove>()
            .unwrap()
            .to_move(store.position())
            .unwrap()
    }

    #[test]
    fn test_apply_then_undo_restores_legal_moves() {
        //! legal_moves() after apply + undo equals legal_moves() before
        let mut store = PositionStore::new();
        let before: Vec<Move> = store.legal_moves().iter().cloned().collect();

        let e4 = mv(&store, "e2e4");
        store.apply(e4).unwrap();
        store.undo().unwrap();

        let after: Vec<Move> = store.legal_moves().iter().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn test_apply_fails_iff_not_in_legal_set() {
        //! apply rejects exactly the moves outside the legal-move set
        let mut store = PositionStore::new();

        // Legal pawn advance goes through
        let e4 = mv(&store, "e2e4");
        assert!(store.legal_moves().contains(&e4));
        store.apply(e4.clone()).unwrap();

        // The same move is no longer legal for the other side
        assert!(!store.legal_moves().contains(&e4));
        let err = store.apply(e4).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn test_pawn_advance_scenario() {
        //! After 1.e4: black to move, history length 1, game in progress
        let mut store = PositionStore::new();
        let e4 = mv(&store, "e2e4");
        store.apply(e4).unwrap();

        assert_eq!(store.turn(), Color::Black);
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.outcome(), GameOutcome::InProgress);
        assert!(!store.is_terminal());
    }

    #[test]
    fn test_fools_mate_is_terminal_black_wins() {
        //! 1.f3 e5 2.g4 Qh4# ends the game with a black win
        let mut store = PositionStore::new();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            let m = mv(&store, uci);
            store.apply(m).unwrap();
        }
        assert!(store.is_terminal());
        assert_eq!(store.outcome(), GameOutcome::BlackWins);
    }

    #[test]
    fn test_undo_on_empty_history() {
        //! Undo with no history reports NoHistory and changes nothing
        let mut store = PositionStore::new();
        let err = store.undo().unwrap_err();
        assert!(matches!(err, GameError::NoHistory));
        assert_eq!(store.turn(), Color::White);
    }

    #[test]
    fn test_undo_restores_captured_piece() {
        //! Undoing a capture puts the captured pawn back
        let mut store = PositionStore::new();
        for uci in ["e2e4", "d7d5", "e4d5"] {
            let m = mv(&store, uci);
            store.apply(m).unwrap();
        }
        assert!(store.piece_at(Square::D5).is_some());
        assert_eq!(store.piece_at(Square::D5).unwrap().color, Color::White);

        store.undo().unwrap();
        let restored = store.piece_at(Square::D5).unwrap();
        assert_eq!(restored.color, Color::Black);
        assert_eq!(restored.role, Role::Pawn);
        assert!(store.piece_at(Square::E4).is_some());
    }

    #[test]
    fn test_reset_clears_history_and_position() {
        //! reset() returns to the starting position with empty history
        let mut store = PositionStore::new();
        let e4 = mv(&store, "e2e4");
        store.apply(e4).unwrap();

        store.reset();
        assert_eq!(store.history_len(), 0);
        assert_eq!(store.turn(), Color::White);
        assert_eq!(store.pieces().len(), 32);
    }

    #[test]
    fn test_moves_from_starting_knight() {
        //! A starting knight has exactly two destinations
        let store = PositionStore::new();
        let mut targets = store.moves_from(Square::G1);
        targets.sort();
        assert_eq!(targets, vec![Square::F3, Square::H3]);
    }

    #[test]
    fn test_find_move_prefers_queen_promotion() {
        //! A click pair matching several promotions resolves to the queen
        let mut store = PositionStore::new();
        for uci in ["g2g4", "h7h5", "g4h5", "g7g6", "h5g6", "g8f6", "g6g7", "f6e4"] {
            let m = mv(&store, uci);
            store.apply(m).unwrap();
        }
        let promo = store.find_move(Square::G7, Square::H8).unwrap();
        assert_eq!(promo.promotion(), Some(Role::Queen));
    }
}
