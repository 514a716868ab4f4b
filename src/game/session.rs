//! Interaction state machine
//!
//! Arbitrates turns between clicks and the AI opponent: owns the
//! selection lifecycle, validates user intent against the legal-move
//! set before any mutation, triggers AI replies, detects terminal
//! states, and exposes undo/play-again.
//!
//! Everything runs on the caller's thread. An AI reply blocks the event
//! handler for at most the engine time budget, which is why the budget
//! is short; there is no background work and no mid-flight cancellation.

use crate::engine::MoveEngine;
use crate::game::ai::{Difficulty, GameMode, MovePolicy};
use crate::game::error::GameError;
use crate::game::events::{GameOverNotice, InputEvent, SessionEvent};
use crate::game::position::{GameOutcome, PositionStore};
use shakmaty::{Color, Piece, Square};
use tracing::{debug, error, info};

/// Where the state machine currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No selection; waiting for the side to move to pick a piece
    Idle,

    /// A piece of the side to move is selected; destinations highlighted
    PieceSelected(Square),

    /// The AI owns the ply. Only observable mid-handler, since the
    /// engine query blocks the caller.
    AwaitingAi,

    /// Terminal position reached; move input is ignored
    GameOver(GameOutcome),
}

/// One game of chess between a human and either another human or the AI.
///
/// Input comes in through [`GameSession::handle`] (or the per-event
/// methods); every transition returns the notifications the surface
/// needs. Board layout and highlights are readable at any time for
/// redraw.
pub struct GameSession {
    store: PositionStore,
    mode: GameMode,
    policy: Option<MovePolicy>,
    engine: Option<Box<dyn MoveEngine>>,
    state: SessionState,
    highlights: Vec<Square>,
    ai_disabled: bool,
}

impl GameSession {
    /// Two humans sharing the board; no engine is ever consulted
    pub fn hot_seat() -> Self {
        Self::assemble(GameMode::HumanVsHuman, None, None)
    }

    /// Human against the AI. The engine backs the medium/hard tiers and
    /// lives exactly as long as the session.
    pub fn vs_ai(ai_color: Color, difficulty: Difficulty, engine: Box<dyn MoveEngine>) -> Self {
        Self::assemble(
            GameMode::VsAi {
                ai_color,
                difficulty,
            },
            Some(MovePolicy::new(difficulty)),
            Some(engine),
        )
    }

    /// [`GameSession::vs_ai`] with a pinned policy seed, for
    /// deterministic tests
    pub fn vs_ai_seeded(
        ai_color: Color,
        difficulty: Difficulty,
        engine: Box<dyn MoveEngine>,
        seed: u64,
    ) -> Self {
        Self::assemble(
            GameMode::VsAi {
                ai_color,
                difficulty,
            },
            Some(MovePolicy::with_seed(difficulty, seed)),
            Some(engine),
        )
    }

    fn assemble(
        mode: GameMode,
        policy: Option<MovePolicy>,
        engine: Option<Box<dyn MoveEngine>>,
    ) -> Self {
        Self {
            store: PositionStore::new(),
            mode,
            policy,
            engine,
            state: SessionState::Idle,
            highlights: Vec::new(),
            ai_disabled: false,
        }
    }

    /// Kick off the game: if the AI owns the opening move it plays it
    /// here. Call once after construction.
    pub fn start(&mut self) -> Vec<SessionEvent> {
        if self.ai_owns_turn() {
            self.run_ai_turn()
        } else {
            Vec::new()
        }
    }

    /// Dispatch one surface event
    pub fn handle(&mut self, event: InputEvent) -> Vec<SessionEvent> {
        match event {
            InputEvent::Click(square) => self.click(square),
            InputEvent::RequestUndo => self.request_undo(),
            InputEvent::RequestPlayAgain => self.request_play_again(),
        }
    }

    /// A click resolved to `square` by the surface
    pub fn click(&mut self, square: Square) -> Vec<SessionEvent> {
        match self.state {
            SessionState::GameOver(_) => {
                debug!("[INPUT] click on {} ignored, game is over", square);
                Vec::new()
            }
            SessionState::AwaitingAi => Vec::new(),
            SessionState::Idle => self.try_select(square),
            SessionState::PieceSelected(from) => self.try_move(from, square),
        }
    }

    /// Rewind the last decision. In AI mode this pops the paired
    /// human+AI plies so control always returns to a human decision
    /// point; with empty history the request is silently ignored.
    pub fn request_undo(&mut self) -> Vec<SessionEvent> {
        if self.store.undo().is_err() {
            debug!("[INPUT] undo ignored, no history");
            return Vec::new();
        }
        let mut plies = 1;
        if self.mode.is_vs_ai() && self.ai_to_move() && self.store.undo().is_ok() {
            plies = 2;
        }

        self.highlights.clear();
        self.state = SessionState::Idle;
        info!("[GAME] rewound {} ply(ies), {:?} to move", plies, self.store.turn());

        let mut events = vec![SessionEvent::HistoryRewound { plies }];
        // AI had the opening move and we rewound past it; it replays.
        if self.ai_owns_turn() {
            events.extend(self.run_ai_turn());
        }
        events
    }

    /// Reset to the starting position; the AI replays its opening move
    /// if it has one
    pub fn request_play_again(&mut self) -> Vec<SessionEvent> {
        self.store.reset();
        self.highlights.clear();
        self.state = SessionState::Idle;
        info!("[GAME] board reset for a new game");

        let mut events = vec![SessionEvent::NewGame];
        if self.ai_owns_turn() {
            events.extend(self.run_ai_turn());
        }
        events
    }

    // --- accessors for the surface ---

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn turn(&self) -> Color {
        self.store.turn()
    }

    pub fn outcome(&self) -> GameOutcome {
        self.store.outcome()
    }

    pub fn history_len(&self) -> usize {
        self.store.history_len()
    }

    /// Full piece layout for redraw
    pub fn pieces(&self) -> Vec<(Square, Piece)> {
        self.store.pieces()
    }

    /// Destination squares to highlight while a piece is selected
    pub fn highlights(&self) -> &[Square] {
        &self.highlights
    }

    /// True once an engine fault has made AI play unusable
    pub fn ai_disabled(&self) -> bool {
        self.ai_disabled
    }

    // --- transitions ---

    fn try_select(&mut self, square: Square) -> Vec<SessionEvent> {
        match self.store.piece_at(square) {
            Some(piece) if piece.color == self.store.turn() => {
                let targets = self.store.moves_from(square);
                debug!(
                    "[INPUT] selected {:?} on {} ({} targets)",
                    piece.role,
                    square,
                    targets.len()
                );
                self.highlights = targets.clone();
                self.state = SessionState::PieceSelected(square);
                vec![SessionEvent::Selected { square, targets }]
            }
            _ => {
                debug!("[INPUT] click on {} ignored (empty or wrong color)", square);
                Vec::new()
            }
        }
    }

    fn try_move(&mut self, from: Square, to: Square) -> Vec<SessionEvent> {
        self.highlights.clear();
        self.state = SessionState::Idle;

        // A click on the selected square itself falls out here too:
        // no legal move has equal endpoints.
        let Some(mv) = self.store.find_move(from, to) else {
            debug!("[INPUT] {} -> {} is not legal, selection cleared", from, to);
            return vec![SessionEvent::SelectionCleared];
        };

        let color = self.store.turn();
        if let Err(err) = self.store.apply(mv.clone()) {
            // find_move only yields members of the legal set
            error!("[GAME] apply refused a matched move: {err}");
            return vec![SessionEvent::SelectionCleared];
        }
        info!("[GAME] {:?} played {:?}", color, mv);

        let mut events = vec![SessionEvent::MoveApplied { mv, color }];
        events.extend(self.after_ply());
        events
    }

    /// Common tail of every applied ply: terminal check, then hand the
    /// turn to the AI when it owns it.
    fn after_ply(&mut self) -> Vec<SessionEvent> {
        if self.store.is_terminal() {
            let outcome = self.store.outcome();
            self.state = SessionState::GameOver(outcome);
            info!("[GAME] game over: {:?}", outcome);
            return vec![SessionEvent::GameOver(GameOverNotice { result: outcome })];
        }
        if self.ai_owns_turn() {
            return self.run_ai_turn();
        }
        self.state = SessionState::Idle;
        Vec::new()
    }

    fn run_ai_turn(&mut self) -> Vec<SessionEvent> {
        self.state = SessionState::AwaitingAi;

        let (Some(policy), Some(engine)) = (self.policy.as_mut(), self.engine.as_mut()) else {
            error!("[AI] AI turn without policy/engine");
            self.state = SessionState::Idle;
            return Vec::new();
        };

        let color = self.store.turn();
        let selected = policy.select(self.store.position(), engine.as_mut());
        match selected {
            Ok(mv) => {
                if let Err(err) = self.store.apply(mv.clone()) {
                    error!("[AI] policy produced a move the store refused: {err}");
                    self.state = SessionState::Idle;
                    return Vec::new();
                }
                info!("[AI] {:?} played {:?}", color, mv);
                let mut events = vec![SessionEvent::MoveApplied { mv, color }];
                events.extend(self.after_ply());
                events
            }
            Err(GameError::Engine(fault)) => {
                error!("[AI] engine fault, disabling AI for this session: {fault}");
                self.ai_disabled = true;
                self.state = SessionState::Idle;
                vec![SessionEvent::EngineFault {
                    reason: fault.to_string(),
                }]
            }
            Err(err) => {
                error!("[AI] move selection failed: {err}");
                self.state = SessionState::Idle;
                Vec::new()
            }
        }
    }

    fn ai_owns_turn(&self) -> bool {
        !self.ai_disabled && !self.store.is_terminal() && self.ai_to_move()
    }

    fn ai_to_move(&self) -> bool {
        self.mode.is_ai_turn(self.store.turn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Square;

    #[test]
    fn test_idle_click_on_empty_square_is_noop() {
        //! Clicking an empty square in Idle changes nothing and emits
        //! no highlight
        let mut session = GameSession::hot_seat();
        let events = session.click(Square::E4);
        assert!(events.is_empty());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.highlights().is_empty());
    }

    #[test]
    fn test_idle_click_on_opponent_piece_is_noop() {
        //! White to move; clicking a black piece selects nothing
        let mut session = GameSession::hot_seat();
        let events = session.click(Square::E7);
        assert!(events.is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_selecting_own_piece_highlights_destinations() {
        //! Selecting the e2 pawn highlights e3 and e4
        let mut session = GameSession::hot_seat();
        let events = session.click(Square::E2);

        assert_eq!(session.state(), SessionState::PieceSelected(Square::E2));
        let mut highlighted = session.highlights().to_vec();
        highlighted.sort();
        assert_eq!(highlighted, vec![Square::E3, Square::E4]);
        assert!(matches!(events[0], SessionEvent::Selected { square: Square::E2, .. }));
    }

    #[test]
    fn test_clicking_selected_square_clears_selection() {
        //! A second click on the same square deselects instead of toggling
        let mut session = GameSession::hot_seat();
        session.click(Square::E2);
        let events = session.click(Square::E2);

        assert_eq!(events, vec![SessionEvent::SelectionCleared]);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.highlights().is_empty());
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn test_illegal_target_clears_selection_without_moving() {
        //! A pawn cannot jump two ranks diagonally; the click clears the
        //! selection and leaves the position untouched
        let mut session = GameSession::hot_seat();
        session.click(Square::E2);
        let events = session.click(Square::G4);

        assert_eq!(events, vec![SessionEvent::SelectionCleared]);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.turn(), Color::White);
    }

    #[test]
    fn test_legal_move_applies_and_flips_turn() {
        //! e2-e4 goes through: history grows, black to move, hot-seat
        //! returns to Idle
        let mut session = GameSession::hot_seat();
        session.click(Square::E2);
        let events = session.click(Square::E4);

        assert!(matches!(events[0], SessionEvent::MoveApplied { color: Color::White, .. }));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.history_len(), 1);
        assert_eq!(session.turn(), Color::Black);
        assert_eq!(session.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn test_undo_with_empty_history_is_ignored() {
        //! The undo button does nothing before the first move
        let mut session = GameSession::hot_seat();
        let events = session.request_undo();
        assert!(events.is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }
}
