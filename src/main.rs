//! Text-mode surface for the clickchess core
//!
//! A deliberately thin consumer of the session's event contract: it
//! maps typed coordinates to clicks, redraws the board after every
//! transition, and forwards the game-over payload. No game logic here.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clickchess::{
    Difficulty, GameOutcome, GameSession, InputEvent, SessionEvent, SessionState, UciEngine,
};
use shakmaty::{Color, Piece, Role, Square};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Two humans sharing the board
    Friend,
    /// Play against the AI
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Interactive chess against a friend or a UCI engine
#[derive(Parser, Debug)]
#[command(name = "clickchess", version)]
struct Args {
    #[arg(long, value_enum, default_value_t = Mode::Ai)]
    mode: Mode,

    /// AI strength tier (AI mode only)
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Which color the AI plays (AI mode only)
    #[arg(long, value_enum, default_value_t = Side::Black)]
    ai_side: Side,

    /// UCI engine executable
    #[arg(long, default_value = "stockfish")]
    engine: String,

    /// Pin the move policy's random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut session = match args.mode {
        Mode::Friend => GameSession::hot_seat(),
        Mode::Ai => {
            let engine = UciEngine::spawn(&args.engine)
                .with_context(|| format!("cannot start engine '{}'", args.engine))?;
            let ai_color = args.ai_side.into();
            match args.seed {
                Some(seed) => {
                    GameSession::vs_ai_seeded(ai_color, args.difficulty, Box::new(engine), seed)
                }
                None => GameSession::vs_ai(ai_color, args.difficulty, Box::new(engine)),
            }
        }
    };

    let events = session.start();
    report(&events);
    draw(&session);

    println!("commands: a square like e2, undo, new, quit");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim().to_lowercase();

        let event = match input.as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "undo" => InputEvent::RequestUndo,
            "new" => InputEvent::RequestPlayAgain,
            text => match text.parse::<Square>() {
                Ok(square) => InputEvent::Click(square),
                Err(_) => {
                    println!("unrecognized input '{text}' (square, undo, new, quit)");
                    continue;
                }
            },
        };

        let events = session.handle(event);
        report(&events);
        draw(&session);
    }

    println!("Thanks for playing!");
    Ok(())
}

/// Print the notifications a GUI would surface as dialogs
fn report(events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::MoveApplied { mv, color } => {
                println!("{color:?} played {}", mv.to_uci(shakmaty::CastlingMode::Standard));
            }
            SessionEvent::GameOver(notice) => {
                let message = match notice.result {
                    GameOutcome::WhiteWins => "White wins!",
                    GameOutcome::BlackWins => "Black wins!",
                    GameOutcome::Draw => "Draw!",
                    GameOutcome::InProgress => unreachable!("game-over notice while in progress"),
                };
                println!("Game over: {message}");
                if let Ok(payload) = serde_json::to_string(notice) {
                    println!("{payload}");
                }
            }
            SessionEvent::EngineFault { reason } => {
                println!("engine failed, AI disabled for this session: {reason}");
            }
            SessionEvent::HistoryRewound { plies } => println!("rewound {plies} ply(ies)"),
            SessionEvent::NewGame => println!("new game"),
            SessionEvent::Selected { .. } | SessionEvent::SelectionCleared => {}
        }
    }
}

/// Redraw the whole board, marking highlighted destinations with dots
fn draw(session: &GameSession) {
    let mut stdout = io::stdout().lock();
    let layout = session.pieces();
    let highlights = session.highlights();

    for rank in (0..8).rev() {
        let _ = write!(stdout, "{} ", rank + 1);
        for file in 0..8 {
            let square = Square::new((rank * 8 + file) as u32);
            let cell = layout
                .iter()
                .find(|(sq, _)| *sq == square)
                .map(|(_, piece)| glyph(*piece))
                .unwrap_or(if highlights.contains(&square) { '·' } else { '.' });
            let _ = write!(stdout, "{cell} ");
        }
        let _ = writeln!(stdout);
    }
    let _ = writeln!(stdout, "  a b c d e f g h");

    match session.state() {
        SessionState::GameOver(_) => {}
        SessionState::PieceSelected(sq) => {
            let _ = writeln!(stdout, "{:?} to move, {} selected", session.turn(), sq);
        }
        _ => {
            let _ = writeln!(stdout, "{:?} to move", session.turn());
        }
    }
}

fn glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::Pawn) => '♙',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::King) => '♔',
        (Color::Black, Role::Pawn) => '♟',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::King) => '♚',
    }
}
