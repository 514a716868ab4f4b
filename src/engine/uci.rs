//! Blocking UCI engine process adapter
//!
//! Owns the engine process for the lifetime of a session: spawned once
//! with the `uci`/`isready` handshake, queried synchronously per move,
//! and terminated on drop no matter how the session ends.

use super::{EngineError, MoveEngine};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, EnPassantMode, Move, Position};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handle to a running UCI engine process
pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    program: String,
}

impl UciEngine {
    /// Spawn the engine process and complete the UCI handshake.
    ///
    /// `program` is the engine executable, typically `stockfish` on the
    /// user's PATH. Fails with [`EngineError::Unavailable`] if the
    /// process cannot be started or never acknowledges the handshake.
    pub fn spawn(program: &str) -> Result<Self, EngineError> {
        let mut child = Command::new(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Unavailable {
                message: format!("failed to start '{program}': {e}"),
            })?;

        let stdin = child.stdin.take().ok_or_else(|| EngineError::Unavailable {
            message: "engine stdin not captured".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| EngineError::Unavailable {
            message: "engine stdout not captured".to_string(),
        })?;

        let mut engine = Self {
            child,
            stdin,
            reader: BufReader::new(stdout),
            program: program.to_string(),
        };

        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;

        info!("[ENGINE] '{}' spawned and ready", engine.program);
        Ok(engine)
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        debug!("[ENGINE] >> {}", command);
        writeln!(self.stdin, "{command}")
            .and_then(|_| self.stdin.flush())
            .map_err(|e| EngineError::Unavailable {
                message: format!("write to '{}' failed: {e}", self.program),
            })
    }

    /// Read one line, trimmed. EOF means the process died on us.
    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| EngineError::Unavailable {
                message: format!("read from '{}' failed: {e}", self.program),
            })?;
        if n == 0 {
            return Err(EngineError::Unavailable {
                message: format!("'{}' closed its output stream", self.program),
            });
        }
        Ok(line.trim().to_string())
    }

    fn wait_for(&mut self, token: &str) -> Result<(), EngineError> {
        loop {
            let line = self.read_line()?;
            if line.starts_with(token) {
                return Ok(());
            }
        }
    }
}

impl MoveEngine for UciEngine {
    fn best_move(&mut self, position: &Chess, budget: Duration) -> Result<Move, EngineError> {
        let fen = Fen::from_position(position.clone(), EnPassantMode::Legal);
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go movetime {}", budget.as_millis()))?;

        loop {
            let line = self.read_line()?;
            if let Some(rest) = line.strip_prefix("bestmove") {
                let token = rest.split_whitespace().next().ok_or_else(|| {
                    EngineError::Protocol {
                        message: "bestmove line carried no move".to_string(),
                    }
                })?;
                return parse_bestmove(token, position);
            }
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        // Ask politely first; some engines flush state on quit.
        let _ = writeln!(self.stdin, "quit");
        let _ = self.stdin.flush();
        std::thread::sleep(Duration::from_millis(50));

        match self.child.try_wait() {
            Ok(Some(status)) => debug!("[ENGINE] '{}' exited: {}", self.program, status),
            _ => {
                warn!("[ENGINE] '{}' did not quit, killing", self.program);
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
    }
}

/// Parse a `bestmove` token and validate it against the position it was
/// requested for. Anything that does not map to a legal move is a
/// protocol violation, never a fallback.
fn parse_bestmove(token: &str, position: &Chess) -> Result<Move, EngineError> {
    let uci: UciMove = token.parse().map_err(|_| EngineError::Protocol {
        message: format!("unparseable bestmove '{token}'"),
    })?;
    let mv = uci.to_move(position).map_err(|_| EngineError::Protocol {
        message: format!("engine returned illegal move '{token}'"),
    })?;
    if !position.is_legal(&mv) {
        return Err(EngineError::Protocol {
            message: format!("engine returned illegal move '{token}'"),
        });
    }
    Ok(mv)
}
