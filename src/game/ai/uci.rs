//! UCI transport for an external engine binary (Stockfish or compatible)
//!
//! The engine runs as a child process. Commands are written to its stdin;
//! its stdout is read line by line on a background thread and forwarded
//! through a channel, so every wait on the engine has a deadline and an
//! unresponsive process becomes an error instead of a hang.
//!
//! # Protocol subset
//!
//! ```text
//! → uci                          ← id name ... / option ... / uciok
//! → isready                      ← readyok
//! → setoption name Hash value 128
//! → position fen <fen>
//! → go depth 18 movetime 1000    ← info ... / bestmove e2e4 [ponder e7e5]
//! → quit
//! ```
//!
//! Stockfish answers an unknown `setoption` with `No such option: <name>`;
//! that line, seen before the following `readyok`, is reported as
//! [`EngineError::Rejected`].

use crate::game::ai::{AnalysisEngine, ParamUpdate};
use crate::game::error::EngineError;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// How long the engine may take to answer `uci` / `isready`
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Extra time granted on top of a search budget before giving up
const SEARCH_GRACE: Duration = Duration::from_secs(5);

/// Search limit used when neither depth nor time budget is set
const FALLBACK_DEPTH: u32 = 10;

/// Running engine process
pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    response_timeout: Duration,
    search_depth: Option<u32>,
    name: Option<String>,
    /// Searches given up on whose `bestmove` has not been read yet
    abandoned_searches: usize,
}

impl UciEngine {
    /// Spawn the engine at `path` and complete the UCI handshake
    ///
    /// # Errors
    ///
    /// `Unavailable` if the binary is missing, not executable, or does not
    /// finish the handshake within `response_timeout`.
    pub fn spawn(path: impl AsRef<Path>, response_timeout: Duration) -> Result<Self, EngineError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(EngineError::Unavailable(format!(
                "engine binary not found at {}",
                path.display()
            )));
        }

        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                EngineError::Unavailable(format!("failed to start {}: {}", path.display(), e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Unavailable("engine stdin not captured".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Unavailable("engine stdout not captured".into()))?;

        let (tx, rx) = crossbeam_channel::unbounded();
        thread::Builder::new()
            .name("uci-reader".into())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })
            .map_err(EngineError::from)?;

        let mut engine = Self {
            child,
            stdin,
            lines: rx,
            response_timeout,
            search_depth: None,
            name: None,
            abandoned_searches: 0,
        };
        engine.handshake()?;
        info!(
            "[ENGINE] Started {} ({})",
            engine.name.as_deref().unwrap_or("unknown engine"),
            path.display()
        );
        Ok(engine)
    }

    /// Engine name announced with `id name`
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        let deadline = Instant::now() + self.response_timeout;
        loop {
            let line = self.next_line(deadline)?;
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = Some(name.trim().to_string());
            } else if line.trim() == "uciok" {
                break;
            }
        }
        self.wait_ready().map(|_| ())
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        trace!("[ENGINE] → {}", command);
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn next_line(&self, deadline: Instant) -> Result<String, EngineError> {
        match self.lines.recv_deadline(deadline) {
            Ok(line) => {
                trace!("[ENGINE] ← {}", line);
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => {
                Err(EngineError::Unavailable("engine did not respond in time".into()))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(EngineError::Unavailable("engine process exited".into()))
            }
        }
    }

    /// Send `isready` and collect every line up to `readyok`
    fn wait_ready(&mut self) -> Result<Vec<String>, EngineError> {
        self.send("isready")?;
        let deadline = Instant::now() + self.response_timeout;
        let mut seen = Vec::new();
        loop {
            let line = self.next_line(deadline)?;
            if line.trim() == "readyok" {
                return Ok(seen);
            }
            if self.consume_stale_bestmove(&line) {
                continue;
            }
            seen.push(line);
        }
    }

    /// Swallow the late answer of an abandoned search
    fn consume_stale_bestmove(&mut self, line: &str) -> bool {
        if self.abandoned_searches > 0 && parse_bestmove(line).is_some() {
            self.abandoned_searches -= 1;
            debug!("[ENGINE] Discarded late reply: {}", line);
            return true;
        }
        false
    }

    fn go_command(&self, budget: Option<Duration>) -> String {
        match (self.search_depth, budget) {
            (Some(depth), Some(budget)) => {
                format!("go depth {} movetime {}", depth, budget.as_millis())
            }
            (None, Some(budget)) => format!("go movetime {}", budget.as_millis()),
            (Some(depth), None) => format!("go depth {}", depth),
            (None, None) => format!("go depth {}", FALLBACK_DEPTH),
        }
    }
}

impl AnalysisEngine for UciEngine {
    fn configure(&mut self, update: &ParamUpdate) -> Result<(), EngineError> {
        let Some(option) = update.option_name() else {
            if let ParamUpdate::SearchDepth(depth) = update {
                self.search_depth = Some(*depth);
            }
            return Ok(());
        };

        self.send(&format!("setoption name {} value {}", option, update.value()))?;
        let replies = self.wait_ready()?;
        if let Some(refusal) = replies.iter().find(|l| is_option_refusal(l)) {
            warn!("[ENGINE] {} refused: {}", option, refusal);
            return Err(EngineError::Rejected {
                option: option.to_string(),
                message: refusal.trim().to_string(),
            });
        }
        debug!("[ENGINE] {} = {}", option, update.value());
        Ok(())
    }

    fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.send(&format!("position fen {}", fen))
    }

    fn best_move(&mut self, budget: Option<Duration>) -> Result<Option<String>, EngineError> {
        let go = self.go_command(budget);
        self.send(&go)?;

        let wait = budget.map_or(self.response_timeout * 6, |b| b + SEARCH_GRACE);
        let deadline = Instant::now() + wait;
        loop {
            let line = match self.next_line(deadline) {
                Ok(line) => line,
                Err(e) => {
                    // the answer to this go may still arrive; it must not be
                    // taken as the reply to the next one
                    self.abandoned_searches += 1;
                    let _ = self.send("stop");
                    return Err(e);
                }
            };
            if self.consume_stale_bestmove(&line) {
                continue;
            }
            if let Some(reply) = parse_bestmove(&line) {
                return Ok(reply);
            }
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send("quit");
        if let Err(e) = self.child.kill() {
            trace!("[ENGINE] kill after quit: {}", e);
        }
        let _ = self.child.wait();
    }
}

/// Parse a `bestmove` line
///
/// Returns `None` for any other line, `Some(None)` for `bestmove (none)`.
pub fn parse_bestmove(line: &str) -> Option<Option<String>> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "bestmove" {
        return None;
    }
    match tokens.next() {
        None | Some("(none)") | Some("0000") => Some(None),
        Some(mv) => Some(Some(mv.to_string())),
    }
}

fn is_option_refusal(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.contains("no such option") || lower.contains("unknown option")
}
