//! Text front-end for a chess session
//!
//! Reads one command per line from stdin and prints the board, the move
//! log and the result of each action.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shakmaty::{Role, Square};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use titan_chess::core::{init_logging, Settings};
use titan_chess::game::ai::resource::{DEPTH_RANGE, SKILL_RANGE};
use titan_chess::game::ai::UciEngine;
use titan_chess::game::resources::{GameMode, SelectionState};
use titan_chess::game::Session;
use titan_chess::input::{square_to_pixel_center, Orientation};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Sandbox,
    White,
    Black,
}

impl From<ModeArg> for GameMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Sandbox => GameMode::Sandbox,
            ModeArg::White => GameMode::HumanAsWhite,
            ModeArg::Black => GameMode::HumanAsBlack,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "titan-chess", version, about = "Play chess against or alongside a UCI engine")]
struct Cli {
    /// Path to the UCI engine binary
    #[arg(long)]
    engine_path: Option<PathBuf>,

    /// Search depth
    #[arg(long)]
    depth: Option<u32>,

    /// Skill level (0-20)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=20))]
    skill: Option<u8>,

    /// Engine threads
    #[arg(long)]
    threads: Option<u32>,

    /// Engine hash size in MB
    #[arg(long)]
    hash: Option<u32>,

    /// Thinking time per engine move in milliseconds (0 = depth only)
    #[arg(long)]
    think_ms: Option<u64>,

    /// Game mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Start with black at the bottom
    #[arg(long)]
    flipped: bool,

    /// Starting position
    #[arg(long)]
    fen: Option<String>,

    /// Play without an engine
    #[arg(long)]
    no_engine: bool,

    /// Write the effective settings to the settings file and continue
    #[arg(long)]
    save_settings: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log: String,
}

impl Cli {
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(path) = &self.engine_path {
            settings.engine_path = path.clone();
        }
        if let Some(depth) = self.depth {
            settings.engine.search_depth = depth;
        }
        if let Some(skill) = self.skill {
            settings.engine.skill_level = skill;
        }
        if let Some(threads) = self.threads {
            settings.engine.thread_count = threads;
        }
        if let Some(hash) = self.hash {
            settings.engine.hash_size_mb = hash;
        }
        if let Some(ms) = self.think_ms {
            settings.think_time_ms = ms;
        }
        if let Some(mode) = self.mode {
            settings.game_mode = mode.into();
        }
        if self.flipped {
            settings.orientation = Orientation::BlackAtBottom;
        }
    }
}

const HELP: &str = "\
commands:
  <move>             play SAN (Nf3) or coordinate (g1f3) notation
  click <x> <y>      click the board image at pixel x,y
  pick <square>      select / target a square (e2)
  pair <from> <to> [q|r|b|n]
  engine             ask the engine for a move now
  mode sandbox|white|black
  depth <n> | skill <n>
  flip | new | fen <fen> | log | board | status | help | quit";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log).context("initialising logging")?;

    let mut settings = Settings::load();
    cli.apply_to(&mut settings);
    let settings = settings.sanitized();
    if cli.save_settings {
        let path = settings.save().context("saving settings")?;
        println!("settings written to {}", path.display());
    }

    let mut session = Session::new(&settings);
    if !cli.no_engine {
        match UciEngine::spawn(&settings.engine_path, settings.response_timeout()) {
            Ok(engine) => {
                info!("[MAIN] Engine: {}", engine.name().unwrap_or("unnamed"));
                session.attach_engine(Box::new(engine));
            }
            Err(e) => {
                warn!("[MAIN] {}", e);
                println!("engine not loaded ({}); manual play only", e);
            }
        }
    }
    if let Some(fen) = &cli.fen {
        session.load_fen(fen).context("loading --fen position")?;
    }

    run(&mut session)
}

fn run(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    // the engine may own the first move
    engine_reply(session);
    render(session, &mut out)?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        let engine_may_move = dispatch(session, line, &mut out)?;
        if engine_may_move {
            engine_reply(session);
        }
        render(session, &mut out)?;
    }
    Ok(())
}

fn engine_reply(session: &mut Session) {
    if !session.status().is_game_over() {
        let _ = session.advance();
    }
}

/// Run one command, returning whether the engine may now be on move
fn dispatch(session: &mut Session, line: &str, out: &mut impl Write) -> Result<bool> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    match (command, args.as_slice()) {
        ("help", _) => writeln!(out, "{}", HELP)?,
        ("board", _) | ("status", _) => {}
        ("log", _) => writeln!(out, "{}", session.log().as_pgn_text())?,
        ("new", _) => {
            session.new_game();
            return Ok(true);
        }
        ("flip", _) => {
            session.flip_orientation();
        }
        ("engine", _) => {
            let _ = session.request_engine_move();
        }
        ("fen", []) => writeln!(out, "{}", session.rules().to_fen())?,
        ("fen", _) => {
            let fen = line.trim_start_matches("fen").trim();
            return Ok(session.load_fen(fen).is_ok());
        }
        ("mode", [mode]) => match parse_mode(mode) {
            Some(mode) => {
                session.set_mode(mode);
                writeln!(out, "mode: {}", mode)?;
                return Ok(true);
            }
            None => writeln!(out, "unknown mode {:?}", mode)?,
        },
        ("depth", [n]) | ("skill", [n]) => match n.parse::<u32>() {
            Ok(n) => {
                let mut config = *session.engine_config();
                if command == "depth" {
                    config.search_depth = n.clamp(*DEPTH_RANGE.start(), *DEPTH_RANGE.end());
                } else {
                    let skill = n.min(u32::from(*SKILL_RANGE.end()));
                    config.skill_level = u8::try_from(skill).unwrap_or(*SKILL_RANGE.end());
                }
                session.set_engine_config(config);
            }
            Err(_) => writeln!(out, "expected a number")?,
        },
        ("click", [x, y]) => match (x.parse::<f32>(), y.parse::<f32>()) {
            (Ok(x), Ok(y)) => {
                let _ = session.click(x, y);
                return Ok(true);
            }
            _ => writeln!(out, "expected pixel coordinates")?,
        },
        ("pick", [square]) => match square.parse::<Square>() {
            Ok(square) => {
                let _ = session.pick(square);
                return Ok(true);
            }
            Err(_) => writeln!(out, "not a square: {}", square)?,
        },
        ("pair", [from, to, rest @ ..]) => {
            let promotion = rest.first().and_then(|p| p.chars().next()).and_then(Role::from_char);
            match (from.parse::<Square>(), to.parse::<Square>()) {
                (Ok(from), Ok(to)) => {
                    let _ = session.submit_pair(from, to, promotion);
                    return Ok(true);
                }
                _ => writeln!(out, "expected two squares")?,
            }
        }
        _ => {
            let _ = session.submit_text(line);
            return Ok(true);
        }
    }
    Ok(false)
}

fn parse_mode(text: &str) -> Option<GameMode> {
    match text {
        "sandbox" => Some(GameMode::Sandbox),
        "white" => Some(GameMode::HumanAsWhite),
        "black" => Some(GameMode::HumanAsBlack),
        _ => None,
    }
}

fn render(session: &Session, out: &mut impl Write) -> Result<()> {
    let rules = session.rules();
    let orientation = session.orientation();
    let size = session.board_size();
    let (selected, candidates) = match session.selection().state() {
        SelectionState::PieceSelected {
            square,
            candidate_destinations,
        } => (Some(*square), Some(candidate_destinations)),
        SelectionState::Empty => (None, None),
    };

    writeln!(out)?;
    let mut cells: Vec<(f32, f32, Square)> = Square::ALL
        .iter()
        .map(|&sq| {
            let (x, y) = square_to_pixel_center(sq, size, orientation);
            (y, x, sq)
        })
        .collect();
    cells.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    for row in cells.chunks(8) {
        let rank = row[0].2.rank();
        write!(out, "{} ", rank.char())?;
        for &(_, _, square) in row {
            let glyph = rules.piece_at(square).map_or('.', |p| p.char());
            let marker = if selected == Some(square) {
                '['
            } else if candidates.is_some_and(|c| c.contains(&square)) {
                '*'
            } else {
                ' '
            };
            write!(out, "{}{}", marker, glyph)?;
        }
        writeln!(out)?;
    }
    let files: String = cells[..8]
        .iter()
        .map(|&(_, _, sq)| format!(" {}", sq.file().char()))
        .collect();
    writeln!(out, " {}", files)?;

    let stats = session.stats();
    writeln!(
        out,
        "{} | {} to move | {} | plies {} rounds {}",
        session.mode(),
        if rules.side_to_move().is_white() { "White" } else { "Black" },
        session.status(),
        stats.plies,
        stats.rounds
    )?;
    if let Some(last) = session.log().last() {
        writeln!(out, "last move: {}", last.notation)?;
    }
    if let Some(feedback) = session.feedback() {
        writeln!(out, "{}", feedback)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use titan_chess::game::ai::{AnalysisEngine, ParamUpdate};
    use titan_chess::game::EngineError;

    /// Always opens with the same move
    struct Opener;

    impl AnalysisEngine for Opener {
        fn configure(&mut self, _update: &ParamUpdate) -> Result<(), EngineError> {
            Ok(())
        }

        fn set_position(&mut self, _fen: &str) -> Result<(), EngineError> {
            Ok(())
        }

        fn best_move(&mut self, _budget: Option<Duration>) -> Result<Option<String>, EngineError> {
            Ok(Some("e2e4".into()))
        }
    }

    fn engine_as_white() -> Session {
        let settings = Settings {
            game_mode: GameMode::HumanAsBlack,
            ..Settings::default()
        };
        Session::with_engine(&settings, Box::new(Opener))
    }

    fn run_line(session: &mut Session, line: &str) -> bool {
        let mut out = Vec::new();
        let engine_may_move = dispatch(session, line, &mut out).expect("dispatch");
        if engine_may_move {
            engine_reply(session);
        }
        engine_may_move
    }

    #[test]
    fn test_engine_opens_after_new_game() {
        let mut session = engine_as_white();
        engine_reply(&mut session);
        assert_eq!(session.log().as_flat_sequence(), vec!["e2e4"]);

        assert!(run_line(&mut session, "new"));
        assert_eq!(session.log().as_flat_sequence(), vec!["e2e4"]);
    }

    #[test]
    fn test_engine_opens_after_loading_a_position() {
        let mut session = engine_as_white();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

        assert!(run_line(&mut session, &format!("fen {}", fen)));
        assert_eq!(session.log().as_flat_sequence(), vec!["e2e4"]);

        // a rejected position leaves the turn alone
        assert!(!run_line(&mut session, "fen not a position"));
    }

    #[test]
    fn test_read_only_commands_do_not_wake_the_engine() {
        let mut session = engine_as_white();
        assert!(!run_line(&mut session, "log"));
        assert!(!run_line(&mut session, "board"));
        assert!(session.log().is_empty());
    }
}
