//! Game session - the state of one player's game and every action on it
//!
//! A [`Session`] owns the position, the selection, the move log, the game
//! mode, the board orientation and the engine configuration. Every action
//! takes `&mut self`, so a session has a single writer: while an engine
//! request is outstanding no other mutation can be accepted.
//!
//! # Move flow
//!
//! ```text
//! click(x, y) ─▶ pixel_to_square ─▶ pick(square) ─┐
//! submit_text(raw) ─────────────▶ resolve_move ───┼─▶ rules.apply ─▶ log.append
//! submit_pair(from, to) ────────▶ resolve_move ───┘
//!
//! advance() / request_engine_move()
//!   ─▶ decide_actor ─▶ synchronizer.sync ─▶ engine.best_move ─▶ resolve_move ─▶ apply
//! ```
//!
//! # Failure policy
//!
//! Every error is recovered where it happens and stored as the session's
//! [`Feedback`]. A failed action always leaves the selection `Empty`. An
//! unreachable engine disables automated play until the configuration is
//! changed or a new engine is attached; it never touches the position or
//! the log.

use crate::core::Settings;
use crate::game::ai::{AnalysisEngine, EngineConfig, EngineSynchronizer};
use crate::game::error::{EngineError, GameResult, MoveError};
use crate::game::resolver::{origin_square, resolve_move, MoveInput};
use crate::game::resources::game_over::color_name;
use crate::game::resources::{
    decide_actor, human_may_move, Actor, GameMode, GameStatus, MoveLog, PickOutcome, Selection,
};
use crate::game::rules::{to_coordinate_notation, RulesEngine};
use crate::input::{clamp_to_board, pixel_to_square, Orientation};
use shakmaty::{Move, Role, Square};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// Result of a successful session action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A piece was selected with this many destinations
    Selected { square: Square, candidates: usize },
    /// A move was played
    Played { notation: String, actor: Actor },
    /// Nothing to do (a human turn on `advance`)
    Idle,
}

/// Message describing the last action, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Success(String),
    Failure(MoveError),
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Success(message) => write!(f, "✓ {}", message),
            Feedback::Failure(err) => write!(f, "⚠ {}", err),
        }
    }
}

/// Summary figures for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub plies: usize,
    pub rounds: usize,
    pub finished: bool,
}

/// One interactive game
pub struct Session {
    rules: RulesEngine,
    selection: Selection,
    log: MoveLog,
    mode: GameMode,
    orientation: Orientation,
    board_size: f32,
    think_time: Option<Duration>,
    desired_config: EngineConfig,
    synchronizer: EngineSynchronizer,
    engine: Option<Box<dyn AnalysisEngine>>,
    engine_disabled: bool,
    feedback: Option<Feedback>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("fen", &self.rules.to_fen())
            .field("mode", &self.mode)
            .field("orientation", &self.orientation)
            .field("plies", &self.log.len())
            .field("engine_attached", &self.engine.is_some())
            .field("engine_disabled", &self.engine_disabled)
            .finish()
    }
}

impl Session {
    /// New game without an engine; automated play reports `EngineUnavailable`
    pub fn new(settings: &Settings) -> Self {
        let settings = settings.clone().sanitized();
        Self {
            rules: RulesEngine::new(),
            selection: Selection::default(),
            log: MoveLog::new(),
            mode: settings.game_mode,
            orientation: settings.orientation,
            board_size: settings.board_size_px,
            think_time: settings.think_time(),
            desired_config: settings.engine,
            synchronizer: EngineSynchronizer::default(),
            engine: None,
            engine_disabled: false,
            feedback: None,
        }
    }

    /// New game driven by `engine`
    pub fn with_engine(settings: &Settings, engine: Box<dyn AnalysisEngine>) -> Self {
        let mut session = Self::new(settings);
        session.attach_engine(engine);
        session
    }

    /// Attach (or replace) the engine and re-enable automated play
    ///
    /// The synchronizer snapshot is dropped since the new process has not
    /// seen any configuration yet.
    pub fn attach_engine(&mut self, engine: Box<dyn AnalysisEngine>) {
        self.engine = Some(engine);
        self.engine_disabled = false;
        self.synchronizer.invalidate();
    }

    // ------------------------------------------------------------------
    // Read access for presentation
    // ------------------------------------------------------------------

    pub fn rules(&self) -> &RulesEngine {
        &self.rules
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn board_size(&self) -> f32 {
        self.board_size
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.desired_config
    }

    pub fn last_applied_engine_config(&self) -> Option<&EngineConfig> {
        self.synchronizer.last_applied()
    }

    /// Whether automated play is currently possible
    pub fn engine_available(&self) -> bool {
        self.engine.is_some() && !self.engine_disabled
    }

    pub fn status(&self) -> GameStatus {
        self.rules.status()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.rules.last_move()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            plies: self.log.len(),
            rounds: self.log.round_count(),
            finished: self.rules.is_game_over(),
        }
    }

    // ------------------------------------------------------------------
    // Human input
    // ------------------------------------------------------------------

    /// Pointer click at pixel `(x, y)` on the board image
    pub fn click(&mut self, x: f32, y: f32) -> GameResult<Outcome> {
        let x = clamp_to_board(x, self.board_size);
        let y = clamp_to_board(y, self.board_size);
        let square = pixel_to_square(x, y, self.board_size, self.orientation);
        self.pick(square)
    }

    /// Pick a square: select a piece, or complete the selected piece's move
    pub fn pick(&mut self, square: Square) -> GameResult<Outcome> {
        let result = self
            .selection
            .pick(square, &mut self.rules, &mut self.log, self.mode)
            .map(|outcome| match outcome {
                PickOutcome::Selected { square, candidates } => {
                    Outcome::Selected { square, candidates }
                }
                PickOutcome::Moved { notation } => Outcome::Played {
                    notation,
                    actor: Actor::Human,
                },
            });
        self.record(result)
    }

    /// Move typed as SAN (`Nf3`) or coordinate notation (`g1f3`)
    pub fn submit_text(&mut self, raw: &str) -> GameResult<Outcome> {
        let result = self.play_human(MoveInput::Notation(raw));
        self.record(result)
    }

    /// Move given as an explicit square pair
    pub fn submit_pair(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> GameResult<Outcome> {
        let result = self.play_human(MoveInput::SquarePair {
            from,
            to,
            promotion,
        });
        self.record(result)
    }

    fn play_human(&mut self, input: MoveInput<'_>) -> GameResult<Outcome> {
        self.selection.clear();
        if self.rules.is_game_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        // wrong-turn input is refused before legality is considered
        if !human_may_move(self.mode, self.rules.side_to_move()) {
            if let Some(square) = origin_square(&self.rules, input) {
                return Err(MoveError::NoMovablePieceAtSquare { square });
            }
        }
        let m = resolve_move(&self.rules, input)?;
        self.apply(m, Actor::Human)
    }

    fn apply(&mut self, m: Move, actor: Actor) -> GameResult<Outcome> {
        self.rules.apply(m)?;
        let notation = to_coordinate_notation(&m);
        let ply = self.log.append(notation.clone());
        self.selection.clear();
        info!("[SESSION] ply {} {:?} played {}", ply, actor, notation);
        Ok(Outcome::Played { notation, actor })
    }

    // ------------------------------------------------------------------
    // Session controls
    // ------------------------------------------------------------------

    /// Start over: position, selection and log reset together
    ///
    /// Mode, orientation and engine configuration are kept.
    pub fn new_game(&mut self) {
        self.rules.reset();
        self.selection.clear();
        self.log.clear();
        self.feedback = Some(Feedback::Success("New game".into()));
        info!("[SESSION] New game ({})", self.mode);
    }

    /// Replace the position, resetting selection and log with it
    pub fn load_fen(&mut self, fen: &str) -> GameResult<()> {
        let result = RulesEngine::from_fen(fen).map(|rules| {
            self.rules = rules;
            self.selection.clear();
            self.log.clear();
            info!("[SESSION] Loaded position {}", fen.trim());
        });
        self.record(result)
    }

    /// Change the game mode; any selection is dropped
    pub fn set_mode(&mut self, mode: GameMode) {
        if self.mode != mode {
            info!("[SESSION] Mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
        self.selection.clear();
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Flip the board, returning the new orientation
    pub fn flip_orientation(&mut self) -> Orientation {
        self.orientation = self.orientation.flipped();
        self.orientation
    }

    /// Store a new desired engine configuration
    ///
    /// It is sent to the engine before the next engine move. Changing the
    /// configuration also re-enables automated play after an engine failure.
    pub fn set_engine_config(&mut self, config: EngineConfig) {
        self.desired_config = config.normalized();
        if self.engine_disabled {
            info!("[SESSION] Engine configuration changed; automated play re-enabled");
        }
        self.engine_disabled = false;
    }

    pub fn set_think_time(&mut self, think_time: Option<Duration>) {
        self.think_time = think_time;
    }

    // ------------------------------------------------------------------
    // Turn control and engine play
    // ------------------------------------------------------------------

    /// Who supplies the next move under the current mode
    ///
    /// # Errors
    ///
    /// `GameAlreadyOver` when the position is terminal.
    pub fn next_actor(&self) -> GameResult<Actor> {
        decide_actor(
            self.mode,
            self.rules.side_to_move(),
            self.rules.status(),
            false,
        )
    }

    /// Play one engine move if the mode hands this turn to the engine
    ///
    /// Returns `Outcome::Idle` on a human turn.
    pub fn advance(&mut self) -> GameResult<Outcome> {
        let result = match self.next_actor() {
            Ok(Actor::Engine) => self.play_engine(),
            Ok(Actor::Human) => return Ok(Outcome::Idle),
            Err(e) => Err(e),
        };
        self.record(result)
    }

    /// Manual override: one engine move for the side to move, in any mode
    pub fn request_engine_move(&mut self) -> GameResult<Outcome> {
        let result = decide_actor(
            self.mode,
            self.rules.side_to_move(),
            self.rules.status(),
            true,
        )
        .and_then(|_| self.play_engine());
        self.record(result)
    }

    fn play_engine(&mut self) -> GameResult<Outcome> {
        self.selection.clear();
        if self.engine_disabled {
            return Err(MoveError::EngineUnavailable {
                message: "automated play disabled after an engine failure".into(),
            });
        }
        let Some(engine) = self.engine.as_deref_mut() else {
            return Err(MoveError::EngineUnavailable {
                message: "no engine attached".into(),
            });
        };

        let fen = self.rules.to_fen();
        let side = self.rules.side_to_move();
        info!(
            "[SESSION] Engine thinking for {} (depth {}, skill {})",
            color_name(side),
            self.desired_config.search_depth,
            self.desired_config.skill_level
        );

        let reply = query_engine(
            engine,
            &mut self.synchronizer,
            &self.desired_config,
            &fen,
            self.think_time,
        );
        let text = match reply {
            Ok(Some(text)) => text,
            Ok(None) => {
                return Err(MoveError::EngineUnavailable {
                    message: "engine returned no move".into(),
                })
            }
            Err(e) => {
                if matches!(e, EngineError::Unavailable(_)) {
                    warn!("[SESSION] Disabling automated play: {}", e);
                    self.engine_disabled = true;
                }
                return Err(e.into());
            }
        };

        // The engine's answer goes through the same validation as human input
        let m = resolve_move(&self.rules, MoveInput::Notation(&text))?;
        self.apply(m, Actor::Engine)
    }

    fn record<T>(&mut self, result: GameResult<T>) -> GameResult<T>
    where
        T: Describe,
    {
        match &result {
            Ok(value) => {
                if let Some(message) = value.describe() {
                    self.feedback = Some(Feedback::Success(message));
                }
            }
            Err(e) => {
                warn!("[SESSION] {}", e);
                self.selection.clear();
                self.feedback = Some(Feedback::Failure(e.clone()));
            }
        }
        result
    }
}

fn query_engine(
    engine: &mut dyn AnalysisEngine,
    synchronizer: &mut EngineSynchronizer,
    config: &EngineConfig,
    fen: &str,
    budget: Option<Duration>,
) -> Result<Option<String>, EngineError> {
    synchronizer.sync(engine, config)?;
    engine.set_position(fen)?;
    engine.best_move(budget)
}

/// Success message of an action result
trait Describe {
    fn describe(&self) -> Option<String>;
}

impl Describe for Outcome {
    fn describe(&self) -> Option<String> {
        match self {
            Outcome::Selected { square, candidates } => Some(format!(
                "Selected {} ({} legal moves)",
                square, candidates
            )),
            Outcome::Played { notation, actor } => Some(match actor {
                Actor::Human => format!("Move: {}", notation),
                Actor::Engine => format!("Engine played: {}", notation),
            }),
            Outcome::Idle => None,
        }
    }
}

impl Describe for () {
    fn describe(&self) -> Option<String> {
        Some("Position loaded".into())
    }
}
