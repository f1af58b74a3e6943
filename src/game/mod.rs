//! Chess game logic module - interactive move resolution and session control
//!
//! Chess rules themselves live in `shakmaty`; this module decides what the
//! player's input means and who moves next.
//!
//! # Module Organization
//!
//! - `rules` - position handle over `shakmaty` (legal moves, apply, status, FEN)
//! - `resolver` - raw text or square pair → one legal move
//! - `resources` - selection state machine, move log, game mode, game status
//! - `ai` - engine configuration, synchronizer and UCI transport
//! - `session` - [`Session`], the single owner of a game's state
//! - `error` - [`MoveError`] taxonomy
//!
//! # Data flow
//!
//! 1. Pointer or text input is mapped/resolved into a legal move
//! 2. The move is applied to the position and appended to the log
//! 3. The turn controller decides whether the engine moves next
//! 4. Engine configuration is synchronized and the engine is queried
//! 5. The engine's move goes through the same resolution and is applied

pub mod ai;
pub mod error;
pub mod resolver;
pub mod resources;
pub mod rules;
pub mod session;

pub use error::{EngineError, GameResult, MoveError};
pub use resolver::{origin_square, resolve_move, MoveInput, DEFAULT_PROMOTION};
pub use rules::RulesEngine;
pub use session::{Feedback, Outcome, Session, SessionStats};
