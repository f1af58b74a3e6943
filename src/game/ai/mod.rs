//! Analysis engine integration
//!
//! The engine is an external process; the session only needs three
//! capabilities from it, captured by [`AnalysisEngine`]:
//!
//! 1. apply a parameter update
//! 2. set the position to analyse (FEN)
//! 3. return a best move, optionally within a time budget
//!
//! # Architecture
//!
//! - `resource`: [`EngineConfig`] and the [`EngineSynchronizer`] snapshot
//! - `uci`: [`UciEngine`], the production transport over a child process
//!
//! Engine replies are never trusted blindly: the session resolves the
//! returned coordinate move against the live legal move list before playing
//! it, exactly like human input.

use crate::game::error::EngineError;
use std::time::Duration;

pub mod resource;
pub mod uci;

// Re-export for convenience
pub use resource::{sync_if_needed, EngineConfig, EngineSynchronizer, ParamUpdate};
pub use uci::UciEngine;

/// Capability set of an analysis engine process
pub trait AnalysisEngine {
    /// Apply one parameter update
    fn configure(&mut self, update: &ParamUpdate) -> Result<(), EngineError>;

    /// Set the position to analyse
    fn set_position(&mut self, fen: &str) -> Result<(), EngineError>;

    /// Best move in coordinate notation, `None` when the engine has no move
    ///
    /// Blocks until the engine answers; with a budget the engine is expected
    /// to answer at or before it.
    fn best_move(&mut self, budget: Option<Duration>) -> Result<Option<String>, EngineError>;
}
