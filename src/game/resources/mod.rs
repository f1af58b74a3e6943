//! Session resources - the mutable state of one game
//!
//! # Resource Categories
//!
//! ## Turn Management
//! - [`GameMode`] / [`Actor`] - which side the human controls, who moves next
//!
//! ## Player Interaction
//! - [`Selection`] - two-click selection state machine
//!
//! ## Game History
//! - [`MoveLog`] - append-only move record with round pairing
//!
//! ## Game Status
//! - [`GameStatus`] - check, checkmate and draw conditions
//!
//! All of them are owned by [`crate::game::session::Session`]; nothing here is
//! global.

pub mod game_over;
pub mod history;
pub mod selection;
pub mod turn;

// Re-export all resources for convenience
pub use game_over::*;
pub use history::*;
pub use selection::*;
pub use turn::*;
