//! Core module - application infrastructure
//!
//! - [`Settings`] - user preferences, persisted as JSON
//! - [`CoreError`] - settings and logging failures
//! - [`init_logging`] - tracing subscriber setup for binaries

pub mod error;
pub mod logging;
pub mod settings_persistence;

pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use settings_persistence::Settings;
