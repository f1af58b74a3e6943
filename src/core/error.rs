//! Error types for core module
//!
//! Settings persistence and logging setup failures. `Settings::load` turns
//! read errors into defaults; `load_from`, `save` and `init_logging` return
//! them to the caller.

use thiserror::Error;

/// Errors raised by application infrastructure
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings file could not be read or written
    #[error("could not access settings file: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings file is not valid settings JSON
    #[error("settings file is malformed: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// Tracing subscriber could not be installed
    #[error("logging initialisation failed: {message}")]
    Logging { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
