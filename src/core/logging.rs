//! Logging initialisation
//!
//! Installs a `tracing-subscriber` formatter filtered by `RUST_LOG`, or by
//! the given default directive when `RUST_LOG` is unset.

use crate::core::error::{CoreError, CoreResult};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `default_directive` is used when `RUST_LOG` is not set, e.g. `"info"` or
/// `"titan_chess=debug"`.
pub fn init_logging(default_directive: &str) -> CoreResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| CoreError::Logging {
            message: e.to_string(),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CoreError::Logging {
            message: e.to_string(),
        })
}
