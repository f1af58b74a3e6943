//! Settings and their persistence
//!
//! [`Settings`] carries every user-tunable value of a session: engine
//! location and strength, think time, board geometry, initial game mode
//! and orientation. They are stored as JSON.
//!
//! # File Location
//!
//! `settings.json` in the user's configuration directory, e.g.
//! `~/.config/TitanChess/settings.json` on Linux. Falls back to
//! `./settings.json` when no config directory can be resolved.
//!
//! # Error Handling
//!
//! - [`Settings::load`] never fails: a missing or invalid file falls back
//!   to defaults with a log line
//! - [`Settings::load_from`] and [`Settings::save_to`] return [`CoreResult`]

use crate::core::error::CoreResult;
use crate::game::ai::uci::DEFAULT_RESPONSE_TIMEOUT;
use crate::game::ai::EngineConfig;
use crate::game::resources::GameMode;
use crate::input::Orientation;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// User preferences for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path to the UCI engine binary
    pub engine_path: PathBuf,

    /// Strength and resource knobs sent to the engine
    pub engine: EngineConfig,

    /// Thinking time per engine move in milliseconds, 0 for depth-only search
    pub think_time_ms: u64,

    /// How long the engine may take to answer handshake and option commands
    pub response_timeout_ms: u64,

    /// Side length of the rendered board in pixels
    pub board_size_px: f32,

    /// Mode a new session starts in
    pub game_mode: GameMode,

    /// Orientation a new session starts in
    pub orientation: Orientation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine_path: PathBuf::from("./stockfish"),
            engine: EngineConfig::default(),
            think_time_ms: 1000,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT.as_millis() as u64,
            board_size_px: 650.0,
            game_mode: GameMode::default(),
            orientation: Orientation::default(),
        }
    }
}

impl Settings {
    /// Resolve the settings file path
    pub fn settings_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "titan", "TitanChess") {
            proj_dirs.config_dir().join(SETTINGS_FILENAME)
        } else {
            // Fallback to current directory
            PathBuf::from(SETTINGS_FILENAME)
        }
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::settings_path();
        if !path.exists() {
            info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                info!("[SETTINGS] Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!(
                    "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                    path, e
                );
                Self::default()
            }
        }
    }

    /// Load settings from `path`
    pub fn load_from(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        Ok(settings.sanitized())
    }

    /// Save to the default location, returning the path written
    pub fn save(&self) -> CoreResult<PathBuf> {
        let path = Self::settings_path();
        self.save_to(&path).inspect_err(|e| {
            error!("[SETTINGS] Failed to save settings to {:?}: {}", path, e);
        })?;
        Ok(path)
    }

    /// Save to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("[SETTINGS] Saved settings to {:?}", path);
        Ok(())
    }

    /// Copy with out-of-range values replaced
    pub fn sanitized(mut self) -> Self {
        self.engine = self.engine.normalized();
        if !(self.board_size_px.is_finite() && self.board_size_px > 0.0) {
            self.board_size_px = Settings::default().board_size_px;
        }
        self
    }

    /// Per-move time budget, `None` when disabled
    pub fn think_time(&self) -> Option<Duration> {
        (self.think_time_ms > 0).then(|| Duration::from_millis(self.think_time_ms))
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(SETTINGS_FILENAME);

        let settings = Settings {
            think_time_ms: 250,
            game_mode: GameMode::HumanAsBlack,
            orientation: Orientation::BlackAtBottom,
            ..Settings::default()
        };
        settings.save_to(&path).expect("save");

        let loaded = Settings::load_from(&path).expect("load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        //! Missing keys take their default values
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, r#"{ "think_time_ms": 0, "engine": { "skill_level": 40 } }"#)
            .expect("write");

        let loaded = Settings::load_from(&path).expect("load");
        assert_eq!(loaded.think_time(), None);
        assert_eq!(loaded.engine.skill_level, 20);
        assert_eq!(loaded.engine.hash_size_mb, 128);
        assert_eq!(loaded.board_size_px, 650.0);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "{ not json").expect("write");
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_default_think_time_is_one_second() {
        assert_eq!(Settings::default().think_time(), Some(Duration::from_millis(1000)));
    }
}
