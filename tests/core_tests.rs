//! Core Integration Tests
//!
//! Settings persistence and the pixel-to-square mapper as seen from outside
//! the crate.

use shakmaty::Square;
use std::fs;
use titan_chess::core::{CoreError, Settings};
use titan_chess::game::ai::EngineConfig;
use titan_chess::game::resources::GameMode;
use titan_chess::input::{pixel_to_square, square_to_pixel_center, Orientation};

// ============================================================================
// Settings Tests
// ============================================================================

#[test]
fn test_default_settings_match_the_shipped_defaults() {
    let settings = Settings::default();

    assert_eq!(settings.engine_path.to_str(), Some("./stockfish"));
    assert_eq!(settings.engine, EngineConfig::default());
    assert_eq!(settings.engine.search_depth, 18);
    assert_eq!(settings.engine.skill_level, 20);
    assert_eq!(settings.think_time_ms, 1000);
    assert_eq!(settings.board_size_px, 650.0);
    assert_eq!(settings.game_mode, GameMode::Sandbox);
    assert_eq!(settings.orientation, Orientation::WhiteAtBottom);
}

#[test]
fn test_settings_persist_across_sessions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("settings.json");

    let mut settings = Settings::default();
    settings.game_mode = GameMode::HumanAsBlack;
    settings.orientation = Orientation::BlackAtBottom;
    settings.engine.skill_level = 5;
    settings.save_to(&path).expect("save");

    let loaded = Settings::load_from(&path).expect("load");
    assert_eq!(loaded.game_mode, GameMode::HumanAsBlack);
    assert_eq!(loaded.orientation, Orientation::BlackAtBottom);
    assert_eq!(loaded.engine.skill_level, 5);
}

#[test]
fn test_partial_settings_file_fills_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "think_time_ms": 0 }"#).expect("write");

    let loaded = Settings::load_from(&path).expect("load");
    assert_eq!(loaded.think_time_ms, 0);
    assert_eq!(loaded.think_time(), None);
    assert_eq!(loaded.engine, EngineConfig::default());
}

#[test]
fn test_corrupt_settings_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").expect("write");

    let result = Settings::load_from(&path);
    assert!(matches!(result, Err(CoreError::SettingsSerialization(_))));
}

#[test]
fn test_missing_settings_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = Settings::load_from(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(CoreError::SettingsIo(_))));
}

#[test]
fn test_out_of_range_values_are_sanitized() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{ "engine": { "skill_level": 99 }, "board_size_px": -3.0 }"#,
    )
    .expect("write");

    let loaded = Settings::load_from(&path).expect("load");
    assert_eq!(loaded.engine.skill_level, 20);
    assert_eq!(loaded.board_size_px, 650.0);
}

// ============================================================================
// Coordinate Mapping Tests
// ============================================================================

#[test]
fn test_corners_for_both_orientations() {
    let size = 650.0;
    let far = size - 0.5;

    let white = Orientation::WhiteAtBottom;
    assert_eq!(pixel_to_square(0.0, 0.0, size, white), Square::A8);
    assert_eq!(pixel_to_square(far, 0.0, size, white), Square::H8);
    assert_eq!(pixel_to_square(0.0, far, size, white), Square::A1);
    assert_eq!(pixel_to_square(far, far, size, white), Square::H1);

    let black = Orientation::BlackAtBottom;
    assert_eq!(pixel_to_square(0.0, 0.0, size, black), Square::H1);
    assert_eq!(pixel_to_square(far, 0.0, size, black), Square::A1);
    assert_eq!(pixel_to_square(0.0, far, size, black), Square::H8);
    assert_eq!(pixel_to_square(far, far, size, black), Square::A8);
}

#[test]
fn test_pixel_centres_map_back_to_their_square() {
    for orientation in [Orientation::WhiteAtBottom, Orientation::BlackAtBottom] {
        for square in Square::ALL {
            let (x, y) = square_to_pixel_center(square, 650.0, orientation);
            assert_eq!(
                pixel_to_square(x, y, 650.0, orientation),
                square,
                "{:?} {:?}",
                square,
                orientation
            );
        }
    }
}

#[test]
fn test_far_edge_belongs_to_the_last_cell() {
    assert_eq!(
        pixel_to_square(650.0, 650.0, 650.0, Orientation::WhiteAtBottom),
        Square::H1
    );
}
