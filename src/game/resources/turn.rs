//! Turn and game-mode control
//!
//! Decides, for the side to move, whether the next move must come from the
//! human or may be requested from the analysis engine.
//!
//! # Game Modes
//!
//! | Mode           | White  | Black  |
//! |----------------|--------|--------|
//! | `Sandbox`      | Human  | Human  |
//! | `HumanAsWhite` | Human  | Engine |
//! | `HumanAsBlack` | Engine | Human  |
//!
//! A manual override ("request engine move") turns any single turn into an
//! engine turn, in every mode, without changing who owns the side.

use crate::game::error::{GameResult, MoveError};
use crate::game::resources::game_over::GameStatus;
use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::fmt;

/// Which sides the human controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Human moves both sides; the engine only plays on request
    #[default]
    Sandbox,
    /// Human plays White, engine answers as Black
    HumanAsWhite,
    /// Engine plays White, human plays Black
    HumanAsBlack,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [
        GameMode::Sandbox,
        GameMode::HumanAsWhite,
        GameMode::HumanAsBlack,
    ];

    /// Color the engine plays automatically, if any
    pub fn engine_color(self) -> Option<Color> {
        match self {
            GameMode::Sandbox => None,
            GameMode::HumanAsWhite => Some(Color::Black),
            GameMode::HumanAsBlack => Some(Color::White),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameMode::Sandbox => "Sandbox (play both sides)",
            GameMode::HumanAsWhite => "Human vs Engine (play White)",
            GameMode::HumanAsBlack => "Engine vs Human (play Black)",
        };
        f.write_str(label)
    }
}

/// Who supplies the next move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    Human,
    Engine,
}

/// Actor for `side_to_move` under `mode`
pub fn next_actor(mode: GameMode, side_to_move: Color) -> Actor {
    if mode.engine_color() == Some(side_to_move) {
        Actor::Engine
    } else {
        Actor::Human
    }
}

/// Whether the human may move a piece of `side_to_move` right now
pub fn human_may_move(mode: GameMode, side_to_move: Color) -> bool {
    next_actor(mode, side_to_move) == Actor::Human
}

/// Actor for the current turn, honouring a manual engine request
///
/// # Errors
///
/// `GameAlreadyOver` when the engine would be asked to move in a finished
/// game. A human turn in a finished game is reported the same way since no
/// move can be made.
pub fn decide_actor(
    mode: GameMode,
    side_to_move: Color,
    status: GameStatus,
    engine_requested: bool,
) -> GameResult<Actor> {
    if status.is_game_over() {
        return Err(MoveError::GameAlreadyOver);
    }
    if engine_requested {
        return Ok(Actor::Engine);
    }
    Ok(next_actor(mode, side_to_move))
}
