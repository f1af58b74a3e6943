//! Game status tracking and result messages
//!
//! Derives the end-of-game condition from the current position.
//!
//! ## Checkmate
//! - The side to move is in check with no legal moves; the other side wins
//!
//! ## Draw Conditions
//! - **Stalemate**: side to move has no legal moves but is NOT in check
//! - **InsufficientMaterial**: neither side can deliver mate (e.g. K vs K)

use shakmaty::{Chess, Color, Position};
use std::fmt;

/// Status of the game in the current position
///
/// `Checkmate`, `Stalemate` and `InsufficientMaterial` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Game in progress, side to move not in check
    Ongoing,
    /// Game in progress, side to move in check
    Check { side: Color },
    /// Side to move is mated
    Checkmate { winner: Color },
    /// Side to move has no legal moves and is not in check
    Stalemate,
    /// Neither side has mating material
    InsufficientMaterial,
}

impl GameStatus {
    /// Status of `position`
    ///
    /// Checkmate is tested before insufficient material so a mate delivered
    /// with minimal material still reports the winner.
    pub fn of(position: &Chess) -> Self {
        if position.is_checkmate() {
            GameStatus::Checkmate {
                winner: !position.turn(),
            }
        } else if position.is_stalemate() {
            GameStatus::Stalemate
        } else if position.is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else if position.is_check() {
            GameStatus::Check {
                side: position.turn(),
            }
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn is_game_over(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate { .. } | GameStatus::Stalemate | GameStatus::InsufficientMaterial
        )
    }

    /// Winner, if the game ended decisively
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "Playing"),
            GameStatus::Check { side } => write!(f, "Check! {} is in check", color_name(*side)),
            GameStatus::Checkmate { winner } => {
                write!(f, "Checkmate! {} wins", color_name(*winner))
            }
            GameStatus::Stalemate => write!(f, "Draw by stalemate"),
            GameStatus::InsufficientMaterial => write!(f, "Draw by insufficient material"),
        }
    }
}

pub(crate) fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::fen::Fen;
    use shakmaty::CastlingMode;

    fn position(fen: &str) -> Chess {
        let fen: Fen = fen.parse().expect("valid fen");
        fen.into_position(CastlingMode::Standard).expect("legal position")
    }

    #[test]
    fn test_starting_position_is_ongoing() {
        //! The initial position is neither check nor terminal
        let status = GameStatus::of(&Chess::default());
        assert_eq!(status, GameStatus::Ongoing);
        assert!(!status.is_game_over());
        assert_eq!(status.winner(), None);
    }

    #[test]
    fn test_fools_mate_is_checkmate_for_black() {
        let status = GameStatus::of(&position(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        ));
        assert_eq!(status, GameStatus::Checkmate { winner: Color::Black });
        assert!(status.is_game_over());
        assert_eq!(status.to_string(), "Checkmate! Black wins");
    }

    #[test]
    fn test_stalemate_detected() {
        let status = GameStatus::of(&position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"));
        assert_eq!(status, GameStatus::Stalemate);
        assert!(status.is_game_over());
    }

    #[test]
    fn test_bare_kings_are_insufficient_material() {
        let status = GameStatus::of(&position("8/8/4k3/8/8/4K3/8/8 w - - 0 1"));
        assert_eq!(status, GameStatus::InsufficientMaterial);
    }

    #[test]
    fn test_check_is_not_terminal() {
        let status = GameStatus::of(&position("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1"));
        assert_eq!(status, GameStatus::Check { side: Color::White });
        assert!(!status.is_game_over());
    }
}
