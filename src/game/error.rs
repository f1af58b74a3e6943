//! Error types for game module
//!
//! Provides the typed failures of a session action: move resolution,
//! piece selection, turn control and engine communication. Every variant is
//! recoverable; the session surfaces it as feedback and keeps playing.

use shakmaty::Square;

/// Errors that can occur while resolving or executing a session action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// Text matches neither short algebraic nor coordinate notation
    #[error("Unparseable move input: {input:?}")]
    UnparseableInput { input: String },

    /// Well-formed move that is not in the current legal move set
    #[error("Illegal move: {input}")]
    IllegalMove { input: String },

    /// Picked square is empty or holds a piece the current turn may not move
    #[error("No movable piece at {square}")]
    NoMovablePieceAtSquare { square: Square },

    /// The position is already checkmate, stalemate or a dead draw
    #[error("Game is already over")]
    GameAlreadyOver,

    /// Engine process is missing, not executable or unresponsive
    #[error("Engine unavailable: {message}")]
    EngineUnavailable { message: String },

    /// Engine refused a parameter update
    #[error("Engine rejected option {option}: {message}")]
    EngineConfigRejected { option: String, message: String },

    /// FEN parsed but describes an impossible setup
    #[error("Invalid position: {message}")]
    InvalidPosition { message: String },
}

/// Errors raised by an analysis engine transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Process could not be spawned, its pipes closed, or it timed out
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// Engine answered a `setoption` with a refusal
    #[error("option {option} rejected: {message}")]
    Rejected { option: String, message: String },
}

impl From<EngineError> for MoveError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Unavailable(message) => MoveError::EngineUnavailable { message },
            EngineError::Rejected { option, message } => {
                MoveError::EngineConfigRejected { option, message }
            }
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Unavailable(err.to_string())
    }
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, MoveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_maps_to_move_error() {
        //! Transport failures surface with the matching session variant
        let unavailable: MoveError = EngineError::Unavailable("broken pipe".into()).into();
        assert_eq!(
            unavailable,
            MoveError::EngineUnavailable {
                message: "broken pipe".into()
            }
        );

        let rejected: MoveError = EngineError::Rejected {
            option: "Hash".into(),
            message: "No such option: Hash".into(),
        }
        .into();
        assert!(matches!(rejected, MoveError::EngineConfigRejected { ref option, .. } if option == "Hash"));
    }

    #[test]
    fn test_error_messages_name_the_square() {
        let err = MoveError::NoMovablePieceAtSquare { square: Square::E4 };
        assert_eq!(err.to_string(), "No movable piece at e4");
    }
}
