//! Move resolution - raw input to a single legal move
//!
//! Turns either free text or an explicit origin/destination pair into one
//! validated [`Move`] of the current position, or a typed [`MoveError`].
//!
//! # Resolution order
//!
//! Free text is tried as short algebraic notation first (`e4`, `Nf3`,
//! `O-O`) and then as coordinate notation (`e2e4`, `e7e8n`). Each attempt
//! yields a typed result; the first success wins. When neither attempt
//! succeeds the error distinguishes "not notation at all"
//! (`UnparseableInput`) from "notation, but not legal here" (`IllegalMove`).
//!
//! # Promotion default
//!
//! Coordinate input that moves a pawn onto its last rank without a
//! promotion suffix promotes to [`DEFAULT_PROMOTION`] (a queen). An explicit
//! suffix (`e7e8n`) or SAN (`e8=N`) selects any other piece.
//!
//! Resolution never mutates the position. The caller applies the move.

use crate::game::error::{GameResult, MoveError};
use crate::game::rules::{NotationError, RulesEngine};
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Color, Move, Rank, Role, Square};

/// Piece chosen when coordinate input reaches the last rank without a suffix
pub const DEFAULT_PROMOTION: Role = Role::Queen;

/// Kind of raw move input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveInput<'a> {
    /// Free text, SAN or coordinate notation
    Notation(&'a str),
    /// Origin and destination picked on the board, with an optional
    /// explicit promotion piece
    SquarePair {
        from: Square,
        to: Square,
        promotion: Option<Role>,
    },
}

impl<'a> MoveInput<'a> {
    /// Square pair without an explicit promotion piece
    pub fn pair(from: Square, to: Square) -> Self {
        MoveInput::SquarePair {
            from,
            to,
            promotion: None,
        }
    }
}

/// Resolve raw input into a legal move of the current position
///
/// # Errors
///
/// - `UnparseableInput` - empty text, or text in neither notation
/// - `IllegalMove` - well-formed notation that is not in the legal move set
pub fn resolve_move(rules: &RulesEngine, input: MoveInput<'_>) -> GameResult<Move> {
    match input {
        MoveInput::Notation(raw) => resolve_notation(rules, raw),
        MoveInput::SquarePair {
            from,
            to,
            promotion,
        } => {
            let uci = UciMove::Normal {
                from,
                to,
                promotion,
            };
            let text = uci.to_string();
            match coordinate_attempt(rules, &text) {
                Ok(m) => Ok(m),
                Err(NotationError::Syntax) => Err(MoveError::UnparseableInput { input: text }),
                Err(NotationError::Illegal) => Err(MoveError::IllegalMove { input: text }),
            }
        }
    }
}

fn resolve_notation(rules: &RulesEngine, raw: &str) -> GameResult<Move> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(MoveError::UnparseableInput {
            input: raw.to_string(),
        });
    }

    let san = rules.parse_san(text);
    if let Ok(m) = san {
        return Ok(m);
    }

    let coordinate = coordinate_attempt(rules, text);
    if let Ok(m) = coordinate {
        return Ok(m);
    }

    if san == Err(NotationError::Illegal) || coordinate == Err(NotationError::Illegal) {
        Err(MoveError::IllegalMove {
            input: text.to_string(),
        })
    } else {
        Err(MoveError::UnparseableInput {
            input: text.to_string(),
        })
    }
}

/// Coordinate-notation attempt with the queen promotion default applied
fn coordinate_attempt(rules: &RulesEngine, text: &str) -> Result<Move, NotationError> {
    let uci: UciMove = text.parse().map_err(|_| NotationError::Syntax)?;
    let uci = with_default_promotion(rules, uci);
    rules.parse_uci(&uci.to_string())
}

fn with_default_promotion(rules: &RulesEngine, uci: UciMove) -> UciMove {
    match uci {
        UciMove::Normal {
            from,
            to,
            promotion: None,
        } => {
            let promotes = rules.piece_at(from).is_some_and(|piece| {
                piece.role == Role::Pawn && to.rank() == last_rank(piece.color)
            });
            UciMove::Normal {
                from,
                to,
                promotion: promotes.then_some(DEFAULT_PROMOTION),
            }
        }
        other => other,
    }
}

fn last_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::Eighth,
        Color::Black => Rank::First,
    }
}

/// Square the input moves from, when the input names one
///
/// Works for input that is illegal in the current position: square pairs
/// and coordinate text carry their origin, SAN carries it when fully
/// disambiguated (`Ng1f3`). Input that resolves to a legal move always has
/// an origin.
pub fn origin_square(rules: &RulesEngine, input: MoveInput<'_>) -> Option<Square> {
    if let Ok(m) = resolve_move(rules, input) {
        return Some(m.from().unwrap_or_else(|| m.to()));
    }
    let text = match input {
        MoveInput::SquarePair { from, .. } => return Some(from),
        MoveInput::Notation(raw) => raw.trim(),
    };
    if let Ok(UciMove::Normal { from, .. }) = text.parse::<UciMove>() {
        return Some(from);
    }
    match text.parse::<SanPlus>() {
        Ok(SanPlus {
            san:
                San::Normal {
                    file: Some(file),
                    rank: Some(rank),
                    ..
                },
            ..
        }) => Some(Square::from_coords(file, rank)),
        _ => None,
    }
}

/// Destination square as written in coordinate notation
///
/// Castling is reported as the king's target square (`g1`, `c8`), not the
/// rook square.
pub fn coordinate_destination(m: &Move) -> Square {
    match m.to_uci(CastlingMode::Standard) {
        UciMove::Normal { to, .. } => to,
        _ => m.to(),
    }
}
