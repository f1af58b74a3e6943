//! Rules engine resource - adapter over `shakmaty`
//!
//! The rules engine is the single source of truth for chess logic:
//!
//! - Legal move generation
//! - Move application
//! - Check / checkmate / stalemate / insufficient material detection
//! - FEN encoding and decoding
//! - SAN and UCI notation parsing
//!
//! The session never copies the position out of this wrapper; it queries and
//! mutates it through the methods below.

use crate::game::error::{GameResult, MoveError};
use crate::game::resources::game_over::GameStatus;
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Piece, Position, Square};

/// Why a notation string could not be turned into a move
///
/// Each resolution attempt reports one of these instead of unwinding, so the
/// resolver can decide whether to fall back to another grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationError {
    /// Text is not valid in this grammar
    Syntax,
    /// Text is valid but names no legal move in the position
    Illegal,
}

/// Authoritative position handle
#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    position: Chess,
    last_move: Option<Move>,
}

impl RulesEngine {
    /// Standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a position from FEN
    ///
    /// # Errors
    ///
    /// `UnparseableInput` when the text is not FEN, `InvalidPosition` when the
    /// setup it describes is not a legal chess position.
    pub fn from_fen(fen: &str) -> GameResult<Self> {
        let parsed: Fen = fen.trim().parse().map_err(|_| MoveError::UnparseableInput {
            input: fen.to_string(),
        })?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| MoveError::InvalidPosition {
                message: e.to_string(),
            })?;
        Ok(Self {
            position,
            last_move: None,
        })
    }

    /// Reset to the starting position
    pub fn reset(&mut self) {
        self.position = Chess::default();
        self.last_move = None;
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn side_to_move(&self) -> Color {
        self.position.turn()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.board().piece_at(square)
    }

    /// Most recently applied move, for last-move highlighting
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.position.legal_moves().into_iter().collect()
    }

    /// Legal moves whose origin is `square`
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        self.position
            .legal_moves()
            .into_iter()
            .filter(|m| m.from() == Some(square))
            .collect()
    }

    pub fn is_legal(&self, m: &Move) -> bool {
        self.position.legal_moves().contains(m)
    }

    /// Apply a move that is known to be legal in the current position
    ///
    /// # Errors
    ///
    /// Returns `IllegalMove` (leaving the position untouched) if `m` is not in
    /// the legal set.
    pub fn apply(&mut self, m: Move) -> GameResult<()> {
        if !self.is_legal(&m) {
            return Err(MoveError::IllegalMove {
                input: to_coordinate_notation(&m),
            });
        }
        self.position.play_unchecked(m);
        self.last_move = Some(m);
        Ok(())
    }

    pub fn status(&self) -> GameStatus {
        GameStatus::of(&self.position)
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_game_over()
    }

    /// FEN of the current position
    pub fn to_fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// Parse short algebraic notation (`e4`, `Nf3`, `O-O`, `exd8=N+`)
    pub fn parse_san(&self, text: &str) -> Result<Move, NotationError> {
        let san: SanPlus = text.parse().map_err(|_| NotationError::Syntax)?;
        san.san
            .to_move(&self.position)
            .map_err(|_| NotationError::Illegal)
    }

    /// Parse coordinate notation (`e2e4`, `e7e8n`)
    pub fn parse_uci(&self, text: &str) -> Result<Move, NotationError> {
        let uci: UciMove = text.parse().map_err(|_| NotationError::Syntax)?;
        uci.to_move(&self.position)
            .map_err(|_| NotationError::Illegal)
    }
}

/// Canonical coordinate notation of a move (`e2e4`, `e1g1`, `a7a8q`)
pub fn to_coordinate_notation(m: &Move) -> String {
    m.to_uci(CastlingMode::Standard).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Role;

    #[test]
    fn test_starting_position_has_twenty_moves() {
        let rules = RulesEngine::new();
        assert_eq!(rules.legal_moves().len(), 20);
        assert_eq!(rules.side_to_move(), Color::White);
        assert!(!rules.is_game_over());
    }

    #[test]
    fn test_apply_switches_side_and_records_last_move() {
        let mut rules = RulesEngine::new();
        let m = rules.parse_uci("e2e4").expect("legal opening move");
        rules.apply(m).expect("apply");

        assert_eq!(rules.side_to_move(), Color::Black);
        assert_eq!(rules.last_move(), Some(m));
        assert_eq!(rules.piece_at(Square::E4).map(|p| p.role), Some(Role::Pawn));
    }

    #[test]
    fn test_parse_errors_distinguish_syntax_from_illegal() {
        let rules = RulesEngine::new();
        assert_eq!(rules.parse_uci("zz99"), Err(NotationError::Syntax));
        assert_eq!(rules.parse_uci("e2e5"), Err(NotationError::Illegal));
        assert_eq!(rules.parse_san("Ke2"), Err(NotationError::Illegal));
        assert!(rules.parse_san("Nf3").is_ok());
    }

    #[test]
    fn test_fen_round_trip() {
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
        let rules = RulesEngine::from_fen(fen).expect("valid fen");
        assert_eq!(rules.to_fen(), fen);
    }

    #[test]
    fn test_from_fen_rejects_garbage() {
        assert!(matches!(
            RulesEngine::from_fen("not a fen"),
            Err(MoveError::UnparseableInput { .. })
        ));
    }

    #[test]
    fn test_castling_uses_king_destination() {
        let rules =
            RulesEngine::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid fen");
        let castle = rules.parse_san("O-O").expect("castling is legal");
        assert_eq!(to_coordinate_notation(&castle), "e1g1");
    }
}
