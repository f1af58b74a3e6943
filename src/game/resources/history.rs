//! Move log resource
//!
//! Append-only, chronological record of the moves applied in the current
//! game, stored in coordinate notation (`e2e4`).
//!
//! # Architecture
//!
//! The log stores one [`MoveLogEntry`] per ply. Every presentation form is
//! derived from that sequence:
//!
//! - [`MoveLog::as_flat_sequence`] - raw moves in order
//! - [`MoveLog::as_rounds`] - `(round, white, black?)` pairs
//! - [`MoveLog::as_pgn_text`] - one numbered round per line
//!
//! `append` is the only mutator besides `clear`, which the session calls
//! together with the position reset.
//!
//! # Round pairing
//!
//! ```text
//! ply index 0 → round 1, White
//! ply index 1 → round 1, Black
//! ply index 2 → round 2, White
//! ```

use std::fmt::Write as _;

/// One applied move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLogEntry {
    /// 1-based ply index (odd = White, even = Black)
    pub ply: usize,
    /// Coordinate notation of the move
    pub notation: String,
}

/// One numbered round: a White ply and the Black reply, if played
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round<'a> {
    pub number: usize,
    pub white: &'a str,
    pub black: Option<&'a str>,
}

/// Ordered record of the moves of the current game
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    /// Index 0 = White's first move, index 1 = Black's reply, ...
    entries: Vec<MoveLogEntry>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move and return its 1-based ply index
    pub fn append(&mut self, notation: impl Into<String>) -> usize {
        let ply = self.entries.len() + 1;
        self.entries.push(MoveLogEntry {
            ply,
            notation: notation.into(),
        });
        ply
    }

    /// Remove every entry (new game only)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rounds started so far
    pub fn round_count(&self) -> usize {
        self.entries.len().div_ceil(2)
    }

    pub fn last(&self) -> Option<&MoveLogEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[MoveLogEntry] {
        &self.entries
    }

    /// Moves in the order they were played
    pub fn as_flat_sequence(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.notation.as_str()).collect()
    }

    /// Moves paired into numbered rounds
    pub fn as_rounds(&self) -> Vec<Round<'_>> {
        self.entries
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| Round {
                number: i + 1,
                white: pair[0].notation.as_str(),
                black: pair.get(1).map(|e| e.notation.as_str()),
            })
            .collect()
    }

    /// Numbered move text, one round per line
    ///
    /// ```text
    /// 1. e2e4 e7e5
    /// 2. g1f3
    /// ```
    pub fn as_pgn_text(&self) -> String {
        let mut text = String::new();
        for round in self.as_rounds() {
            if !text.is_empty() {
                text.push('\n');
            }
            let _ = write!(text, "{}. {}", round.number, round.white);
            if let Some(black) = round.black {
                let _ = write!(text, " {}", black);
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(moves: &[&str]) -> MoveLog {
        let mut log = MoveLog::new();
        for m in moves {
            log.append(*m);
        }
        log
    }

    #[test]
    fn test_move_log_default() {
        //! Verifies MoveLog starts empty
        let log = MoveLog::default();

        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.last().is_none());
        assert!(log.as_rounds().is_empty());
        assert_eq!(log.as_pgn_text(), "");
    }

    #[test]
    fn test_round_pairing() {
        let log = log_of(&["e2e4", "e7e5", "g1f3"]);
        assert_eq!(
            log.as_rounds(),
            vec![
                Round {
                    number: 1,
                    white: "e2e4",
                    black: Some("e7e5"),
                },
                Round {
                    number: 2,
                    white: "g1f3",
                    black: None,
                },
            ]
        );
        assert_eq!(log.round_count(), 2);
    }

    #[test]
    fn test_flat_sequence_preserves_order() {
        let log = log_of(&["d2d4", "d7d5", "c2c4", "e7e6"]);
        assert_eq!(log.as_flat_sequence(), vec!["d2d4", "d7d5", "c2c4", "e7e6"]);
        assert_eq!(log.round_count(), 2);
    }

    #[test]
    fn test_append_numbers_plies_from_one() {
        let mut log = MoveLog::new();
        assert_eq!(log.append("e2e4"), 1);
        assert_eq!(log.append("c7c5"), 2);
        assert_eq!(log.last().map(|e| e.ply), Some(2));
        assert_eq!(log.entries()[0].notation, "e2e4");
    }

    #[test]
    fn test_pgn_text() {
        let log = log_of(&["e2e4", "e7e5", "g1f3"]);
        assert_eq!(log.as_pgn_text(), "1. e2e4 e7e5\n2. g1f3");
    }

    #[test]
    fn test_clear() {
        let mut log = log_of(&["e2e4", "e7e5"]);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.append("d2d4"), 1);
    }
}
