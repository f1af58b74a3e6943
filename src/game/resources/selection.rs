//! Selection state machine for two-click move input
//!
//! ```text
//!            pick(own piece)               pick(target): move applied
//!   Empty ───────────────────▶ PieceSelected ───────────────────────▶ Empty
//!     ▲  pick(other): error                 │ pick(target): error
//!     └─────────────────────────────────────┘
//! ```
//!
//! The candidate destinations stored in `PieceSelected` are computed from the
//! live legal move list at the moment of selection. Any failed second click
//! returns to `Empty`; selection never survives a position change.

use crate::game::error::{GameResult, MoveError};
use crate::game::resolver::{coordinate_destination, resolve_move, MoveInput};
use crate::game::resources::history::MoveLog;
use crate::game::resources::turn::{human_may_move, GameMode};
use crate::game::rules::{to_coordinate_notation, RulesEngine};
use shakmaty::Square;
use std::collections::BTreeSet;
use tracing::debug;

/// Current selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    PieceSelected {
        square: Square,
        candidate_destinations: BTreeSet<Square>,
    },
}

/// What a successful pick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// A piece was selected; carries the number of legal destinations
    Selected { square: Square, candidates: usize },
    /// The second pick completed a move, given in coordinate notation
    Moved { notation: String },
}

/// Selection resource for tracking the selected piece
#[derive(Debug, Clone, Default)]
pub struct Selection {
    state: SelectionState,
}

impl Selection {
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn clear(&mut self) {
        self.state = SelectionState::Empty;
    }

    pub fn is_selected(&self) -> bool {
        matches!(self.state, SelectionState::PieceSelected { .. })
    }

    pub fn selected_square(&self) -> Option<Square> {
        match &self.state {
            SelectionState::PieceSelected { square, .. } => Some(*square),
            SelectionState::Empty => None,
        }
    }

    /// Destinations to highlight, empty when nothing is selected
    pub fn candidate_destinations(&self) -> Option<&BTreeSet<Square>> {
        match &self.state {
            SelectionState::PieceSelected {
                candidate_destinations,
                ..
            } => Some(candidate_destinations),
            SelectionState::Empty => None,
        }
    }

    /// Advance the machine with a picked square
    ///
    /// On a completed move the move is applied to `rules` and appended to
    /// `log`. Every error leaves the selection `Empty`.
    pub fn pick(
        &mut self,
        square: Square,
        rules: &mut RulesEngine,
        log: &mut MoveLog,
        mode: GameMode,
    ) -> GameResult<PickOutcome> {
        if rules.is_game_over() {
            self.clear();
            return Err(MoveError::GameAlreadyOver);
        }

        match std::mem::take(&mut self.state) {
            SelectionState::Empty => self.select(square, rules, mode),
            SelectionState::PieceSelected { square: from, .. } => {
                let m = resolve_move(rules, MoveInput::pair(from, square))?;
                rules.apply(m)?;
                let notation = to_coordinate_notation(&m);
                log.append(notation.clone());
                debug!("[SELECTION] {} -> {} played as {}", from, square, notation);
                Ok(PickOutcome::Moved { notation })
            }
        }
    }

    fn select(
        &mut self,
        square: Square,
        rules: &RulesEngine,
        mode: GameMode,
    ) -> GameResult<PickOutcome> {
        let side = rules.side_to_move();
        let movable = rules
            .piece_at(square)
            .is_some_and(|piece| piece.color == side && human_may_move(mode, side));
        if !movable {
            return Err(MoveError::NoMovablePieceAtSquare { square });
        }

        let candidate_destinations: BTreeSet<Square> = rules
            .legal_moves_from(square)
            .iter()
            .map(coordinate_destination)
            .collect();
        let candidates = candidate_destinations.len();
        debug!("[SELECTION] {} selected with {} destinations", square, candidates);

        self.state = SelectionState::PieceSelected {
            square,
            candidate_destinations,
        };
        Ok(PickOutcome::Selected { square, candidates })
    }
}
