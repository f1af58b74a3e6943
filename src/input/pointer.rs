//! Pointer-to-square mapping for a flat, square board image
//!
//! Translates pixel coordinates into board squares and back, taking the
//! board orientation into account.
//!
//! # Coordinate System
//!
//! - Pixel origin `(0, 0)` is the top-left corner of the board image
//! - `x` grows to the right, `y` grows downwards
//! - The board is split into an 8×8 grid of `board_size / 8` cells
//!
//! With [`Orientation::WhiteAtBottom`] the top-left cell is a8 and the
//! bottom-right cell is h1. [`Orientation::BlackAtBottom`] mirrors both axes,
//! so the top-left cell becomes h1.
//!
//! Both functions are pure: the same input and orientation always yield the
//! same output.

use serde::{Deserialize, Serialize};
use shakmaty::{File, Rank, Square};

/// Which side is drawn at the bottom of the board
///
/// Purely a rendering parameter. It does not depend on the game mode or on
/// whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    WhiteAtBottom,
    BlackAtBottom,
}

impl Orientation {
    /// The opposite orientation (board flip)
    pub fn flipped(self) -> Self {
        match self {
            Orientation::WhiteAtBottom => Orientation::BlackAtBottom,
            Orientation::BlackAtBottom => Orientation::WhiteAtBottom,
        }
    }

    /// Map a grid `(column, row)` counted from the top-left into board
    /// `(file, rank)` indices. The mapping is its own inverse.
    #[inline]
    fn grid_to_board(self, column: u32, row: u32) -> (u32, u32) {
        match self {
            Orientation::WhiteAtBottom => (column, 7 - row),
            Orientation::BlackAtBottom => (7 - column, row),
        }
    }
}

/// Convert pixel coordinates to the square under them
///
/// Coordinates outside `0..=board_size` are clamped to the nearest edge
/// cell, so every input maps to exactly one square.
///
/// # Example
///
/// ```
/// use titan_chess::input::{pixel_to_square, Orientation};
/// use shakmaty::Square;
///
/// assert_eq!(pixel_to_square(0.0, 0.0, 800.0, Orientation::WhiteAtBottom), Square::A8);
/// assert_eq!(pixel_to_square(0.0, 0.0, 800.0, Orientation::BlackAtBottom), Square::H1);
/// ```
pub fn pixel_to_square(x: f32, y: f32, board_size: f32, orientation: Orientation) -> Square {
    let column = cell_index(x, board_size);
    let row = cell_index(y, board_size);
    let (file, rank) = orientation.grid_to_board(column, row);
    Square::from_coords(File::new(file), Rank::new(rank))
}

/// Pixel centre of the cell that displays `square`
pub fn square_to_pixel_center(
    square: Square,
    board_size: f32,
    orientation: Orientation,
) -> (f32, f32) {
    let cell = board_size / 8.0;
    let (column, row) = orientation.grid_to_board(square.file() as u32, square.rank() as u32);
    // grid_to_board is an involution, so it maps board indices back to the grid
    ((column as f32 + 0.5) * cell, (row as f32 + 0.5) * cell)
}

/// Clamp a pixel coordinate into the board
pub fn clamp_to_board(value: f32, board_size: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, board_size.max(0.0))
}

fn cell_index(value: f32, board_size: f32) -> u32 {
    if board_size <= 0.0 || board_size.is_nan() {
        return 0;
    }
    let cell = board_size / 8.0;
    let index = (clamp_to_board(value, board_size) / cell).floor();
    (index as u32).min(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = 650.0;

    #[test]
    fn test_corners_white_at_bottom() {
        let o = Orientation::WhiteAtBottom;
        assert_eq!(pixel_to_square(1.0, 1.0, SIZE, o), Square::A8);
        assert_eq!(pixel_to_square(649.0, 1.0, SIZE, o), Square::H8);
        assert_eq!(pixel_to_square(1.0, 649.0, SIZE, o), Square::A1);
        assert_eq!(pixel_to_square(649.0, 649.0, SIZE, o), Square::H1);
    }

    #[test]
    fn test_corners_black_at_bottom() {
        let o = Orientation::BlackAtBottom;
        assert_eq!(pixel_to_square(1.0, 1.0, SIZE, o), Square::H1);
        assert_eq!(pixel_to_square(649.0, 649.0, SIZE, o), Square::A8);
    }

    #[test]
    fn test_far_edge_is_clamped_into_last_cell() {
        //! x == board_size would index a ninth column without clamping
        let o = Orientation::WhiteAtBottom;
        assert_eq!(pixel_to_square(SIZE, SIZE, SIZE, o), Square::H1);
        assert_eq!(pixel_to_square(-20.0, 9000.0, SIZE, o), Square::A1);
    }

    #[test]
    fn test_known_square_e2() {
        // e2: column 4, row 6 with white at the bottom
        let cell = SIZE / 8.0;
        let (x, y) = (4.5 * cell, 6.5 * cell);
        assert_eq!(pixel_to_square(x, y, SIZE, Orientation::WhiteAtBottom), Square::E2);
        assert_eq!(square_to_pixel_center(Square::E2, SIZE, Orientation::WhiteAtBottom), (x, y));
    }

    #[test]
    fn test_center_round_trip_all_squares_both_orientations() {
        for size in [8.0, 400.0, SIZE, 1024.0] {
            for orientation in [Orientation::WhiteAtBottom, Orientation::BlackAtBottom] {
                for square in Square::ALL {
                    let (x, y) = square_to_pixel_center(square, size, orientation);
                    assert_eq!(pixel_to_square(x, y, size, orientation), square);
                }
            }
        }
    }

    #[test]
    fn test_flip_is_an_involution() {
        assert_eq!(Orientation::WhiteAtBottom.flipped(), Orientation::BlackAtBottom);
        assert_eq!(Orientation::WhiteAtBottom.flipped().flipped(), Orientation::WhiteAtBottom);
    }
}
