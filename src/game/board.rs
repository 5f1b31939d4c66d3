//! Board Geometry
//!
//! Cell positions, wall slots, and the mapping from a pawn step to the
//! wall slot that would block it.
//!
//! Walls sit on inter-cell junctions and are anchored at a cell: a
//! horizontal wall at `(r, c)` blocks the vertical edge between rows `r`
//! and `r + 1` at column `c`; a vertical wall at `(r, c)` blocks the
//! horizontal edge between columns `c` and `c + 1` at row `r`. Edges are
//! always checked against the lower of the two involved coordinates.

use serde::{Deserialize, Serialize};

use crate::BOARD_SIZE;

/// One of the four orthogonal step directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row 0
    Up,
    /// Toward row 8
    Down,
    /// Toward column 0
    Left,
    /// Toward column 8
    Right,
}

/// Wall orientation at a junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Blocks movement between a cell and the cell below it
    Horizontal,
    /// Blocks movement between a cell and the cell to its right
    Vertical,
}

/// A board cell, `0 <= row, col < 9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index, 0 at the top
    pub row: u8,
    /// Column index, 0 at the left
    pub col: u8,
}

impl Position {
    /// Create a position. Callers are expected to bounds-check with
    /// [`Position::in_bounds`] before using it as a move target.
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Whether this cell lies on the 9x9 board.
    #[inline]
    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The adjacent cell in `direction`, or `None` if it would leave
    /// the board.
    pub fn step(&self, direction: Direction) -> Option<Position> {
        let (row, col) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row + 1, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col + 1),
        };
        let next = Position::new(row, col);
        next.in_bounds().then_some(next)
    }

    /// Whether `other` is exactly one cell away along a single axis.
    pub fn is_adjacent(&self, other: Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        (dr == 1 && dc == 0) || (dr == 0 && dc == 1)
    }
}

/// A wall slot: the `(row, col, orientation)` key that at most one wall
/// may occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WallSlot {
    /// Anchor row
    pub row: u8,
    /// Anchor column
    pub col: u8,
    /// Orientation at the junction
    pub orientation: Orientation,
}

impl WallSlot {
    /// Create a wall slot.
    pub const fn new(row: u8, col: u8, orientation: Orientation) -> Self {
        Self { row, col, orientation }
    }
}

/// The wall slot that blocks the edge between two adjacent cells, or
/// `None` if the cells are not orthogonally adjacent.
pub fn blocking_slot(from: Position, to: Position) -> Option<WallSlot> {
    if from.row == to.row && from.col.abs_diff(to.col) == 1 {
        Some(WallSlot::new(
            from.row,
            from.col.min(to.col),
            Orientation::Vertical,
        ))
    } else if from.col == to.col && from.row.abs_diff(to.row) == 1 {
        Some(WallSlot::new(
            from.row.min(to.row),
            from.col,
            Orientation::Horizontal,
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_bounds() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::Up), None);
        assert_eq!(corner.step(Direction::Left), None);
        assert_eq!(corner.step(Direction::Down), Some(Position::new(1, 0)));
        assert_eq!(corner.step(Direction::Right), Some(Position::new(0, 1)));

        let far = Position::new(8, 8);
        assert_eq!(far.step(Direction::Down), None);
        assert_eq!(far.step(Direction::Right), None);
    }

    #[test]
    fn test_adjacency() {
        let p = Position::new(4, 4);
        assert!(p.is_adjacent(Position::new(3, 4)));
        assert!(p.is_adjacent(Position::new(5, 4)));
        assert!(p.is_adjacent(Position::new(4, 3)));
        assert!(p.is_adjacent(Position::new(4, 5)));

        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Position::new(5, 5))); // diagonal
        assert!(!p.is_adjacent(Position::new(6, 4))); // distance 2
    }

    #[test]
    fn test_blocking_slot_vertical_moves() {
        // Moving down from (2, 4): blocked by horizontal wall anchored
        // at the upper row.
        let slot = blocking_slot(Position::new(2, 4), Position::new(3, 4));
        assert_eq!(slot, Some(WallSlot::new(2, 4, Orientation::Horizontal)));

        // Moving up from (3, 4): same edge, same anchor.
        let slot = blocking_slot(Position::new(3, 4), Position::new(2, 4));
        assert_eq!(slot, Some(WallSlot::new(2, 4, Orientation::Horizontal)));
    }

    #[test]
    fn test_blocking_slot_horizontal_moves() {
        // Moving right from (4, 2): blocked by vertical wall anchored
        // at the left column.
        let slot = blocking_slot(Position::new(4, 2), Position::new(4, 3));
        assert_eq!(slot, Some(WallSlot::new(4, 2, Orientation::Vertical)));

        // Moving left from (4, 3): same edge, same anchor.
        let slot = blocking_slot(Position::new(4, 3), Position::new(4, 2));
        assert_eq!(slot, Some(WallSlot::new(4, 2, Orientation::Vertical)));
    }

    #[test]
    fn test_blocking_slot_rejects_non_adjacent() {
        assert_eq!(
            blocking_slot(Position::new(0, 0), Position::new(1, 1)),
            None
        );
        assert_eq!(
            blocking_slot(Position::new(0, 0), Position::new(0, 2)),
            None
        );
        assert_eq!(
            blocking_slot(Position::new(3, 3), Position::new(3, 3)),
            None
        );
    }
}
