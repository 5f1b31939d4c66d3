//! Pointer Resolution
//!
//! Maps raw window-pixel clicks onto the board geometry and, with the
//! current state, into an [`Intent`]. The board is drawn as a 9x9 grid
//! of 60px cells separated by 10px gaps, offset 50px from the window
//! origin; walls live in the gaps.
//!
//! ```text
//!        MARGIN      CELL      GAP
//!       |<--50-->|<---60--->|<-10->|
//!                 +----------+      +----------+
//!                 |  (0,0)   | gap  |  (0,1)   |
//!                 +----------+      +----------+
//!                    gap (H wall row 0 lives here)
//!                 +----------+
//!                 |  (1,0)   |
//!                 +----------+
//! ```

use crate::game::board::{Orientation, Position, WallSlot};
use crate::game::intent::Intent;
use crate::game::state::{GameState, PlayerPhase, Wall};
use crate::BOARD_SIZE;

/// Side length of one board cell, in pixels.
pub const CELL_SIZE: i32 = 60;
/// Gap between adjacent cells; walls render inside it.
pub const GAP_SIZE: i32 = 10;
/// Offset of the board from the window origin, both axes.
pub const MARGIN: i32 = 50;
/// Rendered wall thickness. Equal to the gap, so a gap hit is a wall hit.
pub const WALL_WIDTH: i32 = GAP_SIZE;
/// Distance between the origins of adjacent cells.
pub const PITCH: i32 = CELL_SIZE + GAP_SIZE;

/// A pointer press in window pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Click {
    /// Horizontal pixel, left to right
    pub x: i32,
    /// Vertical pixel, top to bottom
    pub y: i32,
}

impl Click {
    /// Create a click.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Where a single pixel axis lands on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AxisHit {
    /// Inside cell `i`
    Cell(u8),
    /// Inside the gap after cell `i` (only the 8 inner gaps count)
    Gap(u8),
}

/// Decompose one pixel coordinate into a cell or gap index. Pixels in
/// the margin, past the board, or in the trailing strip resolve to
/// `None` rather than clamping to an edge index.
fn axis_hit(pixel: i32) -> Option<AxisHit> {
    let offset = pixel - MARGIN;
    if offset < 0 {
        return None;
    }
    let index = offset / PITCH;
    if index >= i32::from(BOARD_SIZE) {
        return None;
    }
    let within = offset % PITCH;
    if within < CELL_SIZE {
        Some(AxisHit::Cell(index as u8))
    } else if index + 1 < i32::from(BOARD_SIZE) {
        Some(AxisHit::Gap(index as u8))
    } else {
        None
    }
}

/// The cell under a click, if it lands inside one.
pub fn cell_at(click: Click) -> Option<Position> {
    match (axis_hit(click.y), axis_hit(click.x)) {
        (Some(AxisHit::Cell(row)), Some(AxisHit::Cell(col))) => Some(Position::new(row, col)),
        _ => None,
    }
}

/// The wall slot under a click, if it lands in a gap. A horizontal gap
/// (below a cell) yields a horizontal slot anchored at that cell; a
/// vertical gap (right of a cell) yields a vertical one. The corner
/// square where two gaps cross is ambiguous and yields `None`.
pub fn wall_slot_at(click: Click) -> Option<WallSlot> {
    match (axis_hit(click.y), axis_hit(click.x)) {
        (Some(AxisHit::Gap(row)), Some(AxisHit::Cell(col))) => {
            Some(WallSlot::new(row, col, Orientation::Horizontal))
        }
        (Some(AxisHit::Cell(row)), Some(AxisHit::Gap(col))) => {
            Some(WallSlot::new(row, col, Orientation::Vertical))
        }
        _ => None,
    }
}

/// Resolve a click into an intent for the player who owns the turn.
///
/// Resolution order:
/// 1. a picked-up wall turns any gap click into a drop target;
/// 2. a click on the turn owner's own pawn selects it;
/// 3. with a pawn selected, any cell click is a move target;
/// 4. a gap click over a placed wall picks it up, if the player has
///    entered the movement phase;
/// 5. any other gap click attempts a placement.
///
/// Geometry only; the state machine decides legality.
pub fn resolve_click(state: &GameState, click: Click) -> Option<Intent> {
    let player = state.turn();

    if state.selected_wall().is_some() {
        let slot = wall_slot_at(click)?;
        return Some(Intent::MoveWall(
            Position::new(slot.row, slot.col),
            slot.orientation,
        ));
    }

    if let Some(cell) = cell_at(click) {
        if state.pawn(player) == cell {
            return Some(Intent::SelectPawn);
        }
        if state.selected_pawn().is_some() {
            return Some(Intent::MoveTo(cell));
        }
        return None;
    }

    let slot = wall_slot_at(click)?;
    match state.wall_at(slot) {
        Some(owner) if state.phase(player) == PlayerPhase::Movement => {
            Some(Intent::PickUpWall(Wall::new(slot, owner)))
        }
        _ => Some(Intent::PlaceWall(Wall::new(slot, player))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Player;
    use crate::WALLS_PER_PLAYER;

    /// Pixel at the center of a cell.
    fn cell_center(row: u8, col: u8) -> Click {
        Click::new(
            MARGIN + i32::from(col) * PITCH + CELL_SIZE / 2,
            MARGIN + i32::from(row) * PITCH + CELL_SIZE / 2,
        )
    }

    /// Pixel in the middle of the horizontal gap below cell (row, col).
    fn h_gap(row: u8, col: u8) -> Click {
        Click::new(
            MARGIN + i32::from(col) * PITCH + CELL_SIZE / 2,
            MARGIN + i32::from(row) * PITCH + CELL_SIZE + GAP_SIZE / 2,
        )
    }

    /// Pixel in the middle of the vertical gap right of cell (row, col).
    fn v_gap(row: u8, col: u8) -> Click {
        Click::new(
            MARGIN + i32::from(col) * PITCH + CELL_SIZE + GAP_SIZE / 2,
            MARGIN + i32::from(row) * PITCH + CELL_SIZE / 2,
        )
    }

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell_at(cell_center(0, 0)), Some(Position::new(0, 0)));
        assert_eq!(cell_at(cell_center(8, 8)), Some(Position::new(8, 8)));
        assert_eq!(cell_at(cell_center(4, 7)), Some(Position::new(4, 7)));
        // First and last pixel of a cell.
        assert_eq!(
            cell_at(Click::new(MARGIN, MARGIN)),
            Some(Position::new(0, 0))
        );
        assert_eq!(
            cell_at(Click::new(MARGIN + CELL_SIZE - 1, MARGIN)),
            Some(Position::new(0, 0))
        );
    }

    #[test]
    fn test_margin_and_overflow_clicks_miss() {
        assert_eq!(cell_at(Click::new(0, 0)), None);
        assert_eq!(cell_at(Click::new(MARGIN - 1, MARGIN + 5)), None);
        // Negative pixels must not alias onto cell 0.
        assert_eq!(cell_at(Click::new(-5, MARGIN + 5)), None);
        // Past the last column.
        let past = MARGIN + 9 * PITCH;
        assert_eq!(cell_at(Click::new(past, MARGIN + 5)), None);
    }

    #[test]
    fn test_gap_mapping() {
        assert_eq!(
            wall_slot_at(h_gap(0, 4)),
            Some(WallSlot::new(0, 4, Orientation::Horizontal))
        );
        assert_eq!(
            wall_slot_at(v_gap(3, 2)),
            Some(WallSlot::new(3, 2, Orientation::Vertical))
        );
        // Cell interiors are not wall slots.
        assert_eq!(wall_slot_at(cell_center(3, 3)), None);
        // The crossing square of two gaps is ambiguous.
        let corner = Click::new(
            MARGIN + CELL_SIZE + GAP_SIZE / 2,
            MARGIN + CELL_SIZE + GAP_SIZE / 2,
        );
        assert_eq!(wall_slot_at(corner), None);
        // There is no gap after the last row or column.
        assert_eq!(wall_slot_at(h_gap(8, 0)), None);
        assert_eq!(wall_slot_at(v_gap(0, 8)), None);
    }

    #[test]
    fn test_click_on_own_pawn_selects() {
        let state = GameState::new();
        assert_eq!(
            resolve_click(&state, cell_center(0, 4)),
            Some(Intent::SelectPawn)
        );
        // The opponent's pawn is not selectable.
        assert_eq!(resolve_click(&state, cell_center(8, 4)), None);
    }

    #[test]
    fn test_cell_click_without_selection_is_ignored() {
        let state = GameState::new();
        assert_eq!(resolve_click(&state, cell_center(4, 4)), None);
    }

    #[test]
    fn test_cell_click_with_selected_pawn_is_move() {
        let mut state = GameState::new();
        state.select_pawn(Player::First).unwrap();
        assert_eq!(
            resolve_click(&state, cell_center(1, 4)),
            Some(Intent::MoveTo(Position::new(1, 4)))
        );
        // Geometry does not pre-filter illegal targets.
        assert_eq!(
            resolve_click(&state, cell_center(7, 7)),
            Some(Intent::MoveTo(Position::new(7, 7)))
        );
    }

    #[test]
    fn test_gap_click_places_wall_in_placement_phase() {
        let state = GameState::new();
        assert_eq!(
            resolve_click(&state, h_gap(2, 3)),
            Some(Intent::PlaceWall(Wall::new(
                WallSlot::new(2, 3, Orientation::Horizontal),
                Player::First
            )))
        );
    }

    #[test]
    fn test_gap_click_over_wall_picks_up_in_movement_phase() {
        let mut state = GameState::new();
        for i in 0..WALLS_PER_PLAYER {
            state
                .apply_wall_placement(
                    Player::First,
                    Wall::new(WallSlot::new(6, i, Orientation::Horizontal), Player::First),
                )
                .unwrap();
            let target = if i % 2 == 0 {
                Position::new(7, 4)
            } else {
                Position::new(8, 4)
            };
            state.apply_move(Player::Second, target).unwrap();
        }
        assert_eq!(state.phase(Player::First), PlayerPhase::Movement);

        assert_eq!(
            resolve_click(&state, h_gap(6, 0)),
            Some(Intent::PickUpWall(Wall::new(
                WallSlot::new(6, 0, Orientation::Horizontal),
                Player::First
            )))
        );

        // Once a wall is picked up, any gap click is a drop target.
        state
            .pick_up_wall(Player::First, WallSlot::new(6, 0, Orientation::Horizontal))
            .unwrap();
        assert_eq!(
            resolve_click(&state, v_gap(1, 1)),
            Some(Intent::MoveWall(
                Position::new(1, 1),
                Orientation::Vertical
            ))
        );
    }

    #[test]
    fn test_gap_click_over_wall_in_placement_phase_attempts_placement() {
        let mut state = GameState::new();
        state
            .apply_wall_placement(
                Player::First,
                Wall::new(WallSlot::new(2, 2, Orientation::Horizontal), Player::First),
            )
            .unwrap();
        // Second still has walls to place, so the occupied gap maps to a
        // placement attempt, which the state machine will reject.
        assert_eq!(
            resolve_click(&state, h_gap(2, 2)),
            Some(Intent::PlaceWall(Wall::new(
                WallSlot::new(2, 2, Orientation::Horizontal),
                Player::Second
            )))
        );
    }
}
