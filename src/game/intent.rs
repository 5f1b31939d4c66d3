//! Player Intents
//!
//! The single normalized action type. Gestures and clicks are both
//! reduced to an [`Intent`] before the state machine sees them, so
//! validation is written once.

use serde::{Deserialize, Serialize};

use crate::game::board::{Orientation, Position};
use crate::game::state::Wall;

/// A normalized action attempted by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Select the acting player's own pawn
    SelectPawn,
    /// Move the selected pawn to a target cell
    MoveTo(Position),
    /// Place a new wall from the reserve
    PlaceWall(Wall),
    /// Pick up a placed wall for relocation
    PickUpWall(Wall),
    /// Drop the picked-up wall at a new slot
    MoveWall(Position, Orientation),
}
