//! Gesture Vocabulary
//!
//! Poses arrive as five-finger extension flags (thumb through pinky,
//! each 0 or 1) from the local capture pipeline or from the peer. Only
//! five of the 32 patterns mean anything; the rest are ignored.

use serde::{Deserialize, Serialize};

use crate::game::board::Direction;

/// A five-finger pose: one flag per finger, thumb first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose(
    /// Extension flags in order thumb, index, middle, ring, pinky
    pub [u8; 5],
);

impl Pose {
    /// Thumb only: select the current player's pawn.
    pub const SELECT: Pose = Pose([1, 0, 0, 0, 0]);
    /// Index only: move up (toward row 0).
    pub const UP: Pose = Pose([0, 1, 0, 0, 0]);
    /// Index + middle: move down (toward row 8).
    pub const DOWN: Pose = Pose([0, 1, 1, 0, 0]);
    /// Index + middle + ring: move left.
    pub const LEFT: Pose = Pose([0, 1, 1, 1, 0]);
    /// Four fingers, no thumb: move right.
    pub const RIGHT: Pose = Pose([0, 1, 1, 1, 1]);
}

/// A recognized gesture, before it is bound to a pawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureCommand {
    /// Select the acting player's pawn
    SelectPawn,
    /// Move the selected pawn one cell
    Move(Direction),
}

/// Map a pose to a command by exact pattern match. Unrecognized poses
/// yield `None` and are dropped by the caller.
pub fn interpret(pose: Pose) -> Option<GestureCommand> {
    match pose {
        Pose::SELECT => Some(GestureCommand::SelectPawn),
        Pose::UP => Some(GestureCommand::Move(Direction::Up)),
        Pose::DOWN => Some(GestureCommand::Move(Direction::Down)),
        Pose::LEFT => Some(GestureCommand::Move(Direction::Left)),
        Pose::RIGHT => Some(GestureCommand::Move(Direction::Right)),
        _ => None,
    }
}
