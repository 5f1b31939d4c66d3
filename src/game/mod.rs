//! Game Logic Module
//!
//! The authoritative game state and everything that feeds it.
//!
//! ## Module Structure
//!
//! - `board`: cells, wall slots, the edge-to-wall blocking mapping
//! - `state`: board/turn/wall state machine, all mutation and validation
//! - `gesture`: pose-vector to command interpretation
//! - `intent`: normalized player actions
//! - `pointer`: pixel coordinates to board actions
//! - `engine`: the single consumer loop that applies intents
//! - `events`: acknowledgment events for applied/rejected intents

pub mod board;
pub mod engine;
pub mod events;
pub mod gesture;
pub mod intent;
pub mod pointer;
pub mod state;

// Re-export key types
pub use board::{Direction, Orientation, Position, WallSlot};
pub use engine::{GameLoop, LoopChannels, PoseSource, RemoteNotice};
pub use events::GameEvent;
pub use gesture::{GestureCommand, Pose};
pub use intent::Intent;
pub use state::{GameState, Player, Rejection, StateSnapshot, Wall};
