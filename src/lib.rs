//! # Gesture Quoridor
//!
//! Core of a two-player Quoridor variant played through a camera-driven
//! gesture interface, with an optional networked mode where two processes
//! keep replicas of the same game in agreement over a TCP link.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GESTURE QUORIDOR                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  game/           - Game logic and the turn-owning loop       │
//! │  ├── board.rs    - Cells, wall slots, edge blocking          │
//! │  ├── state.rs    - Authoritative board/turn/wall state       │
//! │  ├── gesture.rs  - 5-bit pose vector interpretation          │
//! │  ├── intent.rs   - Normalized player actions                 │
//! │  ├── pointer.rs  - Pixel-to-board click resolution           │
//! │  ├── engine.rs   - Single-writer tick loop                   │
//! │  └── events.rs   - Applied/rejected intent acknowledgments   │
//! │                                                              │
//! │  network/        - Peer synchronization                      │
//! │  ├── wire.rs     - Line codec for pose vectors               │
//! │  └── peer.rs     - TCP link, sender + receiver tasks         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single-writer guarantee
//!
//! Only the [`game::engine::GameLoop`] mutates [`GameState`]: it owns the
//! state by value and every other party (gesture pipeline, pointer device,
//! peer receiver) feeds it through channels. The renderer and any other
//! reader observe the game exclusively through [`StateSnapshot`] values
//! published on a watch channel after each tick. Legality of every action
//! is arbitrated by the state's own turn field, never by queue ordering.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod game;
pub mod network;

// Re-export commonly used types
pub use game::board::{Direction, Orientation, Position, WallSlot};
pub use game::engine::{GameLoop, LoopChannels, PoseSource, RemoteNotice};
pub use game::gesture::Pose;
pub use game::intent::Intent;
pub use game::state::{GameState, Player, Rejection, StateSnapshot, Wall};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Board side length in cells
pub const BOARD_SIZE: u8 = 9;

/// Walls issued to each player at the start of a game
pub const WALLS_PER_PLAYER: u8 = 6;

/// Game loop tick rate (Hz)
pub const TICK_RATE: u32 = 30;

/// Ticks the loop ignores gesture input after a turn-changing move
/// (2 seconds at 30 Hz), so stale frames from a hand still mid-pose
/// are not re-consumed.
pub const COOLDOWN_TICKS: u32 = 60;
