//! Game Events
//!
//! Facts emitted by the game loop after it has applied (or refused) an
//! intent. Observers such as the renderer and the log subscriber read
//! these instead of polling state, so "what just happened" has exactly
//! one source.

use serde::{Deserialize, Serialize};

use crate::game::intent::Intent;
use crate::game::state::{Player, Rejection};

/// Something that happened inside the game loop this tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An intent passed validation and mutated the state.
    IntentApplied {
        /// Who acted
        player: Player,
        /// What they did
        intent: Intent,
        /// Whether the turn passed to the opponent
        turn_flipped: bool,
    },

    /// An intent was refused; the state is unchanged apart from the
    /// banner message.
    IntentRejected {
        /// Who tried to act
        player: Player,
        /// What they tried
        intent: Intent,
        /// Why it was refused
        reason: Rejection,
    },

    /// A pawn reached its goal row. Emitted exactly once per game.
    GameWon {
        /// The player whose pawn arrived
        winner: Player,
    },

    /// The peer connection closed; the game continues locally.
    PeerDisconnected,
}

impl GameEvent {
    /// Build an [`GameEvent::IntentApplied`].
    pub fn applied(player: Player, intent: Intent, turn_flipped: bool) -> Self {
        GameEvent::IntentApplied {
            player,
            intent,
            turn_flipped,
        }
    }

    /// Build an [`GameEvent::IntentRejected`].
    pub fn rejected(player: Player, intent: Intent, reason: Rejection) -> Self {
        GameEvent::IntentRejected {
            player,
            intent,
            reason,
        }
    }

    /// Build a [`GameEvent::GameWon`].
    pub fn won(winner: Player) -> Self {
        GameEvent::GameWon { winner }
    }
}
