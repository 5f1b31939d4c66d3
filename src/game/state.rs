//! Game State
//!
//! The authoritative board/turn/wall state machine. All mutation and
//! validation lives here; legality of every action is decided by the
//! state's own `turn` field, never by the order events arrived in.
//!
//! Uses BTreeMap for the wall set so slot uniqueness is structural and
//! iteration order is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::board::{blocking_slot, Position, WallSlot};
use crate::game::intent::Intent;
use crate::{BOARD_SIZE, WALLS_PER_PLAYER};

/// Rejection banner shown for a refused pawn or wall move.
const MSG_MOVE: &str = "Move not possible";
/// Rejection banner shown for a refused wall placement.
const MSG_WALL: &str = "Wall placement not possible";

// =============================================================================
// PLAYER
// =============================================================================

/// One of the two player identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Starts at (0, 4), wins by reaching row 8
    First,
    /// Starts at (8, 4), wins by reaching row 0
    Second,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Row this player must reach to win.
    #[inline]
    pub fn goal_row(self) -> u8 {
        match self {
            Player::First => BOARD_SIZE - 1,
            Player::Second => 0,
        }
    }

    /// Fixed starting cell.
    pub fn start_position(self) -> Position {
        match self {
            Player::First => Position::new(0, 4),
            Player::Second => Position::new(BOARD_SIZE - 1, 4),
        }
    }

    /// Index for per-player arrays.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Per-player wall phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    /// Fewer than six walls placed; new walls may be placed
    Placement,
    /// All six walls placed; placed walls may be picked up and relocated
    Movement,
}

// =============================================================================
// WALL
// =============================================================================

/// A placed wall: a slot plus the player who placed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    /// The `(row, col, orientation)` key the wall occupies
    pub slot: WallSlot,
    /// Player who placed it
    pub owner: Player,
}

impl Wall {
    /// Create a wall.
    pub const fn new(slot: WallSlot, owner: Player) -> Self {
        Self { slot, owner }
    }
}

// =============================================================================
// REJECTIONS
// =============================================================================

/// Why a mutation was refused. Recoverable and local-only: a rejection
/// leaves the game state untouched apart from the banner message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum Rejection {
    /// The game has a winner; terminal state is absorbing.
    #[error("game is over")]
    GameOver,

    /// The acting player does not own the current turn.
    #[error("not this player's turn")]
    NotYourTurn,

    /// Move target lies off the board.
    #[error("target cell is out of bounds")]
    OutOfBounds,

    /// Move target is not orthogonally adjacent.
    #[error("target cell is not adjacent")]
    NotAdjacent,

    /// A wall blocks the edge between the two cells.
    #[error("a wall blocks the move")]
    Blocked,

    /// No walls left to place.
    #[error("no walls remaining")]
    NoWallsRemaining,

    /// Another wall already occupies the slot.
    #[error("wall slot is occupied")]
    SlotOccupied,

    /// No wall exists at the named slot.
    #[error("no wall at that slot")]
    WallNotFound,

    /// Wall relocation requires all six walls placed first.
    #[error("player is still in the placement phase")]
    NotInMovementPhase,

    /// Wall relocation without a picked-up wall.
    #[error("no wall is picked up")]
    NoWallSelected,
}

/// Outcome of a successfully applied intent, reported back so the loop
/// can decide about cooldowns and peer echo without re-reading state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Applied {
    /// Whether the action changed a pawn position, wall, or selection
    pub changed: bool,
    /// Whether the turn passed to the other player
    pub turn_flipped: bool,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of one game.
///
/// Created once per process with the fixed initial layout and mutated
/// only by the game loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Pawn cell per player, indexed by [`Player::index`]
    pawns: [Position; 2],
    /// Placed walls keyed by slot; uniqueness is structural
    walls: BTreeMap<WallSlot, Player>,
    /// Walls left to place, per player
    walls_remaining: [u8; 2],
    /// Walls placed so far, per player
    walls_placed: [u8; 2],
    /// Whose turn it is
    turn: Player,
    /// Pawn selected for the next gesture/click move, if any
    selected_pawn: Option<Player>,
    /// Wall picked up for relocation, if any
    selected_wall: Option<Wall>,
    /// Last rejection banner, cleared by the next successful action
    message: Option<String>,
    /// Latched winner; set once, never cleared
    winner: Option<Player>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create the initial layout: pawns on their start cells, no walls,
    /// six walls in each reserve, First to move.
    pub fn new() -> Self {
        Self {
            pawns: [
                Player::First.start_position(),
                Player::Second.start_position(),
            ],
            walls: BTreeMap::new(),
            walls_remaining: [WALLS_PER_PLAYER; 2],
            walls_placed: [0; 2],
            turn: Player::First,
            selected_pawn: None,
            selected_wall: None,
            message: None,
            winner: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current cell of a player's pawn.
    #[inline]
    pub fn pawn(&self, player: Player) -> Position {
        self.pawns[player.index()]
    }

    /// Whose turn it is.
    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Walls left in a player's reserve.
    #[inline]
    pub fn walls_remaining(&self, player: Player) -> u8 {
        self.walls_remaining[player.index()]
    }

    /// Walls a player has placed.
    #[inline]
    pub fn walls_placed(&self, player: Player) -> u8 {
        self.walls_placed[player.index()]
    }

    /// Wall phase for a player. Each player transitions to the movement
    /// phase individually once their own six walls are down.
    pub fn phase(&self, player: Player) -> PlayerPhase {
        if self.walls_placed[player.index()] >= WALLS_PER_PLAYER {
            PlayerPhase::Movement
        } else {
            PlayerPhase::Placement
        }
    }

    /// Owner of the wall at `slot`, if one is placed there.
    pub fn wall_at(&self, slot: WallSlot) -> Option<Player> {
        self.walls.get(&slot).copied()
    }

    /// Iterate placed walls in slot order.
    pub fn walls(&self) -> impl Iterator<Item = Wall> + '_ {
        self.walls
            .iter()
            .map(|(slot, owner)| Wall::new(*slot, *owner))
    }

    /// Currently selected pawn, if any.
    #[inline]
    pub fn selected_pawn(&self) -> Option<Player> {
        self.selected_pawn
    }

    /// Currently picked-up wall, if any.
    #[inline]
    pub fn selected_wall(&self) -> Option<Wall> {
        self.selected_wall
    }

    /// Last rejection banner.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Latched winner, if the game has ended.
    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Apply a normalized intent on behalf of `player`.
    ///
    /// The single entry point the game loop uses; dispatches to the
    /// operation methods below.
    pub fn apply(&mut self, player: Player, intent: &Intent) -> Result<Applied, Rejection> {
        match intent {
            Intent::SelectPawn => self.select_pawn(player),
            Intent::MoveTo(target) => self.apply_move(player, *target),
            Intent::PlaceWall(wall) => self.apply_wall_placement(player, *wall),
            Intent::PickUpWall(wall) => self.pick_up_wall(player, wall.slot),
            Intent::MoveWall(position, orientation) => {
                let picked = self.selected_wall.ok_or(Rejection::NoWallSelected)?;
                self.apply_wall_move(
                    player,
                    picked,
                    WallSlot::new(position.row, position.col, *orientation),
                )
            }
        }
    }

    /// Select `player`'s own pawn for a subsequent move. Only legal on
    /// that player's turn; clears any picked-up wall.
    pub fn select_pawn(&mut self, player: Player) -> Result<Applied, Rejection> {
        self.ensure_live()?;
        if player != self.turn {
            return Err(Rejection::NotYourTurn);
        }
        let changed = self.selected_pawn != Some(player);
        self.selected_pawn = Some(player);
        self.selected_wall = None;
        Ok(Applied { changed, turn_flipped: false })
    }

    /// Move `player`'s pawn to `target`.
    ///
    /// Valid iff it is `player`'s turn, `target` is in bounds, exactly
    /// one cell away along a single axis, and no wall blocks the edge
    /// between the cells. On success the turn flips and the banner
    /// clears; on failure the banner reads "Move not possible" and
    /// nothing else changes.
    pub fn apply_move(&mut self, player: Player, target: Position) -> Result<Applied, Rejection> {
        self.ensure_live()?;
        self.check_move(player, target).inspect_err(|_| {
            self.message = Some(MSG_MOVE.to_string());
        })?;

        self.pawns[player.index()] = target;
        self.turn = self.turn.opponent();
        self.selected_pawn = None;
        self.message = None;
        self.latch_winner();
        Ok(Applied { changed: true, turn_flipped: true })
    }

    fn check_move(&self, player: Player, target: Position) -> Result<(), Rejection> {
        if player != self.turn {
            return Err(Rejection::NotYourTurn);
        }
        if !target.in_bounds() {
            return Err(Rejection::OutOfBounds);
        }
        let current = self.pawn(player);
        if !current.is_adjacent(target) {
            return Err(Rejection::NotAdjacent);
        }
        // Adjacent cells always have a blocking slot.
        if let Some(slot) = blocking_slot(current, target) {
            if self.walls.contains_key(&slot) {
                return Err(Rejection::Blocked);
            }
        }
        Ok(())
    }

    /// Place a new wall from `player`'s reserve.
    ///
    /// Valid iff it is `player`'s turn, the reserve is non-empty, and no
    /// wall occupies the slot (regardless of owner). Deliberately does
    /// NOT verify that a path to each goal row stays open; a wall may
    /// fully enclose a pawn, matching the rules this game shipped with.
    pub fn apply_wall_placement(
        &mut self,
        player: Player,
        wall: Wall,
    ) -> Result<Applied, Rejection> {
        self.ensure_live()?;
        self.check_wall_placement(player, wall.slot).inspect_err(|_| {
            self.message = Some(MSG_WALL.to_string());
        })?;

        self.walls.insert(wall.slot, player);
        self.walls_remaining[player.index()] -= 1;
        self.walls_placed[player.index()] += 1;
        self.turn = self.turn.opponent();
        self.selected_pawn = None;
        self.selected_wall = None;
        self.message = None;
        Ok(Applied { changed: true, turn_flipped: true })
    }

    fn check_wall_placement(&self, player: Player, slot: WallSlot) -> Result<(), Rejection> {
        if player != self.turn {
            return Err(Rejection::NotYourTurn);
        }
        if self.walls_remaining[player.index()] == 0 {
            return Err(Rejection::NoWallsRemaining);
        }
        if self.walls.contains_key(&slot) {
            return Err(Rejection::SlotOccupied);
        }
        Ok(())
    }

    /// Pick up a placed wall for relocation. Only reachable once
    /// `player` has placed all six walls; sets the wall as selected but
    /// leaves it on the board until [`GameState::apply_wall_move`].
    pub fn pick_up_wall(&mut self, player: Player, slot: WallSlot) -> Result<Applied, Rejection> {
        self.ensure_live()?;
        if player != self.turn {
            return Err(Rejection::NotYourTurn);
        }
        if self.phase(player) != PlayerPhase::Movement {
            return Err(Rejection::NotInMovementPhase);
        }
        let owner = self.walls.get(&slot).copied().ok_or(Rejection::WallNotFound)?;
        let wall = Wall::new(slot, owner);
        let changed = self.selected_wall != Some(wall);
        self.selected_wall = Some(wall);
        self.selected_pawn = None;
        Ok(Applied { changed, turn_flipped: false })
    }

    /// Relocate `picked` to `target`. Atomic: either the wall ends up
    /// at `target` (owned by `player`) and the turn flips, or the exact
    /// original wall is restored (same owner) and the turn is unchanged.
    pub fn apply_wall_move(
        &mut self,
        player: Player,
        picked: Wall,
        target: WallSlot,
    ) -> Result<Applied, Rejection> {
        self.ensure_live()?;
        if player != self.turn {
            self.message = Some(MSG_MOVE.to_string());
            return Err(Rejection::NotYourTurn);
        }
        if self.phase(player) != PlayerPhase::Movement {
            self.message = Some(MSG_MOVE.to_string());
            return Err(Rejection::NotInMovementPhase);
        }
        let Some(owner) = self.walls.remove(&picked.slot) else {
            self.message = Some(MSG_MOVE.to_string());
            return Err(Rejection::WallNotFound);
        };

        if self.walls.contains_key(&target) {
            // Restore the original wall verbatim.
            self.walls.insert(picked.slot, owner);
            self.selected_wall = None;
            self.message = Some(MSG_MOVE.to_string());
            return Err(Rejection::SlotOccupied);
        }

        self.walls.insert(target, player);
        self.selected_wall = None;
        self.turn = self.turn.opponent();
        self.message = None;
        Ok(Applied { changed: true, turn_flipped: true })
    }

    /// The winner, computed from pawn rows and latched: First wins on
    /// reaching row 8, Second on reaching row 0. Once set the game is
    /// terminal and every mutating operation becomes a no-op rejection.
    pub fn check_win(&mut self) -> Option<Player> {
        self.latch_winner();
        self.winner
    }

    fn latch_winner(&mut self) {
        if self.winner.is_some() {
            return;
        }
        for player in [Player::First, Player::Second] {
            if self.pawn(player).row == player.goal_row() {
                self.winner = Some(player);
                return;
            }
        }
    }

    fn ensure_live(&self) -> Result<(), Rejection> {
        match self.winner {
            Some(_) => Err(Rejection::GameOver),
            None => Ok(()),
        }
    }

    /// Record a status banner that did not come from a rejected action
    /// (e.g. peer disconnect). Overwrites any rejection banner.
    pub fn set_notice(&mut self, notice: &str) {
        self.message = Some(notice.to_string());
    }

    // -------------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------------

    /// Read-only view for the renderer and any other observer.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            pawns: self.pawns,
            walls: self.walls().collect(),
            walls_remaining: self.walls_remaining,
            walls_placed: self.walls_placed,
            turn: self.turn,
            selected_pawn: self.selected_pawn,
            selected_wall: self.selected_wall,
            message: self.message.clone(),
            winner: self.winner,
        }
    }
}

/// Immutable per-tick view of the game, sufficient to draw the board,
/// pawns, walls, turn text, wall counts, and a win banner.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Pawn cells indexed by [`Player::index`]
    pub pawns: [Position; 2],
    /// Placed walls in slot order
    pub walls: Vec<Wall>,
    /// Reserve counts indexed by player
    pub walls_remaining: [u8; 2],
    /// Placed counts indexed by player
    pub walls_placed: [u8; 2],
    /// Whose turn it is
    pub turn: Player,
    /// Selected pawn, if any
    pub selected_pawn: Option<Player>,
    /// Picked-up wall, if any
    pub selected_wall: Option<Wall>,
    /// Current banner message
    pub message: Option<String>,
    /// Winner, once the game is over
    pub winner: Option<Player>,
}

// =============================================================================
// TESTS
// =============================================================================
