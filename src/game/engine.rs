//! Game Loop
//!
//! The single consumer and sole owner of [`GameState`]. Every input
//! producer (pointer device, local gesture pipeline, peer receiver)
//! pushes into a bounded channel; the loop drains them at a fixed 30 Hz
//! tick, applies the resulting intents in arrival order, and publishes
//! a fresh [`StateSnapshot`] for observers.
//!
//! ## Tick shape
//!
//! ```text
//!   tick ──> drain ALL pending clicks (pointer input is never dropped)
//!        ──> cooldown active? decrement and skip poses
//!            otherwise consume AT MOST ONE pose
//!        ──> drain peer notices
//!        ──> latch winner, emit GameWon once
//!        ──> publish snapshot
//! ```
//!
//! A turn-changing action starts a 60-tick cooldown and clears the pose
//! queue, so frames captured while a hand was still mid-gesture cannot
//! fire a second action. Clicks are deliberate and skip the cooldown.
//!
//! The tick body is synchronous (`try_recv` only), so unit tests drive
//! it directly without a runtime.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::game::events::GameEvent;
use crate::game::gesture::{interpret, GestureCommand, Pose};
use crate::game::intent::Intent;
use crate::game::pointer::{resolve_click, Click};
use crate::game::state::{GameState, Player, StateSnapshot};
use crate::{COOLDOWN_TICKS, TICK_RATE};

/// Pointer input queue depth.
const CLICK_QUEUE: usize = 32;
/// Pose input queue depth, local and remote combined.
const POSE_QUEUE: usize = 32;
/// Peer notice queue depth.
const NOTICE_QUEUE: usize = 4;
/// Outbound pose echo queue depth.
const OUTBOUND_QUEUE: usize = 16;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Which side of the link a pose came from. The loop maps the source to
/// a player identity; the wire itself carries no attribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseSource {
    /// Captured by this process's own gesture pipeline
    Local,
    /// Received from the peer process
    Remote,
}

/// Out-of-band condition reported by the peer link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteNotice {
    /// The connection closed or failed; no more remote poses will come
    Disconnected,
}

// =============================================================================
// CHANNEL HANDLES
// =============================================================================

/// Producer/observer ends of the loop's channels, handed to the caller
/// by [`GameLoop::new`]. Dropping the `clicks` and `poses` senders shuts
/// the loop down.
pub struct LoopChannels {
    /// Push pointer presses here (SPSC: the pointer device)
    pub clicks: mpsc::Sender<Click>,
    /// Push poses here (MPSC: local pipeline and peer receiver)
    pub poses: mpsc::Sender<(PoseSource, Pose)>,
    /// Push link conditions here (SPSC: the peer receiver)
    pub notices: mpsc::Sender<RemoteNotice>,
    /// Poses the loop wants forwarded to the peer (SPSC: peer sender)
    pub outbound: mpsc::Receiver<Pose>,
    /// Acknowledgment stream, one event per applied/refused intent
    pub events: mpsc::UnboundedReceiver<GameEvent>,
    /// Latest snapshot, refreshed every tick
    pub snapshots: watch::Receiver<StateSnapshot>,
}

// =============================================================================
// GAME LOOP
// =============================================================================

/// Owns the [`GameState`] and applies inputs to it, one tick at a time.
pub struct GameLoop {
    state: GameState,
    /// Which player this process controls; `None` runs both seats
    /// locally (hotseat), attributing every pose to the turn owner.
    role: Option<Player>,
    clicks: mpsc::Receiver<Click>,
    poses: mpsc::Receiver<(PoseSource, Pose)>,
    notices: mpsc::Receiver<RemoteNotice>,
    outbound: mpsc::Sender<Pose>,
    events: mpsc::UnboundedSender<GameEvent>,
    snapshots: watch::Sender<StateSnapshot>,
    /// Remaining ticks of gesture suppression
    cooldown: u32,
    won_emitted: bool,
    clicks_closed: bool,
    poses_closed: bool,
}

impl GameLoop {
    /// Create a loop over a fresh game plus the channel handles for its
    /// producers and observers.
    pub fn new(role: Option<Player>) -> (GameLoop, LoopChannels) {
        let state = GameState::new();
        let (click_tx, click_rx) = mpsc::channel(CLICK_QUEUE);
        let (pose_tx, pose_rx) = mpsc::channel(POSE_QUEUE);
        let (notice_tx, notice_rx) = mpsc::channel(NOTICE_QUEUE);
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

        let game_loop = GameLoop {
            state,
            role,
            clicks: click_rx,
            poses: pose_rx,
            notices: notice_rx,
            outbound: outbound_tx,
            events: event_tx,
            snapshots: snapshot_tx,
            cooldown: 0,
            won_emitted: false,
            clicks_closed: false,
            poses_closed: false,
        };
        let channels = LoopChannels {
            clicks: click_tx,
            poses: pose_tx,
            notices: notice_tx,
            outbound: outbound_rx,
            events: event_rx,
            snapshots: snapshot_rx,
        };
        (game_loop, channels)
    }

    /// Current state, read-only.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run the loop at [`TICK_RATE`] until every input channel closes.
    pub async fn run(mut self) {
        let period = std::time::Duration::from_secs(1) / TICK_RATE;
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        info!(role = ?self.role, "game loop started");

        loop {
            ticker.tick().await;
            self.tick();
            if self.clicks_closed && self.poses_closed {
                info!("all input channels closed, game loop stopping");
                return;
            }
        }
    }

    /// One tick: drain clicks, consume at most one pose (unless cooling
    /// down), drain notices, latch the winner, publish a snapshot.
    pub fn tick(&mut self) {
        loop {
            match self.clicks.try_recv() {
                Ok(click) => self.process_click(click),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.clicks_closed = true;
                    break;
                }
            }
        }

        if self.cooldown > 0 {
            self.cooldown -= 1;
        } else {
            match self.poses.try_recv() {
                Ok((source, pose)) => self.process_pose(source, pose),
                Err(mpsc::error::TryRecvError::Empty) => {}
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.poses_closed = true;
                }
            }
        }

        while let Ok(notice) = self.notices.try_recv() {
            match notice {
                RemoteNotice::Disconnected => {
                    warn!("peer disconnected, continuing locally");
                    self.state.set_notice("Opponent disconnected");
                    let _ = self.events.send(GameEvent::PeerDisconnected);
                }
            }
        }

        if !self.won_emitted {
            if let Some(winner) = self.state.check_win() {
                info!(?winner, "game won");
                let _ = self.events.send(GameEvent::won(winner));
                self.won_emitted = true;
            }
        }

        self.snapshots.send_replace(self.state.snapshot());
    }

    // -------------------------------------------------------------------------
    // Input processing
    // -------------------------------------------------------------------------

    fn process_click(&mut self, click: Click) {
        // Clicks act for whoever owns the turn; a wrong-seat click just
        // produces an intent the state machine refuses.
        let player = self.state.turn();
        let Some(intent) = resolve_click(&self.state, click) else {
            debug!(?click, "click resolved to nothing");
            return;
        };
        self.apply_intent(player, intent, None);
    }

    fn process_pose(&mut self, source: PoseSource, pose: Pose) {
        let Some(command) = interpret(pose) else {
            debug!(?pose, "unrecognized pose dropped");
            return;
        };
        let actor = match (self.role, source) {
            (Some(me), PoseSource::Local) => me,
            (Some(me), PoseSource::Remote) => me.opponent(),
            (None, _) => self.state.turn(),
        };
        let intent = match command {
            GestureCommand::SelectPawn => Intent::SelectPawn,
            GestureCommand::Move(direction) => {
                // A move gesture only means something once the actor's
                // pawn is the current selection.
                if self.state.selected_pawn() != Some(actor) {
                    debug!(?actor, ?direction, "move gesture without a selected pawn");
                    return;
                }
                match self.state.pawn(actor).step(direction) {
                    Some(target) => Intent::MoveTo(target),
                    None => {
                        debug!(?actor, ?direction, "move gesture walks off the board");
                        return;
                    }
                }
            }
        };
        // Only locally captured poses that had an effect are echoed; the
        // peer must not see our replay of its own input.
        let echo = (source == PoseSource::Local).then_some(pose);
        self.apply_intent(actor, intent, echo);
    }

    fn apply_intent(&mut self, player: Player, intent: Intent, echo: Option<Pose>) {
        match self.state.apply(player, &intent) {
            Ok(applied) => {
                debug!(?player, ?intent, turn_flipped = applied.turn_flipped, "intent applied");
                let _ = self
                    .events
                    .send(GameEvent::applied(player, intent, applied.turn_flipped));
                if applied.changed {
                    if let Some(pose) = echo {
                        if self.outbound.try_send(pose).is_err() {
                            warn!("outbound pose queue full, echo dropped");
                        }
                    }
                }
                if applied.turn_flipped {
                    self.cooldown = COOLDOWN_TICKS;
                    // Frames captured mid-gesture are stale now.
                    while self.poses.try_recv().is_ok() {}
                }
            }
            Err(reason) => {
                debug!(?player, ?intent, %reason, "intent rejected");
                let _ = self.events.send(GameEvent::rejected(player, intent, reason));
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
