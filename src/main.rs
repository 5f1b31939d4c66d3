//! Gesture Quoridor binary.
//!
//! Three modes:
//!
//! - `--demo` plays a short scripted exchange locally and prints the
//!   board after each action;
//! - `--listen ADDR` hosts a networked game as First;
//! - `--connect ADDR` joins a networked game as Second.
//!
//! In the networked modes the local gesture pipeline is stood in for by
//! stdin: each line is a five-flag pose in the same format the wire
//! uses, e.g. `1 0 0 0 0` to select and `0 1 1 0 0` to move down.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gesture_quoridor::game::engine::{GameLoop, LoopChannels, PoseSource};
use gesture_quoridor::game::events::GameEvent;
use gesture_quoridor::game::gesture::Pose;
use gesture_quoridor::game::pointer::{Click, CELL_SIZE, GAP_SIZE, MARGIN, PITCH};
use gesture_quoridor::game::state::{Player, StateSnapshot};
use gesture_quoridor::network::peer::{PeerConfig, PeerLink, PeerRole};
use gesture_quoridor::network::wire::decode_pose;
use gesture_quoridor::{Orientation, WallSlot, BOARD_SIZE, COOLDOWN_TICKS, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = VERSION, "gesture quoridor starting");

    match parse_args(std::env::args().skip(1))? {
        Mode::Demo => run_demo().await,
        Mode::Listen(addr) => run_networked(PeerRole::Listen, addr).await,
        Mode::Connect(addr) => run_networked(PeerRole::Connect, addr).await,
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

enum Mode {
    Demo,
    Listen(SocketAddr),
    Connect(SocketAddr),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Mode> {
    let mode = match args.next().as_deref() {
        None | Some("--demo") => Mode::Demo,
        Some("--listen") => Mode::Listen(parse_addr(args.next())?),
        Some("--connect") => Mode::Connect(parse_addr(args.next())?),
        Some(other) => bail!(
            "unknown argument {other:?}\nusage: gesture-quoridor [--demo | --listen ADDR | --connect ADDR]"
        ),
    };
    Ok(mode)
}

fn parse_addr(arg: Option<String>) -> Result<SocketAddr> {
    let arg = arg.context("expected an address, e.g. 127.0.0.1:7077")?;
    arg.parse()
        .with_context(|| format!("invalid address {arg:?}"))
}

// =============================================================================
// NETWORKED MODE
// =============================================================================

async fn run_networked(role: PeerRole, addr: SocketAddr) -> Result<()> {
    let player = role.player();
    info!(?role, %addr, ?player, "starting networked game");

    let (game_loop, channels) = GameLoop::new(Some(player));
    let LoopChannels {
        clicks,
        poses,
        notices,
        outbound,
        mut events,
        mut snapshots,
    } = channels;
    // No pointer device in this binary; the click queue closes right away
    // so the loop stops once the pose producers are gone.
    drop(clicks);

    let link = PeerLink::establish(PeerConfig::new(role, addr), outbound, poses.clone(), notices)
        .await
        .context("failed to establish the peer link")?;
    info!(peer = %link.peer_addr, ?player, "opponent connected");

    // Stand-in gesture pipeline: one pose per stdin line.
    let stdin_poses = poses.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match decode_pose(&line) {
                Ok(pose) => {
                    if stdin_poses.send((PoseSource::Local, pose)).await.is_err() {
                        return;
                    }
                }
                Err(error) => warn!(%error, line = %line, "unreadable pose line ignored"),
            }
        }
    });
    drop(poses);

    // Observer: log events as they happen and redraw on state changes.
    let observer = tokio::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => log_event(&event),
                    None => return,
                },
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    render(&snapshot);
                }
            }
        }
    });

    game_loop.run().await;
    link.join().await;
    let _ = observer.await;
    Ok(())
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::IntentApplied {
            player,
            intent,
            turn_flipped,
        } => info!(?player, ?intent, turn_flipped, "applied"),
        GameEvent::IntentRejected {
            player,
            intent,
            reason,
        } => info!(?player, ?intent, %reason, "rejected"),
        GameEvent::GameWon { winner } => info!(?winner, "game over"),
        GameEvent::PeerDisconnected => warn!("opponent disconnected"),
    }
}

// =============================================================================
// DEMO MODE
// =============================================================================

/// Input fed to the loop by the demo script.
enum DemoStep {
    Pose(Pose),
    Click(Click),
}

/// Play a short scripted exchange: gesture moves, a wall placement, a
/// blocked move, and the detour around it.
async fn run_demo() -> Result<()> {
    info!("running scripted demo");
    let (mut game_loop, mut channels) = GameLoop::new(None);

    let script = [
        // First selects and steps down.
        DemoStep::Pose(Pose::SELECT),
        DemoStep::Pose(Pose::DOWN),
        // Second answers with clicks: select pawn, step up.
        DemoStep::Click(cell_center(8, 4)),
        DemoStep::Click(cell_center(7, 4)),
        // First walls off Second's path at (6, 4).
        DemoStep::Click(horizontal_gap(6, 4)),
        // Second tries to step up anyway and is refused.
        DemoStep::Pose(Pose::SELECT),
        DemoStep::Pose(Pose::UP),
        // Second detours left instead.
        DemoStep::Pose(Pose::LEFT),
    ];

    for step in script {
        match step {
            DemoStep::Pose(pose) => channels
                .poses
                .send((PoseSource::Local, pose))
                .await
                .context("game loop stopped")?,
            DemoStep::Click(click) => channels
                .clicks
                .send(click)
                .await
                .context("game loop stopped")?,
        }
        // Tick past the input and any cooldown it starts. The demo
        // drives ticks directly instead of waiting out real time.
        for _ in 0..=COOLDOWN_TICKS {
            game_loop.tick();
        }
        while let Ok(event) = channels.events.try_recv() {
            log_event(&event);
        }
        render(&channels.snapshots.borrow_and_update().clone());
    }

    // Machine-readable final state, for piping into other tooling.
    let final_snapshot = channels.snapshots.borrow().clone();
    println!("{}", serde_json::to_string_pretty(&final_snapshot)?);

    info!("demo finished");
    Ok(())
}

fn cell_center(row: u8, col: u8) -> Click {
    Click::new(
        MARGIN + i32::from(col) * PITCH + CELL_SIZE / 2,
        MARGIN + i32::from(row) * PITCH + CELL_SIZE / 2,
    )
}

fn horizontal_gap(row: u8, col: u8) -> Click {
    Click::new(
        MARGIN + i32::from(col) * PITCH + CELL_SIZE / 2,
        MARGIN + i32::from(row) * PITCH + CELL_SIZE + GAP_SIZE / 2,
    )
}

// =============================================================================
// BOARD RENDERING
// =============================================================================

/// Draw the board as text: pawns as `1`/`2`, empty cells as dots, walls
/// as bars in the gaps.
fn render(snapshot: &StateSnapshot) {
    let walls: BTreeMap<WallSlot, Player> = snapshot
        .walls
        .iter()
        .map(|wall| (wall.slot, wall.owner))
        .collect();

    let mut out = String::new();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let cell = gesture_quoridor::Position::new(row, col);
            let glyph = if snapshot.pawns[0] == cell {
                '1'
            } else if snapshot.pawns[1] == cell {
                '2'
            } else {
                '.'
            };
            out.push(glyph);
            if col + 1 < BOARD_SIZE {
                let slot = WallSlot::new(row, col, Orientation::Vertical);
                out.push(if walls.contains_key(&slot) { '|' } else { ' ' });
            }
        }
        out.push('\n');
        if row + 1 < BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let slot = WallSlot::new(row, col, Orientation::Horizontal);
                out.push(if walls.contains_key(&slot) { '-' } else { ' ' });
                if col + 1 < BOARD_SIZE {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
    }

    println!("{out}");
    println!(
        "turn: {:?}   walls left: {} / {}",
        snapshot.turn, snapshot.walls_remaining[0], snapshot.walls_remaining[1]
    );
    if let Some(message) = &snapshot.message {
        println!("*** {message}");
    }
    if let Some(winner) = snapshot.winner {
        println!("*** {winner:?} wins!");
    }
}
