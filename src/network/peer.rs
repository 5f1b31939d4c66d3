//! Peer Link
//!
//! A single TCP connection to the other player's process. One side
//! listens and plays First; the other connects and plays Second. Once
//! the link is up, two tasks run until the game ends or the connection
//! drops:
//!
//! - the sender pulls effective local poses off the loop's outbound
//!   queue, writes one line each, and paces itself so the peer's
//!   30 Hz loop has consumed one pose (and its cooldown) before the
//!   next arrives;
//! - the receiver reads newline-framed lines, decodes them, and feeds
//!   them to the loop tagged [`PoseSource::Remote`]. Malformed lines
//!   are logged and dropped; a closed or failed connection becomes a
//!   [`RemoteNotice::Disconnected`] and the game continues locally.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::game::engine::{PoseSource, RemoteNotice};
use crate::game::gesture::Pose;
use crate::game::state::Player;
use crate::network::wire::{decode_pose, encode_pose};

/// Default delay after each sent pose.
pub const SEND_PACING: Duration = Duration::from_secs(1);

/// Which end of the link this process is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerRole {
    /// Bind and wait for the opponent; plays First
    Listen,
    /// Dial the opponent; plays Second
    Connect,
}

impl PeerRole {
    /// The player identity this end controls.
    pub fn player(self) -> Player {
        match self {
            PeerRole::Listen => Player::First,
            PeerRole::Connect => Player::Second,
        }
    }
}

/// How to establish the link.
#[derive(Clone, Copy, Debug)]
pub struct PeerConfig {
    /// Listen or connect
    pub role: PeerRole,
    /// Address to bind or dial
    pub addr: SocketAddr,
    /// Delay after each sent pose
    pub pacing: Duration,
}

impl PeerConfig {
    /// Config with the default pacing.
    pub fn new(role: PeerRole, addr: SocketAddr) -> Self {
        Self {
            role,
            addr,
            pacing: SEND_PACING,
        }
    }
}

/// Handles to the two running link tasks.
pub struct PeerLink {
    /// Address of the other end
    pub peer_addr: SocketAddr,
    sender: JoinHandle<()>,
    receiver: JoinHandle<()>,
}

impl PeerLink {
    /// Establish the connection per `config` and spawn the sender and
    /// receiver tasks over it.
    pub async fn establish(
        config: PeerConfig,
        outbound: mpsc::Receiver<Pose>,
        poses: mpsc::Sender<(PoseSource, Pose)>,
        notices: mpsc::Sender<RemoteNotice>,
    ) -> std::io::Result<PeerLink> {
        let (stream, peer_addr) = match config.role {
            PeerRole::Listen => {
                let listener = TcpListener::bind(config.addr).await?;
                info!(addr = %listener.local_addr()?, "waiting for opponent");
                listener.accept().await?
            }
            PeerRole::Connect => {
                let stream = TcpStream::connect(config.addr).await?;
                let peer_addr = stream.peer_addr()?;
                (stream, peer_addr)
            }
        };
        info!(%peer_addr, role = ?config.role, "peer link established");
        Ok(Self::spawn(stream, peer_addr, config.pacing, outbound, poses, notices))
    }

    /// Spawn the link tasks over an already-connected stream.
    pub fn spawn(
        stream: TcpStream,
        peer_addr: SocketAddr,
        pacing: Duration,
        outbound: mpsc::Receiver<Pose>,
        poses: mpsc::Sender<(PoseSource, Pose)>,
        notices: mpsc::Sender<RemoteNotice>,
    ) -> PeerLink {
        let (read_half, write_half) = stream.into_split();
        PeerLink {
            peer_addr,
            sender: tokio::spawn(send_loop(write_half, outbound, pacing)),
            receiver: tokio::spawn(recv_loop(read_half, poses, notices)),
        }
    }

    /// Wait for both tasks to finish.
    pub async fn join(self) {
        let _ = self.sender.await;
        let _ = self.receiver.await;
    }
}

/// Forward outbound poses to the peer, one line each, paced.
async fn send_loop(mut writer: OwnedWriteHalf, mut outbound: mpsc::Receiver<Pose>, pacing: Duration) {
    while let Some(pose) = outbound.recv().await {
        let line = encode_pose(pose);
        if let Err(error) = writer.write_all(line.as_bytes()).await {
            warn!(%error, "pose send failed, sender stopping");
            return;
        }
        debug!(?pose, "pose sent to peer");
        tokio::time::sleep(pacing).await;
    }
    debug!("outbound queue closed, sender stopping");
}

/// Read newline-framed lines from the peer until the stream ends.
async fn recv_loop(
    reader: OwnedReadHalf,
    poses: mpsc::Sender<(PoseSource, Pose)>,
    notices: mpsc::Sender<RemoteNotice>,
) {
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match decode_pose(&line) {
                Ok(pose) => {
                    debug!(?pose, "pose received from peer");
                    if poses.send((PoseSource::Remote, pose)).await.is_err() {
                        return;
                    }
                }
                Err(error) => warn!(%error, line = %line, "malformed line from peer dropped"),
            },
            Ok(None) => {
                info!("peer closed the connection");
                let _ = notices.send(RemoteNotice::Disconnected).await;
                return;
            }
            Err(error) => {
                warn!(%error, "peer read failed");
                let _ = notices.send(RemoteNotice::Disconnected).await;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        link: PeerLink,
        outbound: mpsc::Sender<Pose>,
        poses: mpsc::Receiver<(PoseSource, Pose)>,
        notices: mpsc::Receiver<RemoteNotice>,
    }

    /// Two ends of a loopback connection, with zero pacing so tests do
    /// not wait out the real send delay.
    async fn loopback_pair() -> (Harness, Harness) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (accepted, connected) = tokio::join!(listener.accept(), TcpStream::connect(addr));
        let (listen_stream, peer_addr) = accepted.unwrap();
        let connect_stream = connected.unwrap();

        let mut harnesses = Vec::new();
        for (stream, remote) in [(listen_stream, peer_addr), (connect_stream, addr)] {
            let (outbound_tx, outbound_rx) = mpsc::channel(16);
            let (pose_tx, pose_rx) = mpsc::channel(16);
            let (notice_tx, notice_rx) = mpsc::channel(4);
            let link =
                PeerLink::spawn(stream, remote, Duration::ZERO, outbound_rx, pose_tx, notice_tx);
            harnesses.push(Harness {
                link,
                outbound: outbound_tx,
                poses: pose_rx,
                notices: notice_rx,
            });
        }
        let second = harnesses.pop().unwrap();
        let first = harnesses.pop().unwrap();
        (first, second)
    }

    #[tokio::test]
    async fn test_pose_crosses_the_link_tagged_remote() {
        let (first, mut second) = loopback_pair().await;
        first.outbound.send(Pose::SELECT).await.unwrap();
        first.outbound.send(Pose::DOWN).await.unwrap();

        assert_eq!(
            second.poses.recv().await,
            Some((PoseSource::Remote, Pose::SELECT))
        );
        assert_eq!(
            second.poses.recv().await,
            Some((PoseSource::Remote, Pose::DOWN))
        );
    }

    #[tokio::test]
    async fn test_link_is_bidirectional() {
        let (mut first, second) = loopback_pair().await;
        second.outbound.send(Pose::UP).await.unwrap();
        assert_eq!(
            first.poses.recv().await,
            Some((PoseSource::Remote, Pose::UP))
        );
    }

    #[tokio::test]
    async fn test_disconnect_becomes_a_notice() {
        let (first, mut second) = loopback_pair().await;
        // Closing the first end's outbound queue stops its sender, which
        // drops the write half and lets the peer read EOF.
        drop(first.outbound);
        drop(first.link);

        assert_eq!(second.notices.recv().await, Some(RemoteNotice::Disconnected));
    }

    #[tokio::test]
    async fn test_malformed_lines_are_dropped_not_fatal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (accepted, connected) = tokio::join!(listener.accept(), TcpStream::connect(addr));
        let (stream, peer_addr) = accepted.unwrap();
        let mut raw = connected.unwrap();

        let (_outbound_tx, outbound_rx) = mpsc::channel(16);
        let (pose_tx, mut pose_rx) = mpsc::channel(16);
        let (notice_tx, mut notice_rx) = mpsc::channel(4);
        let _link = PeerLink::spawn(
            stream,
            peer_addr,
            Duration::ZERO,
            outbound_rx,
            pose_tx,
            notice_tx,
        );

        // Four fields, then garbage, then a valid frame.
        raw.write_all(b"0 1 1 0\nnonsense\n0 1 1 0 0\n")
            .await
            .unwrap();

        assert_eq!(
            pose_rx.recv().await,
            Some((PoseSource::Remote, Pose::DOWN))
        );
        assert!(
            notice_rx.try_recv().is_err(),
            "malformed input must not tear the link down"
        );
    }
}
