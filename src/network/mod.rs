//! Network Module
//!
//! Keeps two processes' replicas of the same game in agreement by
//! forwarding effective gesture poses over a TCP link.
//!
//! ## Module Structure
//!
//! - `wire`: the line codec, one pose per newline-framed ASCII line
//! - `peer`: connection setup plus the paced sender and receiver tasks

pub mod peer;
pub mod wire;

pub use peer::{PeerConfig, PeerLink, PeerRole};
pub use wire::{decode_pose, encode_pose, WireError};
