//! Wire Codec
//!
//! One pose per line: five space-separated decimal flags terminated by
//! a newline, e.g. `"0 1 1 0 0\n"`. The newline is the frame boundary,
//! so a reader never has to guess where one pose ends and the next
//! begins. Anything that is not exactly five 0/1 fields is rejected and
//! the caller drops the line.

use crate::game::gesture::Pose;

/// A line that does not decode to a pose.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Wrong number of fields on the line.
    #[error("expected 5 fields, got {0}")]
    FieldCount(usize),

    /// A field was not the digit 0 or 1.
    #[error("invalid finger flag {value:?} in field {index}")]
    InvalidFlag {
        /// Zero-based field position
        index: usize,
        /// The offending token
        value: String,
    },
}

/// Encode a pose as a newline-terminated line.
pub fn encode_pose(pose: Pose) -> String {
    let Pose([thumb, index, middle, ring, pinky]) = pose;
    format!("{thumb} {index} {middle} {ring} {pinky}\n")
}

/// Decode one line (without or with its trailing newline) into a pose.
pub fn decode_pose(line: &str) -> Result<Pose, WireError> {
    let mut flags = [0u8; 5];
    let mut count = 0;
    for (index, token) in line.split_whitespace().enumerate() {
        if index >= flags.len() {
            return Err(WireError::FieldCount(line.split_whitespace().count()));
        }
        flags[index] = match token {
            "0" => 0,
            "1" => 1,
            other => {
                return Err(WireError::InvalidFlag {
                    index,
                    value: other.to_string(),
                })
            }
        };
        count = index + 1;
    }
    if count != flags.len() {
        return Err(WireError::FieldCount(count));
    }
    Ok(Pose(flags))
}
