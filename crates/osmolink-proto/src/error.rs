/// Errors that can occur while building commands or classifying notifications.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Frame-level error (field lengths, frame size, checksums).
    #[error("frame error: {0}")]
    Frame(#[from] osmolink_frame::FrameError),

    /// A value outside the fixed set the device understands.
    #[error("unsupported {parameter}: {value}")]
    UnsupportedParameter {
        parameter: &'static str,
        value: String,
    },

    /// The frame is too short to hold the fields being decoded.
    #[error("frame too short ({actual} bytes, need {needed})")]
    ParseUnderflow { needed: usize, actual: usize },

    /// A Wi-Fi scan list entry could not be decoded; the whole list is rejected.
    #[error("malformed wifi list entry {index}: {reason}")]
    MalformedListEntry { index: usize, reason: String },

    /// The frame belongs to a different command category.
    #[error("unexpected category {found:02X?} (expected {expected:02X?})")]
    UnexpectedCategory { expected: [u8; 2], found: [u8; 2] },

    /// Livestream settings could not be deserialized.
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl ProtocolError {
    pub(crate) fn unsupported(parameter: &'static str, value: impl ToString) -> Self {
        Self::UnsupportedParameter {
            parameter,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
