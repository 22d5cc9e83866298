/// Errors that can occur while building, splitting or verifying frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A builder input has the wrong number of bytes.
    #[error("invalid length for {field}: expected {expected}, got {actual} bytes")]
    InvalidFieldLength {
        field: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// The assembled frame does not fit the one-byte length field.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The first byte is not the start marker.
    #[error("invalid start marker 0x{0:02X} (expected 0x55)")]
    InvalidMarker(u8),

    /// The length field is smaller than the smallest possible frame.
    #[error("invalid length field {0} (min 13)")]
    InvalidLength(u8),

    /// Fewer bytes than the smallest frame or frame body.
    #[error("frame too short ({actual} bytes, need at least {needed})")]
    TooShort { needed: usize, actual: usize },

    /// The length field disagrees with the number of bytes present.
    #[error("length field says {declared} bytes, frame has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// A header or trailer checksum does not match the frame contents.
    #[error("{kind} mismatch (expected {expected:#06x}, found {found:#06x})")]
    ChecksumMismatch {
        kind: &'static str,
        expected: u16,
        found: u16,
    },

    /// An I/O error occurred while reading frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
