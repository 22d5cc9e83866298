//! Checksummed framing for the camera wireless control protocol.
//!
//! Every command and notification travels as one frame:
//! - A start marker (`0x55`), a one-byte total length and a `0x04` spacer
//! - A CRC8 over those three bytes
//! - A 2-byte command code, a 2-byte sequence id and a 3 or 4 byte subtype
//! - The payload, followed by a little-endian CRC16 over everything before it
//!
//! This crate builds such frames, recomputes checksums after in-place edits,
//! verifies received frames and cuts them out of byte streams.

pub mod checksum;
pub mod codec;
pub mod error;
pub mod reader;
pub mod sequence;

pub use checksum::{crc16, crc8};
pub use codec::{
    build, decode_frame, encode_frame, recompute_checksums, seal, verify, Frame, FrameConfig,
    HexDump, HEADER_SIZE, MAX_FRAME_SIZE, MIN_FRAME_SIZE, SPACER, START_MARKER, TRAILER_SIZE,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use sequence::SequenceCounter;
