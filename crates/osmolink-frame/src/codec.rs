use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::{crc16, crc16_value, crc8};
use crate::error::{FrameError, Result};

/// First byte of every frame.
pub const START_MARKER: u8 = 0x55;

/// Constant at offset 2.
pub const SPACER: u8 = 0x04;

/// Marker, length, spacer, CRC8, command (2) and sequence id (2).
pub const HEADER_SIZE: usize = 8;

/// CRC16 trailer size.
pub const TRAILER_SIZE: usize = 2;

/// Smallest complete frame: header, 3-byte subtype, no payload, trailer.
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + 3 + TRAILER_SIZE;

/// The length field is a single byte.
pub const MAX_FRAME_SIZE: usize = u8::MAX as usize;

const LENGTH_OFFSET: usize = 1;
const HEADER_CRC_OFFSET: usize = 3;

/// A complete frame.
///
/// Every value has a start marker and a length field equal to its byte
/// count. Frames from [`build`], [`seal`], [`recompute_checksums`] and
/// [`Frame::parse`] also carry a valid header CRC8 and CRC16 trailer.
/// [`decode_frame`] only checks the checksums when asked to, so frames cut
/// with verification off may carry bad ones; run [`verify`] on
/// [`Frame::as_bytes`] to find out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Wrap received or pre-baked bytes after checking every invariant.
    pub fn parse(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        verify(&bytes)?;
        Ok(Self { bytes })
    }

    /// Command code at offsets 4..6.
    pub fn command(&self) -> [u8; 2] {
        [self.bytes[4], self.bytes[5]]
    }

    /// The command code a device response to this frame carries.
    ///
    /// Responses swap the two command bytes: `02 07` is answered by `07 02`.
    pub fn response_command(&self) -> [u8; 2] {
        [self.bytes[5], self.bytes[4]]
    }

    /// Sequence id at offsets 6..8.
    pub fn sequence_id(&self) -> [u8; 2] {
        [self.bytes[6], self.bytes[7]]
    }

    /// The complete wire bytes, trailer included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the frame and return its wire bytes.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Total wire size.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        HexDump(&self.bytes).fmt(f)
    }
}

/// Space-separated lowercase hex, as frames are usually quoted in captures.
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Build a complete frame.
///
/// Wire format:
/// ```text
/// ┌────────┬────────┬────────┬────────┬─────────┬──────────┬─────────┬─────────┬─────────┐
/// │ 0x55   │ Length │ 0x04   │ CRC8   │ Command │ Sequence │ Subtype │ Payload │ CRC16   │
/// │        │ (1B)   │        │ [0..3) │ (2B)    │ (2B)     │ (3|4B)  │         │ (2B LE) │
/// └────────┴────────┴────────┴────────┴─────────┴──────────┴─────────┴─────────┴─────────┘
/// ```
///
/// `command` and `sequence_id` must be exactly 2 bytes and `subtype` 3 or 4
/// bytes, otherwise [`FrameError::InvalidFieldLength`] names the field.
pub fn build(command: &[u8], sequence_id: &[u8], subtype: &[u8], payload: &[u8]) -> Result<Frame> {
    let mut dst = BytesMut::new();
    encode_frame(command, sequence_id, subtype, payload, &mut dst)?;
    let frame = Frame {
        bytes: dst.freeze(),
    };
    tracing::trace!(frame = %frame, "built frame");
    Ok(frame)
}

/// Append a complete frame to `dst`.
///
/// On error `dst` is left as it was.
pub fn encode_frame(
    command: &[u8],
    sequence_id: &[u8],
    subtype: &[u8],
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    check_field("command", command, &[2], "2")?;
    check_field("sequence id", sequence_id, &[2], "2")?;
    check_field("subtype", subtype, &[3, 4], "3 or 4")?;

    let size = HEADER_SIZE + subtype.len() + payload.len() + TRAILER_SIZE;
    if size > MAX_FRAME_SIZE {
        return Err(FrameError::FrameTooLarge {
            size,
            max: MAX_FRAME_SIZE,
        });
    }

    let start = dst.len();
    dst.reserve(size);
    dst.put_u8(START_MARKER);
    dst.put_u8(0x00); // length, filled by seal
    dst.put_u8(SPACER);
    dst.put_u8(0x00); // header CRC, filled by seal
    dst.put_slice(command);
    dst.put_slice(sequence_id);
    dst.put_slice(subtype);
    dst.put_slice(payload);
    write_checksums(dst, start);
    Ok(())
}

/// Seal a frame body that has no trailer yet.
///
/// Writes the length field and header CRC, then appends the CRC16 trailer.
/// Every byte of `body` is kept, whatever its length field said before.
pub fn seal(body: &[u8]) -> Result<Frame> {
    let min_body = MIN_FRAME_SIZE - TRAILER_SIZE;
    if body.len() < min_body {
        return Err(FrameError::TooShort {
            needed: min_body,
            actual: body.len(),
        });
    }
    if body[0] != START_MARKER {
        return Err(FrameError::InvalidMarker(body[0]));
    }

    let size = body.len() + TRAILER_SIZE;
    if size > MAX_FRAME_SIZE {
        return Err(FrameError::FrameTooLarge {
            size,
            max: MAX_FRAME_SIZE,
        });
    }

    let mut dst = BytesMut::with_capacity(size);
    dst.put_slice(body);
    write_checksums(&mut dst, 0);
    Ok(Frame {
        bytes: dst.freeze(),
    })
}

/// Recompute length, header CRC and trailer of a complete frame edited in
/// place.
///
/// The last two bytes of `frame` are its old trailer and get replaced, so
/// applying this twice gives the same bytes as once. Use [`seal`] for a body
/// that has no trailer.
pub fn recompute_checksums(frame: &[u8]) -> Result<Frame> {
    if frame.len() < MIN_FRAME_SIZE {
        return Err(FrameError::TooShort {
            needed: MIN_FRAME_SIZE,
            actual: frame.len(),
        });
    }
    seal(&frame[..frame.len() - TRAILER_SIZE])
}

/// Check marker, length field and both checksums of a complete frame.
pub fn verify(frame: &[u8]) -> Result<()> {
    if let Some(&marker) = frame.first() {
        if marker != START_MARKER {
            return Err(FrameError::InvalidMarker(marker));
        }
    }
    if frame.len() < 2 {
        return Err(FrameError::TooShort {
            needed: MIN_FRAME_SIZE,
            actual: frame.len(),
        });
    }

    let declared = frame[LENGTH_OFFSET];
    if (declared as usize) < MIN_FRAME_SIZE {
        return Err(FrameError::InvalidLength(declared));
    }
    if declared as usize != frame.len() {
        return Err(FrameError::LengthMismatch {
            declared: declared as usize,
            actual: frame.len(),
        });
    }

    let header = crc8(&frame[..HEADER_CRC_OFFSET]);
    if header != frame[HEADER_CRC_OFFSET] {
        return Err(FrameError::ChecksumMismatch {
            kind: "header crc8",
            expected: header as u16,
            found: frame[HEADER_CRC_OFFSET] as u16,
        });
    }

    let split = frame.len() - TRAILER_SIZE;
    let trailer = crc16_value(&frame[..split]);
    let found = u16::from_le_bytes([frame[split], frame[split + 1]]);
    if trailer != found {
        return Err(FrameError::ChecksumMismatch {
            kind: "trailer crc16",
            expected: trailer,
            found,
        });
    }

    Ok(())
}

/// Cut one frame out of a stream buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. Checksums are only
/// checked when `verify_checksums` is set.
pub fn decode_frame(src: &mut BytesMut, verify_checksums: bool) -> Result<Option<Frame>> {
    let Some(&marker) = src.first() else {
        return Ok(None);
    };
    if marker != START_MARKER {
        return Err(FrameError::InvalidMarker(marker));
    }
    if src.len() < 2 {
        return Ok(None); // Need the length byte
    }

    let declared = src[LENGTH_OFFSET];
    if (declared as usize) < MIN_FRAME_SIZE {
        return Err(FrameError::InvalidLength(declared));
    }
    if src.len() < declared as usize {
        return Ok(None); // Need more data
    }

    let bytes = src.split_to(declared as usize).freeze();
    if verify_checksums {
        verify(&bytes)?;
    }
    Ok(Some(Frame { bytes }))
}

/// Configuration for reading frames from a stream.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Reject frames whose CRC8 or CRC16 does not match. Default: true.
    pub verify_checksums: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            verify_checksums: true,
        }
    }
}

fn check_field(
    field: &'static str,
    value: &[u8],
    allowed: &[usize],
    expected: &'static str,
) -> Result<()> {
    if allowed.contains(&value.len()) {
        Ok(())
    } else {
        Err(FrameError::InvalidFieldLength {
            field,
            expected,
            actual: value.len(),
        })
    }
}

/// Write length and header CRC for the frame starting at `start`, then append
/// the trailer.
fn write_checksums(dst: &mut BytesMut, start: usize) {
    let size = dst.len() - start + TRAILER_SIZE;
    dst[start + LENGTH_OFFSET] = size as u8;
    dst[start + HEADER_CRC_OFFSET] = crc8(&dst[start..start + HEADER_CRC_OFFSET]);
    let trailer = crc16(&dst[start..]);
    dst.put_slice(&trailer);
}
