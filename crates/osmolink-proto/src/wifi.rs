//! Wi-Fi scan list decoding (`07 02` / `07 AC` notifications).
//!
//! Entries follow frame offset [`LIST_CURSOR`] back to back until the trailer.
//! Each entry starts with its own length byte, which counts itself:
//!
//! ```text
//!  0     1..4   4      5    6..len
//! ┌─────┬──────┬──────┬────┬──────────────┐
//! │ len │ ???  │ band │ ?? │ SSID (UTF-8) │   band: 00 2.4 GHz, 01 5 GHz
//! └─────┴──────┴──────┴────┴──────────────┘
//! ```

use bytes::Bytes;
use osmolink_frame::{FrameError, START_MARKER, TRAILER_SIZE};

use crate::error::{ProtocolError, Result};
use crate::message::{WifiBand, WifiListEvent, WifiNetwork};
use crate::model::Model;
use crate::notify::AUTHORIZATION;

/// Last header byte before the first entry.
pub const LIST_CURSOR: usize = 14;

const ENTRY_BAND_OFFSET: usize = 4;
const ENTRY_SSID_OFFSET: usize = 6;

/// Decode a scan list notification.
///
/// The Osmo Action 5 Pro uses a different list layout that has not been
/// worked out yet; its lists decode as empty.
///
/// Any undecodable entry rejects the whole list.
pub fn parse_wifi_list(frame: &[u8], model: Model) -> Result<WifiListEvent> {
    if frame.len() < 6 {
        return Err(ProtocolError::ParseUnderflow {
            needed: 6,
            actual: frame.len(),
        });
    }
    if frame[0] != START_MARKER {
        return Err(FrameError::InvalidMarker(frame[0]).into());
    }
    let category = [frame[4], frame[5]];
    if category != AUTHORIZATION {
        return Err(ProtocolError::UnexpectedCategory {
            expected: AUTHORIZATION,
            found: category,
        });
    }

    let raw = Bytes::copy_from_slice(frame);
    if model == Model::OsmoAction5Pro {
        tracing::debug!(%model, "scan list layout not decoded for this model");
        return Ok(WifiListEvent {
            raw,
            status: None,
            items: Vec::new(),
        });
    }

    let end = frame.len().saturating_sub(TRAILER_SIZE);
    let mut items = Vec::new();
    let mut pos = LIST_CURSOR + 1;
    while pos < end {
        let len = frame[pos] as usize;
        let index = items.len();
        if len < ENTRY_SSID_OFFSET {
            return Err(malformed(index, format!("entry length {len} below {ENTRY_SSID_OFFSET}")));
        }
        if pos + len > end {
            return Err(malformed(
                index,
                format!("entry of {len} bytes at offset {pos} runs into the trailer"),
            ));
        }

        items.push(parse_entry(index, &frame[pos..pos + len])?);
        pos += len;
    }

    tracing::debug!(networks = items.len(), "decoded wifi scan list");
    Ok(WifiListEvent {
        raw,
        status: None,
        items,
    })
}

fn parse_entry(index: usize, entry: &[u8]) -> Result<WifiNetwork> {
    let band = match entry[ENTRY_BAND_OFFSET] {
        0x00 => WifiBand::Band2_4GHz,
        0x01 => WifiBand::Band5GHz,
        other => return Err(malformed(index, format!("unknown band code 0x{other:02X}"))),
    };

    let ssid = std::str::from_utf8(&entry[ENTRY_SSID_OFFSET..])
        .map_err(|err| malformed(index, format!("ssid is not utf-8: {err}")))?;

    Ok(WifiNetwork {
        ssid: ssid.to_string(),
        band,
    })
}

fn malformed(index: usize, reason: String) -> ProtocolError {
    ProtocolError::MalformedListEntry { index, reason }
}
