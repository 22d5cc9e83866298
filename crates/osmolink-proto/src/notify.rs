//! Notification classification.
//!
//! Inbound frames are routed by a decision table keyed on the category at
//! frame offsets 4..6, the subcategory at 9..11 and an outcome code whose
//! position depends on the row. The first row whose key and outcome match
//! decides the message; frames no row accepts become [`Message::Unknown`].

use bytes::Bytes;

use crate::error::{ProtocolError, Result};
use crate::message::{
    AuthDetail, AuthEvent, BroadcastEvent, BroadcastStatus, Message, StatisticsMessage,
    UnknownEvent, WifiListEvent, WifiStatus,
};
use crate::model::Model;
use crate::wifi::parse_wifi_list;

/// Camera status telemetry.
pub const STATISTICS: [u8; 2] = [0x05, 0x02];
/// Pairing and Wi-Fi provisioning responses.
pub const AUTHORIZATION: [u8; 2] = [0x07, 0x02];
/// Livestream setup responses.
pub const BROADCAST: [u8; 2] = [0x08, 0x02];

/// Pairing request result.
pub const PAIRING: [u8; 2] = [0x07, 0x45];
/// Pairing approved or rejected on the camera.
pub const PAIRING_APPROVAL: [u8; 2] = [0x07, 0x46];
/// Result of joining the Wi-Fi network.
pub const WIFI_CONNECT: [u8; 2] = [0x07, 0x47];
/// Wi-Fi scan list.
pub const WIFI_SCAN: [u8; 2] = [0x07, 0xAC];
/// Broadcast mode enabled.
pub const BROADCAST_ENABLED: [u8; 2] = [0x02, 0xE1];
/// Broadcast setup progress.
pub const BROADCAST_PROGRESS: [u8; 2] = [0xEE, 0x03];

/// Shortest frame that carries a category.
pub const MIN_CLASSIFIABLE_LEN: usize = 6;

const CATEGORY_OFFSET: usize = 4;
const SUBCATEGORY_OFFSET: usize = 9;
const OUTCOME_OFFSET: usize = 11;

/// Statistics fields.
const STATS_BITRATE_OFFSET: usize = 12;
const STATS_TEMPERATURE_OFFSET: usize = 28;
const STATS_BATTERY_OFFSET: usize = 31;

/// What a matching row produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Statistics,
    Auth {
        authenticated: bool,
        detail: Option<AuthDetail>,
    },
    WifiStatus(WifiStatus),
    WifiList,
    Broadcast(BroadcastStatus),
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub category: [u8; 2],
    /// `None` matches any subcategory.
    pub subcategory: Option<[u8; 2]>,
    /// Frame offset of the outcome code.
    pub outcome_offset: usize,
    /// Expected outcome bytes; empty matches anything.
    pub outcome: &'static [u8],
    pub action: Action,
}

impl Route {
    const fn any(category: [u8; 2], subcategory: Option<[u8; 2]>, action: Action) -> Self {
        Self {
            category,
            subcategory,
            outcome_offset: OUTCOME_OFFSET,
            outcome: &[],
            action,
        }
    }

    const fn on(
        category: [u8; 2],
        subcategory: [u8; 2],
        outcome_offset: usize,
        outcome: &'static [u8],
        action: Action,
    ) -> Self {
        Self {
            category,
            subcategory: Some(subcategory),
            outcome_offset,
            outcome,
            action,
        }
    }

    /// Category and subcategory match.
    pub fn matches_key(&self, frame: &[u8]) -> bool {
        if field(frame, CATEGORY_OFFSET) != Some(self.category) {
            return false;
        }
        match self.subcategory {
            Some(subcategory) => field(frame, SUBCATEGORY_OFFSET) == Some(subcategory),
            None => true,
        }
    }

    /// Outcome bytes match. Frames too short to hold them never match.
    pub fn matches_outcome(&self, frame: &[u8]) -> bool {
        let end = self.outcome_offset + self.outcome.len();
        frame.get(self.outcome_offset..end) == Some(self.outcome)
    }
}

const fn auth(authenticated: bool, detail: Option<AuthDetail>) -> Action {
    Action::Auth {
        authenticated,
        detail,
    }
}

/// The classification table, checked top to bottom.
pub static ROUTES: &[Route] = &[
    Route::any(STATISTICS, None, Action::Statistics),
    // Pairing request: already paired, PIN shown on camera, PIN confirmed.
    Route::on(AUTHORIZATION, PAIRING, OUTCOME_OFFSET, &[0x00, 0x01], auth(true, None)),
    Route::on(
        AUTHORIZATION,
        PAIRING,
        OUTCOME_OFFSET,
        &[0x00, 0x02],
        auth(false, Some(AuthDetail::PendingPinEntry)),
    ),
    Route::on(AUTHORIZATION, PAIRING, OUTCOME_OFFSET, &[0x01, 0x10], auth(true, None)),
    Route::on(AUTHORIZATION, PAIRING_APPROVAL, OUTCOME_OFFSET, &[0x01], auth(true, None)),
    Route::on(AUTHORIZATION, PAIRING_APPROVAL, OUTCOME_OFFSET, &[0x00], auth(false, None)),
    Route::on(
        AUTHORIZATION,
        PAIRING_APPROVAL,
        OUTCOME_OFFSET,
        &[0x02],
        auth(false, Some(AuthDetail::Timeout)),
    ),
    Route::on(
        AUTHORIZATION,
        WIFI_CONNECT,
        OUTCOME_OFFSET,
        &[0x00],
        Action::WifiStatus(WifiStatus::Connected),
    ),
    Route::on(
        AUTHORIZATION,
        WIFI_CONNECT,
        OUTCOME_OFFSET,
        &[0x01],
        Action::WifiStatus(WifiStatus::ConnectionFailed),
    ),
    Route::any(AUTHORIZATION, Some(WIFI_SCAN), Action::WifiList),
    Route::any(
        BROADCAST,
        Some(BROADCAST_ENABLED),
        Action::Broadcast(BroadcastStatus::Preparing),
    ),
    Route::on(
        BROADCAST,
        BROADCAST_PROGRESS,
        12,
        &[0x09],
        Action::Broadcast(BroadcastStatus::ReadyForWifiCredentials),
    ),
];

/// Classify a notification frame.
///
/// Unrecognized frames, including ones too short for the fields their row
/// needs, become [`Message::Unknown`]. The only error is a scan list that
/// fails to decode.
pub fn classify(frame: &[u8], model: Model) -> Result<Message> {
    let raw = Bytes::copy_from_slice(frame);
    if frame.len() < MIN_CLASSIFIABLE_LEN {
        return Ok(unknown(raw));
    }

    let mut key_matched = false;
    for route in ROUTES {
        if !route.matches_key(frame) {
            continue;
        }
        key_matched = true;
        if !route.matches_outcome(frame) {
            continue;
        }

        return match apply(route.action, raw.clone(), model) {
            Err(ProtocolError::ParseUnderflow { needed, actual }) => {
                tracing::debug!(needed, actual, action = ?route.action, "frame too short for row");
                Ok(unknown(raw))
            }
            result => result,
        };
    }

    if key_matched {
        tracing::warn!(
            category = ?field(frame, CATEGORY_OFFSET),
            subcategory = ?field(frame, SUBCATEGORY_OFFSET),
            outcome = ?frame.get(OUTCOME_OFFSET..(OUTCOME_OFFSET + 2).min(frame.len())),
            "unrecognized outcome code"
        );
    }
    Ok(unknown(raw))
}

fn apply(action: Action, raw: Bytes, model: Model) -> Result<Message> {
    let message = match action {
        Action::Statistics => Message::Statistics(decode_statistics(raw)?),
        Action::Auth {
            authenticated,
            detail,
        } => Message::Auth(AuthEvent {
            raw,
            authenticated,
            detail,
        }),
        Action::WifiStatus(status) => Message::WifiList(WifiListEvent {
            raw,
            status: Some(status),
            items: Vec::new(),
        }),
        Action::WifiList => Message::WifiList(parse_wifi_list(&raw, model)?),
        Action::Broadcast(status) => Message::Broadcast(BroadcastEvent { raw, status }),
    };
    Ok(message)
}

fn decode_statistics(raw: Bytes) -> Result<StatisticsMessage> {
    let needed = STATS_BATTERY_OFFSET + 1;
    if raw.len() < needed {
        return Err(ProtocolError::ParseUnderflow {
            needed,
            actual: raw.len(),
        });
    }

    let bitrate = scaled_word(raw[STATS_BITRATE_OFFSET], raw[STATS_BITRATE_OFFSET + 1]);
    let temperature = scaled_word(raw[STATS_TEMPERATURE_OFFSET], raw[STATS_TEMPERATURE_OFFSET + 1]);
    let battery = raw[STATS_BATTERY_OFFSET];

    Ok(StatisticsMessage {
        raw,
        bitrate: Some(bitrate),
        // Integer division: the tenths digit is dropped.
        temperature: f64::from(temperature / 10),
        battery,
    })
}

/// Two-byte little-endian value with a high-byte weight of 255, not 256.
///
/// Matches how existing clients decode these fields; it may be an analysis
/// error, but changing it needs a capture with a known reading.
pub fn scaled_word(low: u8, high: u8) -> u32 {
    u32::from(low) + u32::from(high) * 255
}

fn field(frame: &[u8], offset: usize) -> Option<[u8; 2]> {
    match frame.get(offset..offset + 2) {
        Some(&[a, b]) => Some([a, b]),
        _ => None,
    }
}

fn unknown(raw: Bytes) -> Message {
    Message::Unknown(UnknownEvent { raw })
}
