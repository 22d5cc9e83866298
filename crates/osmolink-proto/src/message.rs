use std::fmt;

use bytes::Bytes;
use serde::Serialize;

/// A classified notification.
///
/// Every variant keeps the frame it was decoded from for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Auth(AuthEvent),
    Broadcast(BroadcastEvent),
    Statistics(StatisticsMessage),
    WifiList(WifiListEvent),
    Unknown(UnknownEvent),
}

impl Message {
    /// The frame bytes this message was decoded from.
    pub fn raw(&self) -> &Bytes {
        match self {
            Message::Auth(event) => &event.raw,
            Message::Broadcast(event) => &event.raw,
            Message::Statistics(message) => &message.raw,
            Message::WifiList(event) => &event.raw,
            Message::Unknown(event) => &event.raw,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::Auth(_) => "auth",
            Message::Broadcast(_) => "broadcast",
            Message::Statistics(_) => "statistics",
            Message::WifiList(_) => "wifi_list",
            Message::Unknown(_) => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Message::Unknown(_))
    }
}

/// Pairing outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub raw: Bytes,
    pub authenticated: bool,
    pub detail: Option<AuthDetail>,
}

/// Why a pairing attempt is not (yet) authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthDetail {
    /// The camera shows a PIN and waits for the user to confirm it.
    PendingPinEntry,
    /// The user did not confirm in time.
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastEvent {
    pub raw: Bytes,
    pub status: BroadcastStatus,
}

/// Where the camera is in the livestream setup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastStatus {
    Inactive,
    Preparing,
    ReadyForWifiCredentials,
    ReadyForRtmpCredentials,
    Connecting,
    Live,
}

impl fmt::Display for BroadcastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BroadcastStatus::Inactive => "inactive",
            BroadcastStatus::Preparing => "preparing",
            BroadcastStatus::ReadyForWifiCredentials => "ready for wifi credentials",
            BroadcastStatus::ReadyForRtmpCredentials => "ready for rtmp credentials",
            BroadcastStatus::Connecting => "connecting",
            BroadcastStatus::Live => "live",
        })
    }
}

/// Periodic camera telemetry.
///
/// Carries no receive time or identity: the same frame always decodes to an
/// equal value. Callers that keep a history stamp samples on receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsMessage {
    pub raw: Bytes,
    pub bitrate: Option<u32>,
    /// Whole degrees Celsius.
    pub temperature: f64,
    /// Percent.
    pub battery: u8,
}

/// Wi-Fi connection result or scan list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiListEvent {
    pub raw: Bytes,
    pub status: Option<WifiStatus>,
    pub items: Vec<WifiNetwork>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WifiStatus {
    Connected,
    ConnectionFailed,
}

impl fmt::Display for WifiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WifiStatus::Connected => "connected",
            WifiStatus::ConnectionFailed => "connection failed",
        })
    }
}

/// One network from a scan list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiNetwork {
    pub ssid: String,
    pub band: WifiBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WifiBand {
    #[serde(rename = "2.4ghz")]
    Band2_4GHz,
    #[serde(rename = "5ghz")]
    Band5GHz,
}

impl fmt::Display for WifiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WifiBand::Band2_4GHz => "2.4 GHz",
            WifiBand::Band5GHz => "5 GHz",
        })
    }
}

/// A frame no decision-table row recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEvent {
    pub raw: Bytes,
}
