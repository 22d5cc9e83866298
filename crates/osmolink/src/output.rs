use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use osmolink_frame::{Frame, HexDump};
use osmolink_proto::{AuthDetail, BroadcastStatus, Message, WifiNetwork, WifiStatus};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Flattened view of a classified notification.
#[derive(Debug, Serialize)]
pub struct MessageOutput {
    pub kind: &'static str,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<AuthDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<BroadcastStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi: Option<WifiStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<WifiNetwork>>,
}

impl From<&Message> for MessageOutput {
    fn from(message: &Message) -> Self {
        let mut out = MessageOutput {
            kind: message.kind(),
            raw: HexDump(&message.raw()[..]).to_string(),
            authenticated: None,
            detail: None,
            broadcast: None,
            bitrate: None,
            temperature: None,
            battery: None,
            wifi: None,
            networks: None,
        };
        match message {
            Message::Auth(event) => {
                out.authenticated = Some(event.authenticated);
                out.detail = event.detail;
            }
            Message::Broadcast(event) => out.broadcast = Some(event.status),
            Message::Statistics(stats) => {
                out.bitrate = stats.bitrate;
                out.temperature = Some(stats.temperature);
                out.battery = Some(stats.battery);
            }
            Message::WifiList(event) => {
                out.wifi = event.status;
                out.networks = Some(event.items.clone());
            }
            Message::Unknown(_) => {}
        }
        out
    }
}

impl MessageOutput {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(authenticated) = self.authenticated {
            parts.push(format!("authenticated={authenticated}"));
        }
        if let Some(detail) = self.detail {
            parts.push(format!("detail={detail:?}"));
        }
        if let Some(status) = self.broadcast {
            parts.push(format!("status={status}"));
        }
        if let Some(bitrate) = self.bitrate {
            parts.push(format!("bitrate={bitrate}"));
        }
        if let Some(temperature) = self.temperature {
            parts.push(format!("temperature={temperature:.1}C"));
        }
        if let Some(battery) = self.battery {
            parts.push(format!("battery={battery}%"));
        }
        if let Some(status) = self.wifi {
            parts.push(format!("wifi={status}"));
        }
        if let Some(networks) = &self.networks {
            let names = networks
                .iter()
                .map(|n| format!("{} ({})", n.ssid, n.band))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("networks=[{names}]"));
        }
        parts.join(" ")
    }
}

pub fn print_messages(messages: &[Message], format: OutputFormat) {
    let outputs: Vec<MessageOutput> = messages.iter().map(MessageOutput::from).collect();
    match format {
        OutputFormat::Json => {
            for out in &outputs {
                println!(
                    "{}",
                    serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "KIND", "DETAILS", "SIZE"]);
            for (index, (out, message)) in outputs.iter().zip(messages).enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    out.kind.to_string(),
                    out.summary(),
                    message.raw().len().to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for out in &outputs {
                println!("{} {}", out.kind, out.summary());
                println!("  {}", out.raw);
            }
        }
        OutputFormat::Raw => {
            for message in messages {
                print_raw(message.raw());
            }
        }
    }
}

#[derive(Serialize)]
struct FrameOutput {
    command: String,
    sequence: String,
    size: usize,
    hex: String,
}

impl From<&Frame> for FrameOutput {
    fn from(frame: &Frame) -> Self {
        FrameOutput {
            command: HexDump(&frame.command()).to_string(),
            sequence: HexDump(&frame.sequence_id()).to_string(),
            size: frame.len(),
            hex: frame.to_string(),
        }
    }
}

/// Print built frames in send order.
pub fn print_frames(frames: &[Frame], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<FrameOutput> = frames.iter().map(FrameOutput::from).collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "SEQUENCE", "SIZE", "FRAME"]);
            for frame in frames.iter().map(FrameOutput::from) {
                table.add_row(vec![
                    frame.command,
                    frame.sequence,
                    frame.size.to_string(),
                    frame.hex,
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for frame in frames {
                println!("{frame}");
            }
        }
        OutputFormat::Raw => {
            for frame in frames {
                print_raw(frame.as_bytes());
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
