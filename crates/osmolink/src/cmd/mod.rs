use clap::{Args, Subcommand};
use std::path::PathBuf;

use osmolink_proto::{FrameRate, Model, Resolution, StabilizationMode};

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod build;
pub mod decode;
pub mod identify;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Identify a camera from advertisement manufacturer data.
    Identify(IdentifyArgs),
    /// Classify captured notification frames.
    Decode(DecodeArgs),
    /// Print an outbound command frame.
    #[command(subcommand)]
    Build(BuildCommand),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Identify(args) => identify::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Build(command) => build::run(command, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Manufacturer data as hex (e.g. "aa08 1400").
    pub data: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frames as hex, one argument per frame.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub frames: Vec<String>,
    /// Read a binary capture of back-to-back frames.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Camera model the frames came from.
    #[arg(long, short = 'm', default_value = "oa4", value_parser = parse_model)]
    pub model: Model,
    /// Accept frames with bad checksums.
    #[arg(long)]
    pub no_verify: bool,
}

#[derive(Subcommand, Debug)]
pub enum BuildCommand {
    /// Pairing request.
    Auth(AuthArgs),
    /// Wi-Fi credentials.
    Wifi(WifiArgs),
    /// Stream settings, stabilization and broadcast start, in send order.
    Livestream(LivestreamArgs),
    /// Broadcast start.
    Start,
    /// Broadcast stop.
    Stop,
    /// Enter broadcast mode.
    Initiate,
}

#[derive(Args, Debug, Default)]
pub struct SequenceArgs {
    /// First sequence id as 2 hex bytes in wire order (e.g. "a894").
    #[arg(long, value_name = "HEX", value_parser = parse_sequence)]
    pub sequence: Option<[u8; 2]>,
}

#[derive(Args, Debug)]
pub struct AuthArgs {
    /// PIN shown on the camera.
    #[arg(long)]
    pub pin: String,
    #[command(flatten)]
    pub sequence: SequenceArgs,
}

#[derive(Args, Debug)]
pub struct WifiArgs {
    #[arg(long)]
    pub ssid: String,
    #[arg(long, env = "OSMOLINK_WIFI_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[command(flatten)]
    pub sequence: SequenceArgs,
}

#[derive(Args, Debug)]
pub struct LivestreamArgs {
    /// JSON settings file.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["url", "bitrate", "resolution", "fps", "auto", "eis"])]
    pub config: Option<PathBuf>,
    /// RTMP ingest URL including the stream key.
    #[arg(long, required_unless_present = "config")]
    pub url: Option<String>,
    /// Bitrate in kbit/s.
    #[arg(long, default_value = "4000")]
    pub bitrate: u16,
    /// Vertical resolution: 480, 720 or 1080.
    #[arg(long, default_value = "1080", value_parser = parse_resolution)]
    pub resolution: Resolution,
    /// Frames per second: 25, 30 or 60.
    #[arg(long, default_value = "30", value_parser = parse_frame_rate)]
    pub fps: FrameRate,
    /// Let the camera adapt quality to the link.
    #[arg(long)]
    pub auto: bool,
    /// Stabilization mode (e.g. off, rocksteady, "RockSteady +").
    #[arg(long, default_value = "off", value_parser = parse_stabilization)]
    pub eis: StabilizationMode,
    #[command(flatten)]
    pub sequence: SequenceArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse hex bytes, ignoring whitespace, `:`/`-` separators and `0x` prefixes.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ':' || c == '-' || c == ',')
        .map(|part| {
            part.strip_prefix("0x")
                .or_else(|| part.strip_prefix("0X"))
                .unwrap_or(part)
        })
        .collect();

    if digits.len() % 2 != 0 {
        return Err(CliError::usage(format!(
            "odd number of hex digits in {input:?}"
        )));
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CliError::usage(format!("invalid hex in {input:?}")))
        })
        .collect()
}

fn parse_sequence(input: &str) -> Result<[u8; 2], String> {
    match parse_hex(input).map_err(|err| err.message)?.as_slice() {
        &[lo, hi] => Ok([lo, hi]),
        other => Err(format!("expected 2 bytes, got {}", other.len())),
    }
}

fn parse_model(input: &str) -> Result<Model, String> {
    input.parse().map_err(|err| format!("{err}"))
}

fn parse_resolution(input: &str) -> Result<Resolution, String> {
    let lines: u16 = input
        .trim_end_matches(['p', 'P'])
        .parse()
        .map_err(|_| format!("not a resolution: {input}"))?;
    Resolution::try_from(lines).map_err(|err| err.to_string())
}

fn parse_frame_rate(input: &str) -> Result<FrameRate, String> {
    let fps: u32 = input
        .parse()
        .map_err(|_| format!("not a frame rate: {input}"))?;
    FrameRate::try_from(fps).map_err(|err| err.to_string())
}

fn parse_stabilization(input: &str) -> Result<StabilizationMode, String> {
    input.parse().map_err(|err: osmolink_proto::ProtocolError| err.to_string())
}
