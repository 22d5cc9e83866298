use std::fs;
use std::sync::Arc;

use osmolink_frame::{Frame, SequenceCounter};
use osmolink_proto::{CommandLibrary, LivestreamSettings, ProtocolError};

use crate::cmd::{BuildCommand, LivestreamArgs, SequenceArgs};
use crate::exit::{io_error, protocol_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frames, OutputFormat};

pub fn run(command: BuildCommand, format: OutputFormat) -> CliResult<i32> {
    let frames = build_frames(command)?;
    print_frames(&frames, format);
    Ok(SUCCESS)
}

fn build_frames(command: BuildCommand) -> CliResult<Vec<Frame>> {
    let frames = match command {
        BuildCommand::Auth(args) => vec![library(&args.sequence).auth(&args.pin).map_err(failed)?],
        BuildCommand::Wifi(args) => vec![library(&args.sequence)
            .wifi_credentials(&args.ssid, &args.password)
            .map_err(failed)?],
        BuildCommand::Livestream(args) => {
            let settings = livestream_settings(&args)?;
            library(&args.sequence)
                .livestream(&settings)
                .map_err(failed)?
                .iter()
                .cloned()
                .collect()
        }
        BuildCommand::Start => vec![CommandLibrary::new().start_broadcast().map_err(failed)?],
        BuildCommand::Stop => vec![CommandLibrary::new().stop_broadcast().map_err(failed)?],
        BuildCommand::Initiate => vec![CommandLibrary::new()
            .initiate_broadcast()
            .map_err(failed)?],
    };
    Ok(frames)
}

fn failed(err: ProtocolError) -> CliError {
    protocol_error("build failed", err)
}

fn library(args: &SequenceArgs) -> CommandLibrary {
    match args.sequence {
        Some(id) => CommandLibrary::with_sequence(Arc::new(SequenceCounter::starting_at(id))),
        None => CommandLibrary::new(),
    }
}

fn livestream_settings(args: &LivestreamArgs) -> CliResult<LivestreamSettings> {
    if let Some(path) = &args.config {
        let json = fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return LivestreamSettings::from_json(&json)
            .map_err(|err| protocol_error(&format!("invalid settings in {}", path.display()), err));
    }

    let Some(url) = &args.url else {
        return Err(CliError::usage("--url or --config is required"));
    };
    Ok(LivestreamSettings {
        rtmp_url: url.clone(),
        bitrate: args.bitrate,
        resolution: args.resolution,
        fps: args.fps,
        auto: args.auto,
        eis: args.eis,
    })
}
