use std::fs::File;
use std::path::Path;

use osmolink_frame::{verify, FrameConfig, FrameReader};
use osmolink_proto::{classify, Message};

use crate::cmd::{parse_hex, DecodeArgs};
use crate::exit::{frame_error, io_error, protocol_error, CliResult, SUCCESS};
use crate::output::{print_messages, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = FrameConfig {
        verify_checksums: !args.no_verify,
    };
    let frames = match &args.file {
        Some(path) => read_capture(path, config)?,
        None => args
            .frames
            .iter()
            .enumerate()
            .map(|(index, hex)| parse_frame(index, hex, &config))
            .collect::<CliResult<Vec<_>>>()?,
    };
    tracing::debug!(frames = frames.len(), model = %args.model, "decoding");

    let messages = frames
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            classify(frame, args.model)
                .map_err(|err| protocol_error(&format!("frame {index}"), err))
        })
        .collect::<CliResult<Vec<Message>>>()?;

    let unknown = messages.iter().filter(|m| m.is_unknown()).count();
    if unknown > 0 {
        tracing::info!(unknown, total = messages.len(), "some frames were not recognized");
    }

    print_messages(&messages, format);
    Ok(SUCCESS)
}

fn parse_frame(index: usize, hex: &str, config: &FrameConfig) -> CliResult<Vec<u8>> {
    let bytes = parse_hex(hex)?;
    if config.verify_checksums {
        verify(&bytes).map_err(|err| frame_error(&format!("frame {index}"), err))?;
    }
    Ok(bytes)
}

fn read_capture(path: &Path, config: FrameConfig) -> CliResult<Vec<Vec<u8>>> {
    let file = File::open(path)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
    let frames = FrameReader::with_config(file, config)
        .read_all()
        .map_err(|err| frame_error(&format!("failed reading {}", path.display()), err))?;
    Ok(frames.iter().map(|frame| frame.as_bytes().to_vec()).collect())
}
