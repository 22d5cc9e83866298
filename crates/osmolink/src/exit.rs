use std::fmt;
use std::io;

use osmolink_frame::FrameError;
use osmolink_proto::ProtocolError;

// Exit codes follow sysexits where one fits.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 65;
pub const USAGE: i32 = 64;
pub const NO_INPUT: i32 = 66;
pub const PERMISSION_DENIED: i32 = 77;
pub const INTERNAL: i32 = 70;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound => NO_INPUT,
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::InvalidFieldLength { .. } | FrameError::FrameTooLarge { .. } => {
            CliError::usage(format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn protocol_error(context: &str, err: ProtocolError) -> CliError {
    match err {
        ProtocolError::Frame(err) => frame_error(context, err),
        ProtocolError::UnsupportedParameter { .. } | ProtocolError::Settings(_) => {
            CliError::usage(format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_errors_map_to_exit_codes() {
        let err = frame_error(
            "decode",
            FrameError::ChecksumMismatch {
                kind: "trailer crc16",
                expected: 1,
                found: 2,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode: "));

        let err = frame_error(
            "build",
            FrameError::FrameTooLarge {
                size: 300,
                max: 255,
            },
        );
        assert_eq!(err.code, USAGE);

        let err = frame_error(
            "read",
            FrameError::Io(io::Error::new(io::ErrorKind::NotFound, "gone")),
        );
        assert_eq!(err.code, NO_INPUT);
    }

    #[test]
    fn protocol_errors_map_to_exit_codes() {
        let err = protocol_error(
            "build",
            ProtocolError::UnsupportedParameter {
                parameter: "pin",
                value: "abc".to_string(),
            },
        );
        assert_eq!(err.code, USAGE);

        let err = protocol_error(
            "decode",
            ProtocolError::MalformedListEntry {
                index: 0,
                reason: "bad band".to_string(),
            },
        );
        assert_eq!(err.code, DATA_INVALID);

        let err = protocol_error("decode", ProtocolError::Frame(FrameError::InvalidMarker(0)));
        assert_eq!(err.code, DATA_INVALID);
    }
}
