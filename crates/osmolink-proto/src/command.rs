//! Outbound command constructors.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use osmolink_frame::{build, recompute_checksums, seal, Frame, FrameError, SequenceCounter};

use crate::error::{ProtocolError, Result};
use crate::settings::{LivestreamSettings, StabilizationMode};
use crate::template::*;

/// Builds command frames, stamping each with the next id from a shared
/// [`SequenceCounter`].
///
/// Cloning shares the counter, so clones never hand out the same id twice.
#[derive(Debug, Clone, Default)]
pub struct CommandLibrary {
    sequence: Arc<SequenceCounter>,
}

impl CommandLibrary {
    /// Create a library with a fresh counter starting at `00 00`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library drawing ids from an existing counter.
    pub fn with_sequence(sequence: Arc<SequenceCounter>) -> Self {
        Self { sequence }
    }

    pub fn sequence(&self) -> &Arc<SequenceCounter> {
        &self.sequence
    }

    /// Pairing request carrying the PIN shown on the camera.
    pub fn auth(&self, pin: &str) -> Result<Frame> {
        if pin.is_empty() || !pin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::unsupported("pin", pin));
        }

        let mut payload = BytesMut::with_capacity(2 + PAIRING_TOKEN.len() + pin.len());
        put_prefixed(&mut payload, "pairing token", PAIRING_TOKEN)?;
        put_prefixed(&mut payload, "pin", pin.as_bytes())?;

        let frame = self.frame(&AUTH_COMMAND, &AUTH_SUBTYPE, &payload)?;
        tracing::debug!(sequence = ?frame.sequence_id(), "built auth command");
        Ok(frame)
    }

    /// Credentials for the network the camera should stream over.
    pub fn wifi_credentials(&self, ssid: &str, password: &str) -> Result<Frame> {
        let mut payload = BytesMut::with_capacity(2 + ssid.len() + password.len());
        put_prefixed(&mut payload, "ssid", ssid.as_bytes())?;
        put_prefixed(&mut payload, "password", password.as_bytes())?;

        let frame = self.frame(&AUTH_COMMAND, &WIFI_SUBTYPE, &payload)?;
        tracing::debug!(ssid, sequence = ?frame.sequence_id(), "built wifi credentials command");
        Ok(frame)
    }

    /// RTMP ingest URL and stream quality.
    pub fn stream_settings(&self, settings: &LivestreamSettings) -> Result<Frame> {
        let url = settings.rtmp_url.as_bytes();
        let url_len = u8::try_from(url.len()).map_err(|_| FrameError::InvalidFieldLength {
            field: "rtmp url",
            expected: "at most 255",
            actual: url.len(),
        })?;

        let mut payload = BytesMut::with_capacity(STREAM_SETTINGS_TEMPLATE.len() + url.len());
        payload.extend_from_slice(&STREAM_SETTINGS_TEMPLATE);
        payload[STREAM_RESOLUTION_OFFSET] = settings.resolution.code();
        payload[STREAM_BITRATE_OFFSET..STREAM_BITRATE_OFFSET + 2]
            .copy_from_slice(&settings.bitrate.to_be_bytes());
        payload[STREAM_AUTO_OFFSET] = u8::from(settings.auto);
        payload[STREAM_FPS_OFFSET] = settings.fps.code();
        payload[STREAM_URL_LEN_OFFSET] = url_len;
        payload.extend_from_slice(url);

        let frame = self.frame(&STREAM_COMMAND, &STREAM_SUBTYPE, &payload)?;
        tracing::debug!(
            resolution = settings.resolution.lines(),
            fps = settings.fps.fps(),
            bitrate = settings.bitrate,
            auto = settings.auto,
            "built stream settings command"
        );
        Ok(frame)
    }

    /// Electronic image stabilization mode.
    pub fn stabilization(&self, mode: StabilizationMode) -> Result<Frame> {
        let mut payload = EIS_TEMPLATE;
        payload[EIS_MODE_OFFSET] = mode.code();
        let frame = self.frame(&EIS_COMMAND, &CONFIGURE_SUBTYPE, &payload)?;
        tracing::debug!(%mode, "built stabilization command");
        Ok(frame)
    }

    /// The three frames that configure and start a livestream, in send order.
    ///
    /// Wi-Fi credentials are a separate step; see
    /// [`wifi_credentials`](Self::wifi_credentials).
    pub fn livestream(&self, settings: &LivestreamSettings) -> Result<LivestreamFrames> {
        Ok(LivestreamFrames {
            settings: self.stream_settings(settings)?,
            stabilization: self.stabilization(settings.eis)?,
            confirm: self.start_broadcast()?,
        })
    }

    /// Tell the camera to start streaming once everything is configured.
    ///
    /// Uses the template's fixed sequence id.
    pub fn start_broadcast(&self) -> Result<Frame> {
        Ok(seal(&BROADCAST_STATE_TEMPLATE)?)
    }

    /// Tell the camera to stop streaming.
    pub fn stop_broadcast(&self) -> Result<Frame> {
        let mut frame = self.start_broadcast()?.as_bytes().to_vec();
        frame[STREAM_STATE_OFFSET] = STREAM_STATE_STOP;
        Ok(recompute_checksums(&frame)?)
    }

    /// Put the camera into broadcast mode.
    pub fn initiate_broadcast(&self) -> Result<Frame> {
        Ok(Frame::parse(Bytes::from_static(&INITIATE_BROADCAST_FRAME))?)
    }

    fn frame(&self, command: &[u8; 2], subtype: &[u8], payload: &[u8]) -> Result<Frame> {
        let sequence = self.sequence.next();
        Ok(build(command, &sequence, subtype, payload)?)
    }
}

/// Output of [`CommandLibrary::livestream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivestreamFrames {
    pub settings: Frame,
    pub stabilization: Frame,
    /// Broadcast start, sent last.
    pub confirm: Frame,
}

impl LivestreamFrames {
    /// Frames in send order.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        [&self.settings, &self.stabilization, &self.confirm].into_iter()
    }

    /// All three frames back to back.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.iter().map(Frame::len).sum());
        for frame in self.iter() {
            out.extend_from_slice(frame.as_bytes());
        }
        out.freeze()
    }
}

fn put_prefixed(dst: &mut BytesMut, field: &'static str, value: &[u8]) -> Result<()> {
    let len = u8::try_from(value.len()).map_err(|_| FrameError::InvalidFieldLength {
        field,
        expected: "at most 255",
        actual: value.len(),
    })?;
    dst.extend_from_slice(&[len]);
    dst.extend_from_slice(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use osmolink_frame::{verify, MAX_FRAME_SIZE};

    use super::*;
    use crate::settings::{FrameRate, Resolution};

    fn settings(url: &str) -> LivestreamSettings {
        LivestreamSettings {
            rtmp_url: url.to_string(),
            bitrate: 4000,
            resolution: Resolution::Fhd,
            fps: FrameRate::Fps30,
            auto: false,
            eis: StabilizationMode::Off,
        }
    }

    #[test]
    fn auth_matches_capture() {
        let library = CommandLibrary::new();
        let frame = library.auth("1234").unwrap();

        let expected: [u8; 51] = [
            0x55, 0x33, 0x04, 0xC2, 0x02, 0x07, 0x00, 0x00, 0x40, 0x07, 0x45, 0x20, 0x32, 0x38,
            0x34, 0x61, 0x65, 0x35, 0x62, 0x38, 0x64, 0x37, 0x36, 0x62, 0x33, 0x33, 0x37, 0x35,
            0x61, 0x30, 0x34, 0x61, 0x36, 0x34, 0x31, 0x37, 0x61, 0x64, 0x37, 0x31, 0x62, 0x65,
            0x61, 0x33, 0x04, 0x31, 0x32, 0x33, 0x34, 0x74, 0xBF,
        ];
        assert_eq!(frame.as_bytes(), &expected[..]);
    }

    #[test]
    fn auth_matches_device_capture_at_sequence() {
        let library =
            CommandLibrary::with_sequence(Arc::new(SequenceCounter::starting_at([0xA8, 0x94])));
        let frame = library.auth("8670").unwrap();

        let mut expected = vec![0x55, 0x33, 0x04, 0xC2, 0x02, 0x07, 0xA8, 0x94, 0x40, 0x07, 0x45];
        expected.push(0x20);
        expected.extend_from_slice(PAIRING_TOKEN);
        expected.extend_from_slice(&[0x04, 0x38, 0x36, 0x37, 0x30, 0xB1, 0x88]);
        assert_eq!(frame.as_bytes(), expected.as_slice());
    }

    #[test]
    fn auth_rejects_non_digit_pins() {
        let library = CommandLibrary::new();
        for pin in ["", "12a4", "１２３４", " 1234"] {
            assert!(matches!(
                library.auth(pin),
                Err(ProtocolError::UnsupportedParameter {
                    parameter: "pin",
                    ..
                })
            ));
        }
        // Rejected input does not consume an id.
        assert_eq!(library.sequence().peek(), [0x00, 0x00]);
    }

    #[test]
    fn each_command_takes_the_next_id() {
        let library = CommandLibrary::new();
        let a = library.auth("1111").unwrap();
        let b = library.wifi_credentials("net", "pw").unwrap();
        let c = library.stabilization(StabilizationMode::RockSteady).unwrap();
        assert_eq!(a.sequence_id(), [0x00, 0x00]);
        assert_eq!(b.sequence_id(), [0x01, 0x00]);
        assert_eq!(c.sequence_id(), [0x02, 0x00]);
    }

    #[test]
    fn clones_share_the_counter() {
        let library = CommandLibrary::new();
        let clone = library.clone();
        library.auth("1").unwrap();
        assert_eq!(clone.auth("1").unwrap().sequence_id(), [0x01, 0x00]);
    }

    #[test]
    fn wifi_credentials_layout() {
        let library = CommandLibrary::new();
        let frame = library.wifi_credentials("home", "secret").unwrap();
        verify(frame.as_bytes()).unwrap();

        let bytes = frame.as_bytes();
        assert_eq!(bytes[4..6], AUTH_COMMAND);
        assert_eq!(bytes[8..11], WIFI_SUBTYPE);
        assert_eq!(&bytes[11..bytes.len() - 2], b"\x04home\x06secret");
    }

    #[test]
    fn wifi_credentials_allow_empty_password() {
        let frame = CommandLibrary::new().wifi_credentials("open", "").unwrap();
        let bytes = frame.as_bytes();
        assert_eq!(&bytes[11..bytes.len() - 2], b"\x04open\x00");
    }

    #[test]
    fn wifi_credentials_reject_long_fields() {
        let library = CommandLibrary::new();
        let long = "x".repeat(256);
        assert!(matches!(
            library.wifi_credentials(&long, "pw"),
            Err(ProtocolError::Frame(FrameError::InvalidFieldLength {
                field: "ssid",
                actual: 256,
                ..
            }))
        ));
        assert!(matches!(
            library.wifi_credentials("net", &long),
            Err(ProtocolError::Frame(FrameError::InvalidFieldLength {
                field: "password",
                ..
            }))
        ));
    }

    #[test]
    fn stream_settings_layout() {
        let library = CommandLibrary::new();
        let url = "rtmp://live.example.com/app/streamkey012";
        assert_eq!(url.len(), 40);

        let mut config = settings(url);
        config.bitrate = 0x1770;
        config.fps = FrameRate::Fps60;
        config.resolution = Resolution::Sd;
        config.auto = true;
        let frame = library.stream_settings(&config).unwrap();
        verify(frame.as_bytes()).unwrap();

        let bytes = frame.as_bytes();
        assert_eq!(bytes[4..6], STREAM_COMMAND);
        assert_eq!(bytes[8..12], STREAM_SUBTYPE);

        let payload = &bytes[12..bytes.len() - 2];
        assert_eq!(
            payload[..13],
            [0x27, 0x00, 0x47, 0xA0, 0x17, 0x70, 0x01, 0x06, 0x00, 0x00, 0x00, 0x28, 0x00]
        );
        assert_eq!(&payload[13..], url.as_bytes());
    }

    #[test]
    fn stream_settings_length_byte_tracks_url() {
        let library = CommandLibrary::new();
        let url = "rtmp://live.example.com/app/streamkey0123";
        assert_eq!(url.len(), 41);

        let frame = library.stream_settings(&settings(url)).unwrap();
        let bytes = frame.as_bytes();
        let payload = &bytes[12..bytes.len() - 2];
        assert_eq!(payload[11..13], [0x29, 0x00]);
        assert_eq!(&payload[13..], url.as_bytes());
    }

    #[test]
    fn stream_settings_codes() {
        let library = CommandLibrary::new();
        for (fps, code) in [
            (FrameRate::Fps25, 0x02),
            (FrameRate::Fps30, 0x03),
            (FrameRate::Fps60, 0x06),
        ] {
            let mut config = settings("rtmp://x");
            config.fps = fps;
            let frame = library.stream_settings(&config).unwrap();
            assert_eq!(frame.as_bytes()[12 + STREAM_FPS_OFFSET], code);
        }
        for (resolution, code) in [
            (Resolution::Sd, 0x47),
            (Resolution::Hd, 0x04),
            (Resolution::Fhd, 0x0A),
        ] {
            let mut config = settings("rtmp://x");
            config.resolution = resolution;
            let frame = library.stream_settings(&config).unwrap();
            assert_eq!(frame.as_bytes()[12 + STREAM_RESOLUTION_OFFSET], code);
        }
    }

    #[test]
    fn stream_settings_url_limits() {
        let library = CommandLibrary::new();

        let err = library
            .stream_settings(&settings(&"u".repeat(256)))
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Frame(FrameError::InvalidFieldLength {
                field: "rtmp url",
                ..
            })
        ));

        // Fits the length byte but not the frame.
        let err = library
            .stream_settings(&settings(&"u".repeat(250)))
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Frame(FrameError::FrameTooLarge {
                max: MAX_FRAME_SIZE,
                ..
            })
        ));
    }

    #[test]
    fn stabilization_codes() {
        let library = CommandLibrary::new();
        for (mode, code) in [
            (StabilizationMode::Off, 0x00u8),
            (StabilizationMode::RockSteady, 0x01),
            (StabilizationMode::HorizonSteady, 0x02),
            (StabilizationMode::RockSteadyPlus, 0x03),
            (StabilizationMode::HorizonBalancing, 0x04),
        ] {
            let frame = library.stabilization(mode).unwrap();
            let bytes = frame.as_bytes();
            assert_eq!(bytes[4..6], EIS_COMMAND);
            assert_eq!(bytes[8..11], CONFIGURE_SUBTYPE);
            assert_eq!(
                bytes[11..19],
                [0x01, 0x01, 0x08, 0x00, 0x01, code, 0xF0, 0x72]
            );
        }
    }

    #[test]
    fn livestream_frames_in_order() {
        let library = CommandLibrary::new();
        let mut config = settings("rtmp://live.example.com/app/key");
        config.eis = StabilizationMode::RockSteadyPlus;
        let frames = library.livestream(&config).unwrap();

        let commands: Vec<[u8; 2]> = frames.iter().map(Frame::command).collect();
        assert_eq!(commands, vec![STREAM_COMMAND, EIS_COMMAND, STREAM_COMMAND]);
        assert_eq!(frames.stabilization.as_bytes()[11 + EIS_MODE_OFFSET], 0x03);
        assert_eq!(frames.confirm, library.start_broadcast().unwrap());

        let total: usize = frames.iter().map(Frame::len).sum();
        let joined = frames.to_bytes();
        assert_eq!(joined.len(), total);
        assert!(joined.starts_with(frames.settings.as_bytes()));
        assert!(joined.ends_with(frames.confirm.as_bytes()));
    }

    #[test]
    fn start_broadcast_matches_capture() {
        let frame = CommandLibrary::new().start_broadcast().unwrap();
        verify(frame.as_bytes()).unwrap();
        assert_eq!(frame.len(), BROADCAST_STATE_TEMPLATE.len() + 2);
        assert_eq!(frame.as_bytes()[..17], BROADCAST_STATE_TEMPLATE);
        assert_eq!(frame.as_bytes()[17..], [0x68, 0x6D]);
    }

    #[test]
    fn stop_broadcast_flips_state() {
        let frame = CommandLibrary::new().stop_broadcast().unwrap();
        verify(frame.as_bytes()).unwrap();

        let bytes = frame.as_bytes();
        assert_eq!(bytes[STREAM_STATE_OFFSET], STREAM_STATE_STOP);
        assert_eq!(bytes[..STREAM_STATE_OFFSET], BROADCAST_STATE_TEMPLATE[..STREAM_STATE_OFFSET]);
        assert_eq!(bytes[17..], [0xF3, 0x5F]);
    }

    #[test]
    fn broadcast_frames_do_not_consume_ids() {
        let library = CommandLibrary::new();
        library.start_broadcast().unwrap();
        library.stop_broadcast().unwrap();
        library.initiate_broadcast().unwrap();
        assert_eq!(library.sequence().peek(), [0x00, 0x00]);
    }

    #[test]
    fn initiate_broadcast_is_fixed() {
        let frame = CommandLibrary::new().initiate_broadcast().unwrap();
        assert_eq!(frame.as_bytes(), &INITIATE_BROADCAST_FRAME[..]);
        assert_eq!(frame.sequence_id(), [0x12, 0x8C]);
    }
}
