//! Command codes, subtypes and pre-baked payload templates.
//!
//! Offsets in the layouts below are relative to the payload unless they say
//! "frame offset".

/// Pairing and Wi-Fi provisioning commands.
pub const AUTH_COMMAND: [u8; 2] = [0x02, 0x07];

/// Pairing request. Payload: `<len> <token> <len> <pin>`.
pub const AUTH_SUBTYPE: [u8; 3] = [0x40, 0x07, 0x45];

/// Provisioning token sent ahead of the PIN, 32 ASCII characters.
pub const PAIRING_TOKEN: &[u8; 32] = b"284ae5b8d76b3375a04a6417ad71bea3";

/// Wi-Fi credentials. Payload: `<len> <ssid> <len> <password>`.
pub const WIFI_SUBTYPE: [u8; 3] = [0x40, 0x07, 0x47];

/// Livestream configuration commands.
pub const STREAM_COMMAND: [u8; 2] = [0x02, 0x08];

/// RTMP stream settings.
pub const STREAM_SUBTYPE: [u8; 4] = [0x40, 0x08, 0x78, 0x00];

/// Stream settings payload before the RTMP URL.
///
/// ```text
///  0    1    2     3    4    5    6     7    8    9    10   11       12   13..
/// ┌────┬────┬─────┬────┬─────────┬──────┬─────┬──────────────┬────────┬────┬─────┐
/// │ 27 │ 00 │ res │ A0 │ bitrate │ auto │ fps │ 00 00 00     │ urllen │ 00 │ url │
/// │    │    │     │    │ (2B BE) │ 0|1  │     │              │        │    │     │
/// └────┴────┴─────┴────┴─────────┴──────┴─────┴──────────────┴────────┴────┴─────┘
/// ```
pub const STREAM_SETTINGS_TEMPLATE: [u8; 13] = [
    0x27, 0x00, 0x04, 0xA0, 0x0F, 0x02, 0x01, 0x03, 0x00, 0x00, 0x00, 0x1C, 0x00,
];
pub const STREAM_RESOLUTION_OFFSET: usize = 2;
pub const STREAM_BITRATE_OFFSET: usize = 4;
pub const STREAM_AUTO_OFFSET: usize = 6;
pub const STREAM_FPS_OFFSET: usize = 7;
pub const STREAM_URL_LEN_OFFSET: usize = 11;

/// Electronic image stabilization command.
pub const EIS_COMMAND: [u8; 2] = [0x02, 0x01];

/// Shared by the EIS command and the broadcast state command.
pub const CONFIGURE_SUBTYPE: [u8; 3] = [0x40, 0x02, 0x8E];

/// EIS payload; the mode code sits at [`EIS_MODE_OFFSET`].
pub const EIS_TEMPLATE: [u8; 8] = [0x01, 0x01, 0x08, 0x00, 0x01, 0x02, 0xF0, 0x72];
pub const EIS_MODE_OFFSET: usize = 5;

/// Broadcast state command, unsealed (no trailer).
///
/// Confirms that Wi-Fi, RTMP and EIS settings are in place; the camera only
/// starts streaming after it. Sequence id `6A C0` is part of the template.
///
/// ```text
/// frame offset  11   12   13   14   15   16
///             ┌────┬────┬────┬────┬────┬───────┐
///             │ 01 │ 01 │ 1A │ 00 │ 01 │ state │   state: 01 start, 02 stop
///             └────┴────┴────┴────┴────┴───────┘
/// ```
///
/// Offsets 11..15 must keep these values for the stream to start.
pub const BROADCAST_STATE_TEMPLATE: [u8; 17] = [
    0x55, 0x13, 0x04, 0x03, 0x02, 0x08, 0x6A, 0xC0, 0x40, 0x02, 0x8E, 0x01, 0x01, 0x1A, 0x00,
    0x01, 0x01,
];
/// Frame offset of the stream state byte.
pub const STREAM_STATE_OFFSET: usize = 16;
pub const STREAM_STATE_START: u8 = 0x01;
pub const STREAM_STATE_STOP: u8 = 0x02;

/// Puts the camera into broadcast mode, complete frame.
///
/// Command `02 08`, sequence id `12 8C`, subtype `40 02 E1`, payload `1A`.
pub const INITIATE_BROADCAST_FRAME: [u8; 14] = [
    0x55, 0x0E, 0x04, 0x66, 0x02, 0x08, 0x12, 0x8C, 0x40, 0x02, 0xE1, 0x1A, 0x11, 0xDF,
];

#[cfg(test)]
mod tests {
    use osmolink_frame::{verify, START_MARKER};

    use super::*;

    #[test]
    fn initiate_frame_is_valid() {
        verify(&INITIATE_BROADCAST_FRAME).unwrap();
    }

    #[test]
    fn broadcast_template_has_no_trailer() {
        assert_eq!(BROADCAST_STATE_TEMPLATE[0], START_MARKER);
        assert_ne!(
            BROADCAST_STATE_TEMPLATE[1] as usize,
            BROADCAST_STATE_TEMPLATE.len()
        );
        assert_eq!(BROADCAST_STATE_TEMPLATE[4..6], STREAM_COMMAND);
        assert_eq!(BROADCAST_STATE_TEMPLATE[8..11], CONFIGURE_SUBTYPE);
        assert_eq!(
            BROADCAST_STATE_TEMPLATE[STREAM_STATE_OFFSET],
            STREAM_STATE_START
        );
    }

    #[test]
    fn pairing_token_is_ascii_hex() {
        assert!(PAIRING_TOKEN.iter().all(|b| b.is_ascii_hexdigit()));
    }
}
