//! Device identification from advertisement manufacturer data.
//!
//! Advertisements carry vendor-specific bytes: a 2-byte vendor identifier
//! followed by a 2-byte model code. Anything else is not ours and is ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Vendor identifier at manufacturer data offsets 0..2.
pub const VENDOR_ID: [u8; 2] = [0xAA, 0x08];

/// GATT characteristic commands are written to.
pub const COMMAND_CHARACTERISTIC_UUID: u16 = 0xFFF4;

/// GATT characteristic notifications arrive on.
pub const NOTIFY_CHARACTERISTIC_UUID: u16 = 0xFFF5;

/// Supported camera models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    OsmoAction3,
    OsmoAction4,
    OsmoAction5Pro,
    OsmoPocket3,
}

impl Model {
    pub const ALL: [Model; 4] = [
        Model::OsmoAction3,
        Model::OsmoAction4,
        Model::OsmoAction5Pro,
        Model::OsmoPocket3,
    ];

    /// Model code at manufacturer data offsets 2..4.
    pub const fn manufacturer_code(self) -> [u8; 2] {
        match self {
            Model::OsmoAction3 => [0x12, 0x00],
            Model::OsmoAction4 => [0x14, 0x00],
            Model::OsmoAction5Pro => [0x15, 0x00],
            Model::OsmoPocket3 => [0x20, 0x00],
        }
    }

    /// Short name used on the command line.
    pub const fn short_name(self) -> &'static str {
        match self {
            Model::OsmoAction3 => "oa3",
            Model::OsmoAction4 => "oa4",
            Model::OsmoAction5Pro => "oa5pro",
            Model::OsmoPocket3 => "op3",
        }
    }

    /// Marketing name.
    pub const fn name(self) -> &'static str {
        match self {
            Model::OsmoAction3 => "Osmo Action 3",
            Model::OsmoAction4 => "Osmo Action 4",
            Model::OsmoAction5Pro => "Osmo Action 5 Pro",
            Model::OsmoPocket3 => "Osmo Pocket 3",
        }
    }

    /// Look up a model by its manufacturer code.
    pub fn from_manufacturer_code(code: [u8; 2]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|model| model.manufacturer_code() == code)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Model {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|model| {
                model.short_name() == wanted
                    || model.name().to_ascii_lowercase() == wanted
                    || serde_name(*model) == wanted
            })
            .ok_or_else(|| ProtocolError::unsupported("model", s))
    }
}

fn serde_name(model: Model) -> &'static str {
    match model {
        Model::OsmoAction3 => "osmo_action3",
        Model::OsmoAction4 => "osmo_action4",
        Model::OsmoAction5Pro => "osmo_action5_pro",
        Model::OsmoPocket3 => "osmo_pocket3",
    }
}

/// Identify the camera model from advertisement manufacturer data.
///
/// Returns `None` for data shorter than 4 bytes, a foreign vendor id or an
/// unknown model code.
pub fn identify(manufacturer_data: &[u8]) -> Option<Model> {
    if manufacturer_data.len() < 4 {
        tracing::debug!(len = manufacturer_data.len(), "manufacturer data too short");
        return None;
    }

    if manufacturer_data[0..2] != VENDOR_ID {
        tracing::debug!(vendor = ?&manufacturer_data[0..2], "foreign vendor id");
        return None;
    }

    let code = [manufacturer_data[2], manufacturer_data[3]];
    let model = Model::from_manufacturer_code(code);
    if model.is_none() {
        tracing::debug!(code = ?code, "unknown model code");
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifies_known_models() {
        assert_eq!(identify(&[0xAA, 0x08, 0x12, 0x00]), Some(Model::OsmoAction3));
        assert_eq!(identify(&[0xAA, 0x08, 0x14, 0x00]), Some(Model::OsmoAction4));
        assert_eq!(identify(&[0xAA, 0x08, 0x15, 0x00]), Some(Model::OsmoAction5Pro));
        assert_eq!(identify(&[0xAA, 0x08, 0x20, 0x00]), Some(Model::OsmoPocket3));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        assert_eq!(
            identify(&[0xAA, 0x08, 0x14, 0x00, 0xDE, 0xAD, 0xBE, 0xEF]),
            Some(Model::OsmoAction4)
        );
    }

    #[test]
    fn short_data_is_not_identified() {
        assert_eq!(identify(&[]), None);
        assert_eq!(identify(&[0xFF]), None);
        assert_eq!(identify(&[0xAA, 0x08, 0x12]), None);
    }

    #[test]
    fn foreign_vendor_is_not_identified() {
        assert_eq!(identify(&[0xFF; 10]), None);
        assert_eq!(identify(&[0x08, 0xAA, 0x12, 0x00]), None);
    }

    #[test]
    fn unknown_model_code_is_not_identified() {
        assert_eq!(
            identify(&[0xAA, 0x08, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
            None
        );
        assert_eq!(identify(&[0xAA, 0x08, 0x12, 0x01]), None);
    }

    #[test]
    fn every_model_roundtrips_through_its_advertisement() {
        for model in Model::ALL {
            let code = model.manufacturer_code();
            let advertisement = [VENDOR_ID[0], VENDOR_ID[1], code[0], code[1]];
            assert_eq!(identify(&advertisement), Some(model));
        }
    }

    #[test]
    fn parses_model_names() {
        assert_eq!("oa5pro".parse::<Model>().unwrap(), Model::OsmoAction5Pro);
        assert_eq!("Osmo Pocket 3".parse::<Model>().unwrap(), Model::OsmoPocket3);
        assert_eq!("osmo_action4".parse::<Model>().unwrap(), Model::OsmoAction4);
        assert!(matches!(
            "gopro".parse::<Model>(),
            Err(ProtocolError::UnsupportedParameter {
                parameter: "model",
                ..
            })
        ));
    }
}
