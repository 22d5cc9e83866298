use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Stream resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Resolution {
    /// 480p.
    Sd,
    /// 720p.
    Hd,
    /// 1080p.
    Fhd,
}

impl Resolution {
    /// Byte written to the stream settings payload.
    pub const fn code(self) -> u8 {
        match self {
            Resolution::Sd => 0x47,
            Resolution::Hd => 0x04,
            Resolution::Fhd => 0x0A,
        }
    }

    /// Vertical lines.
    pub const fn lines(self) -> u16 {
        match self {
            Resolution::Sd => 480,
            Resolution::Hd => 720,
            Resolution::Fhd => 1080,
        }
    }
}

impl TryFrom<u16> for Resolution {
    type Error = ProtocolError;

    fn try_from(lines: u16) -> Result<Self> {
        match lines {
            480 => Ok(Resolution::Sd),
            720 => Ok(Resolution::Hd),
            1080 => Ok(Resolution::Fhd),
            other => Err(ProtocolError::unsupported("resolution", other)),
        }
    }
}

impl From<Resolution> for u16 {
    fn from(resolution: Resolution) -> Self {
        resolution.lines()
    }
}

/// Stream frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FrameRate {
    Fps25,
    Fps30,
    Fps60,
}

impl FrameRate {
    /// Byte written to the stream settings payload.
    pub const fn code(self) -> u8 {
        match self {
            FrameRate::Fps25 => 0x02,
            FrameRate::Fps30 => 0x03,
            FrameRate::Fps60 => 0x06,
        }
    }

    pub const fn fps(self) -> u32 {
        match self {
            FrameRate::Fps25 => 25,
            FrameRate::Fps30 => 30,
            FrameRate::Fps60 => 60,
        }
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = ProtocolError;

    fn try_from(fps: u32) -> Result<Self> {
        match fps {
            25 => Ok(FrameRate::Fps25),
            30 => Ok(FrameRate::Fps30),
            60 => Ok(FrameRate::Fps60),
            other => Err(ProtocolError::unsupported("frame rate", other)),
        }
    }
}

impl From<FrameRate> for u32 {
    fn from(rate: FrameRate) -> Self {
        rate.fps()
    }
}

/// Electronic image stabilization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StabilizationMode {
    #[default]
    Off,
    RockSteady,
    RockSteadyPlus,
    HorizonBalancing,
    HorizonSteady,
}

impl StabilizationMode {
    pub const ALL: [StabilizationMode; 5] = [
        StabilizationMode::Off,
        StabilizationMode::RockSteady,
        StabilizationMode::RockSteadyPlus,
        StabilizationMode::HorizonBalancing,
        StabilizationMode::HorizonSteady,
    ];

    /// Byte written to the EIS payload.
    pub const fn code(self) -> u8 {
        match self {
            StabilizationMode::Off => 0x00,
            StabilizationMode::RockSteady => 0x01,
            StabilizationMode::HorizonSteady => 0x02,
            StabilizationMode::RockSteadyPlus => 0x03,
            StabilizationMode::HorizonBalancing => 0x04,
        }
    }

    /// Label shown by the camera.
    pub const fn label(self) -> &'static str {
        match self {
            StabilizationMode::Off => "Off",
            StabilizationMode::RockSteady => "RockSteady",
            StabilizationMode::RockSteadyPlus => "RockSteady +",
            StabilizationMode::HorizonBalancing => "HorizonBalancing",
            StabilizationMode::HorizonSteady => "HorizonSteady",
        }
    }
}

impl fmt::Display for StabilizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StabilizationMode {
    type Err = ProtocolError;

    /// Accepts the camera label in any case, with or without separators;
    /// `+` reads as "plus" (`"RockSteady +"`, `"rock-steady-plus"`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|mode| normalize(mode.label()) == wanted)
            .ok_or_else(|| ProtocolError::unsupported("stabilization mode", s))
    }
}

impl TryFrom<String> for StabilizationMode {
    type Error = ProtocolError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<StabilizationMode> for String {
    fn from(mode: StabilizationMode) -> Self {
        mode.label().to_string()
    }
}

fn normalize(s: &str) -> String {
    s.replace('+', "plus")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Everything the camera needs to push a livestream.
///
/// Loadable from JSON:
///
/// ```json
/// {
///   "rtmp_url": "rtmp://live.example.com/app/key",
///   "bitrate": 4000,
///   "resolution": 1080,
///   "fps": 30,
///   "auto": false,
///   "eis": "RockSteady +"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LivestreamSettings {
    /// Full RTMP ingest URL including the stream key.
    pub rtmp_url: String,
    /// Bitrate in kbit/s.
    pub bitrate: u16,
    pub resolution: Resolution,
    pub fps: FrameRate,
    /// Let the camera adapt quality to the link. Default: false.
    #[serde(default)]
    pub auto: bool,
    /// Default: off.
    #[serde(default)]
    pub eis: StabilizationMode,
}

impl LivestreamSettings {
    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_codes() {
        assert_eq!(Resolution::try_from(480).unwrap().code(), 0x47);
        assert_eq!(Resolution::try_from(720).unwrap().code(), 0x04);
        assert_eq!(Resolution::try_from(1080).unwrap().code(), 0x0A);
        assert!(matches!(
            Resolution::try_from(1440),
            Err(ProtocolError::UnsupportedParameter {
                parameter: "resolution",
                ..
            })
        ));
    }

    #[test]
    fn frame_rate_codes() {
        assert_eq!(FrameRate::try_from(25).unwrap().code(), 0x02);
        assert_eq!(FrameRate::try_from(30).unwrap().code(), 0x03);
        assert_eq!(FrameRate::try_from(60).unwrap().code(), 0x06);
        for fps in [0, 24, 50, 120] {
            assert!(matches!(
                FrameRate::try_from(fps),
                Err(ProtocolError::UnsupportedParameter {
                    parameter: "frame rate",
                    ..
                })
            ));
        }
    }

    #[test]
    fn stabilization_codes_are_distinct() {
        let mut codes: Vec<u8> = StabilizationMode::ALL.iter().map(|m| m.code()).collect();
        codes.sort_unstable();
        assert_eq!(codes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn stabilization_mode_parsing() {
        assert_eq!(
            "RockSteady +".parse::<StabilizationMode>().unwrap(),
            StabilizationMode::RockSteadyPlus
        );
        assert_eq!(
            "rock-steady-plus".parse::<StabilizationMode>().unwrap(),
            StabilizationMode::RockSteadyPlus
        );
        assert_eq!(
            "horizon_steady".parse::<StabilizationMode>().unwrap(),
            StabilizationMode::HorizonSteady
        );
        assert_eq!(
            "off".parse::<StabilizationMode>().unwrap(),
            StabilizationMode::Off
        );
        assert!("wobbly".parse::<StabilizationMode>().is_err());
    }

    #[test]
    fn settings_from_json() {
        let settings = LivestreamSettings::from_json(
            r#"{
                "rtmp_url": "rtmp://live.example.com/app/key",
                "bitrate": 4000,
                "resolution": 1080,
                "fps": 30,
                "eis": "RockSteady +"
            }"#,
        )
        .unwrap();

        assert_eq!(settings.bitrate, 4000);
        assert_eq!(settings.resolution, Resolution::Fhd);
        assert_eq!(settings.fps, FrameRate::Fps30);
        assert!(!settings.auto);
        assert_eq!(settings.eis, StabilizationMode::RockSteadyPlus);
    }

    #[test]
    fn settings_reject_unsupported_values() {
        let err = LivestreamSettings::from_json(
            r#"{"rtmp_url": "rtmp://x", "bitrate": 4000, "resolution": 1080, "fps": 24}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProtocolError::Settings(_)));
        assert!(err.to_string().contains("frame rate"));

        let err = LivestreamSettings::from_json(
            r#"{"rtmp_url": "rtmp://x", "bitrate": 4000, "resolution": 1080, "fps": 30, "color": 1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProtocolError::Settings(_)));
    }

    #[test]
    fn settings_serialize_back_to_json() {
        let settings = LivestreamSettings {
            rtmp_url: "rtmp://x".to_string(),
            bitrate: 2500,
            resolution: Resolution::Hd,
            fps: FrameRate::Fps60,
            auto: true,
            eis: StabilizationMode::HorizonBalancing,
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["resolution"], 720);
        assert_eq!(json["fps"], 60);
        assert_eq!(json["eis"], "HorizonBalancing");
        assert_eq!(LivestreamSettings::from_json(&json.to_string()).unwrap(), settings);
    }
}
