//! Camera control protocol on top of [`osmolink_frame`].
//!
//! - [`CommandLibrary`] builds outbound command frames (pairing, Wi-Fi
//!   credentials, livestream configuration, broadcast start/stop)
//! - [`identify`] maps advertisement manufacturer data to a [`Model`]
//! - [`classify`] turns inbound notification frames into typed [`Message`]s
//!
//! ```
//! use osmolink_proto::{classify, CommandLibrary, Message, Model};
//!
//! let commands = CommandLibrary::new();
//! let auth = commands.auth("1234")?;
//! assert_eq!(auth.len(), 51);
//!
//! let model = osmolink_proto::identify(&[0xAA, 0x08, 0x14, 0x00]);
//! assert_eq!(model, Some(Model::OsmoAction4));
//!
//! // Commands are not notifications; the classifier does not recognize them.
//! let message = classify(auth.as_bytes(), Model::OsmoAction4)?;
//! assert!(matches!(message, Message::Unknown(_)));
//! # Ok::<(), osmolink_proto::ProtocolError>(())
//! ```

pub mod command;
pub mod error;
pub mod message;
pub mod model;
pub mod notify;
pub mod settings;
pub mod template;
pub mod wifi;

pub use command::{CommandLibrary, LivestreamFrames};
pub use error::{ProtocolError, Result};
pub use message::{
    AuthDetail, AuthEvent, BroadcastEvent, BroadcastStatus, Message, StatisticsMessage,
    UnknownEvent, WifiBand, WifiListEvent, WifiNetwork, WifiStatus,
};
pub use model::{
    identify, Model, COMMAND_CHARACTERISTIC_UUID, NOTIFY_CHARACTERISTIC_UUID, VENDOR_ID,
};
pub use notify::classify;
pub use settings::{FrameRate, LivestreamSettings, Resolution, StabilizationMode};
pub use wifi::parse_wifi_list;
