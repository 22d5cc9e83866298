//! Frame codec and command library for the wireless control protocol of
//! Osmo action cameras.
//!
//! The protocol layer sits on top of a small checksummed framing format. This
//! crate only encodes and decodes bytes; connecting to the camera and moving
//! frames over the air is left to the caller.
//!
//! # Crate Structure
//!
//! - [`frame`]: frame layout, CRC8/CRC16 checksums, sequence ids, stream splitting
//! - [`proto`]: command constructors, device identification, notification classification

/// Re-export frame types.
pub mod frame {
    pub use osmolink_frame::*;
}

/// Re-export protocol types.
pub mod proto {
    pub use osmolink_proto::*;
}
