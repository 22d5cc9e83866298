//! Frame checksums.
//!
//! Two CRCs protect every frame: an 8-bit CRC over the first three header
//! bytes (marker, length, spacer) stored at offset 3, and a 16-bit CRC over
//! everything before the trailer, appended low byte first.
//!
//! Both are reflected algorithms described in the Rocksoft model, so the
//! initial values below are given unreflected. A table-driven implementation
//! that shifts right would seed its register with `0x77` and `0x3692`.

use crc::{Algorithm, Crc};

/// CRC-8 used for the header checksum at offset 3.
pub const HEADER_CRC8: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xEE,
    refin: true,
    refout: true,
    xorout: 0x00,
    check: 0xFB,
    residue: 0x00,
};

/// CRC-16 used for the frame trailer.
pub const TRAILER_CRC16: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0x496C,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0x7109,
    residue: 0x0000,
};

const CRC8: Crc<u8> = Crc::<u8>::new(&HEADER_CRC8);
const CRC16: Crc<u16> = Crc::<u16>::new(&TRAILER_CRC16);

/// Header checksum over `data` (normally frame bytes 0..3).
pub fn crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// Trailer checksum over `data`, serialized as it appears on the wire.
pub fn crc16(data: &[u8]) -> [u8; 2] {
    CRC16.checksum(data).to_le_bytes()
}

/// Trailer checksum as an integer, for diagnostics.
pub fn crc16_value(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}
