//! Image package header and verify code
//!
//! # Package Structure
//!
//! ```text
//! ┌─────────────┬─────────────┬──────────────────┬───────────────────┐
//! │ Package ID  │ Data Length │   Image Data     │ Verify Code (opt) │
//! │  2 bytes    │  2 bytes    │  length bytes    │  2 bytes          │
//! │  (LE u16)   │  (LE u16)   │                  │  (low sum, 0x00)  │
//! └─────────────┴─────────────┴──────────────────┴───────────────────┘
//! ```

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    constants::PACKAGE_HEADER_LEN,
    error::{Error, Result},
};

/// Header preceding each image package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageHeader {
    pub id: u16,
    pub len: u16,
}

impl PackageHeader {
    pub fn new(id: u16, len: u16) -> Self {
        Self { id, len }
    }

    /// Decode the 4-byte header
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PACKAGE_HEADER_LEN {
            return Err(Error::HeaderTooShort {
                expected: PACKAGE_HEADER_LEN,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            id: LittleEndian::read_u16(&bytes[0..2]),
            len: LittleEndian::read_u16(&bytes[2..4]),
        })
    }

    pub fn encode(&self) -> [u8; PACKAGE_HEADER_LEN] {
        let mut out = [0u8; PACKAGE_HEADER_LEN];
        LittleEndian::write_u16(&mut out[0..2], self.id);
        LittleEndian::write_u16(&mut out[2..4], self.len);
        out
    }

    /// Zero-length packages mark the end of a transfer
    pub fn is_end_marker(&self) -> bool {
        self.len == 0
    }
}

/// Verify code over header and payload
///
/// Low byte of the byte sum; the high byte on the wire is always zero.
pub fn verify_code(header: &PackageHeader, payload: &[u8]) -> u16 {
    let sum = header
        .encode()
        .iter()
        .chain(payload)
        .fold(0u8, |acc, b| acc.wrapping_add(*b));
    sum as u16
}

/// Check a received verify code trailer
pub fn verify(header: &PackageHeader, payload: &[u8], trailer: &[u8]) -> bool {
    trailer.len() >= 2 && LittleEndian::read_u16(trailer) == verify_code(header, payload)
}
