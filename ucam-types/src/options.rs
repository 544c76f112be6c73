//! Command parameter enumerations

use crate::error::{Error, Result};

/// Mains frequency the sensor compensates flicker for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LightFrequency {
    #[default]
    Hz50 = 0x00,
    Hz60 = 0x01,
}

/// Level used for contrast, brightness and exposure
///
/// For exposure the levels map to -2..=+2 EV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Tone {
    Min = 0x00,
    Low = 0x01,
    #[default]
    Normal = 0x02,
    High = 0x03,
    Max = 0x04,
}

impl Tone {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Tone {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Self::Min),
            0x01 => Ok(Self::Low),
            0x02 => Ok(Self::Normal),
            0x03 => Ok(Self::High),
            0x04 => Ok(Self::Max),
            other => Err(Error::ToneOutOfRange(other)),
        }
    }
}

/// SNAPSHOT kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SnapshotKind {
    /// JPEG
    Compressed = 0x00,
    /// Raw
    Uncompressed = 0x01,
}

/// GET_PICTURE source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PictureType {
    /// Picture held from the last SNAPSHOT
    Snapshot = 0x01,
    /// Live raw preview
    Raw = 0x02,
    /// Live JPEG preview
    Jpeg = 0x05,
}

impl PictureType {
    /// Snapshot kind implied by a direct picture, `None` for snapshots
    pub fn direct_kind(self) -> Option<SnapshotKind> {
        match self {
            Self::Snapshot => None,
            Self::Raw => Some(SnapshotKind::Uncompressed),
            Self::Jpeg => Some(SnapshotKind::Compressed),
        }
    }
}

/// RESET variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResetKind {
    /// Reboot the firmware; registers and state machines are cleared
    Full = 0x00,
    /// Reset the state machines only; configuration registers survive
    StateMachines = 0x01,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_conversion() {
        assert_eq!(Tone::try_from(3).unwrap(), Tone::High);
        assert_eq!(Tone::try_from(5), Err(Error::ToneOutOfRange(5)));
    }

    #[test]
    fn test_direct_picture_kind() {
        assert_eq!(PictureType::Snapshot.direct_kind(), None);
        assert_eq!(PictureType::Jpeg.direct_kind(), Some(SnapshotKind::Compressed));
        assert_eq!(PictureType::Raw.direct_kind(), Some(SnapshotKind::Uncompressed));
    }
}
