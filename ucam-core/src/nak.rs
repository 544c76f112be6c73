//! Device-reported error codes carried by NAK frames
//!
//! The mapping is a pure lookup. Reporting is the caller's business.

use std::fmt;

/// Error reported by the camera in the third parameter of a NAK
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeviceError {
    PictureType,
    PictureUpScale,
    PictureScale,
    UnexpectedReply,
    SendPictureTimeout,
    UnexpectedCommand,
    SramJpegType,
    SramJpegSize,
    PictureFormat,
    PictureSize,
    Parameter,
    SendRegisterTimeout,
    CommandId,
    PictureNotReady,
    TransferPackageNumber,
    PackageSizeWrong,
    CommandHeader,
    CommandLength,
    SendPicture,
    SendCommand,
    /// Code outside the documented table
    Unknown(u8),
}

impl DeviceError {
    /// Look up a device error code
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => Self::PictureType,
            0x02 => Self::PictureUpScale,
            0x03 => Self::PictureScale,
            0x04 => Self::UnexpectedReply,
            0x05 => Self::SendPictureTimeout,
            0x06 => Self::UnexpectedCommand,
            0x07 => Self::SramJpegType,
            0x08 => Self::SramJpegSize,
            0x09 => Self::PictureFormat,
            0x0A => Self::PictureSize,
            0x0B => Self::Parameter,
            0x0C => Self::SendRegisterTimeout,
            0x0D => Self::CommandId,
            0x0F => Self::PictureNotReady,
            0x10 => Self::TransferPackageNumber,
            0x11 => Self::PackageSizeWrong,
            0xF0 => Self::CommandHeader,
            0xF1 => Self::CommandLength,
            0xF5 => Self::SendPicture,
            0xFF => Self::SendCommand,
            other => Self::Unknown(other),
        }
    }

    /// Numeric code as sent by the device
    pub fn code(self) -> u8 {
        match self {
            Self::PictureType => 0x01,
            Self::PictureUpScale => 0x02,
            Self::PictureScale => 0x03,
            Self::UnexpectedReply => 0x04,
            Self::SendPictureTimeout => 0x05,
            Self::UnexpectedCommand => 0x06,
            Self::SramJpegType => 0x07,
            Self::SramJpegSize => 0x08,
            Self::PictureFormat => 0x09,
            Self::PictureSize => 0x0A,
            Self::Parameter => 0x0B,
            Self::SendRegisterTimeout => 0x0C,
            Self::CommandId => 0x0D,
            Self::PictureNotReady => 0x0F,
            Self::TransferPackageNumber => 0x10,
            Self::PackageSizeWrong => 0x11,
            Self::CommandHeader => 0xF0,
            Self::CommandLength => 0xF1,
            Self::SendPicture => 0xF5,
            Self::SendCommand => 0xFF,
            Self::Unknown(code) => code,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::PictureType => "picture type error",
            Self::PictureUpScale => "picture up-scale error",
            Self::PictureScale => "picture scale error",
            Self::UnexpectedReply => "unexpected reply",
            Self::SendPictureTimeout => "send picture timeout",
            Self::UnexpectedCommand => "unexpected command",
            Self::SramJpegType => "SRAM JPEG type error",
            Self::SramJpegSize => "SRAM JPEG size error",
            Self::PictureFormat => "picture format error",
            Self::PictureSize => "picture size error",
            Self::Parameter => "parameter error",
            Self::SendRegisterTimeout => "send register timeout",
            Self::CommandId => "command ID error",
            Self::PictureNotReady => "picture not ready",
            Self::TransferPackageNumber => "transfer package number error",
            Self::PackageSizeWrong => "set transfer package size wrong",
            Self::CommandHeader => "command header error",
            Self::CommandLength => "command length error",
            Self::SendPicture => "send picture error",
            Self::SendCommand => "send command error",
            Self::Unknown(_) => "unknown device error",
        }
    }

    /// Check if resending the same command could succeed
    ///
    /// Parameter and format errors will be NAK'd again; readiness and
    /// transfer hiccups may clear up.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::PictureNotReady
                | Self::SendPictureTimeout
                | Self::SendRegisterTimeout
                | Self::SendPicture
                | Self::SendCommand
                | Self::UnexpectedReply
        )
    }
}

impl From<u8> for DeviceError {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.label(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_not_ready() {
        assert_eq!(DeviceError::from_code(0x0F), DeviceError::PictureNotReady);
        assert_eq!(DeviceError::PictureNotReady.label(), "picture not ready");
    }

    #[test]
    fn test_unknown_code_is_kept() {
        let err = DeviceError::from_code(0x0E);
        assert_eq!(err, DeviceError::Unknown(0x0E));
        assert_eq!(err.code(), 0x0E);
        assert_eq!(err.to_string(), "unknown device error (0x0E)");
    }

    #[test]
    fn test_code_round_trip_over_table() {
        for code in 0..=u8::MAX {
            assert_eq!(DeviceError::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(DeviceError::PictureNotReady.is_transient());
        assert!(!DeviceError::Parameter.is_transient());
        assert!(!DeviceError::PictureType.is_transient());
    }
}
