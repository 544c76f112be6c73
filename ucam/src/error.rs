//! High-level error types

use std::io;

use ucam_core::{CommandId, DeviceError, ResponseFrame};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] ucam_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] ucam_transport::Error),

    #[error("Configuration error: {0}")]
    Types(#[from] ucam_types::Error),

    /// No reply to a command within its timeout
    #[error("No response to {command}")]
    CommandTimeout { command: CommandId },

    /// Device answered with NAK
    #[error("{command} rejected by device: {error}")]
    Device {
        command: CommandId,
        error: DeviceError,
    },

    /// Reply does not belong to the command that was sent
    #[error("Unexpected reply to {command}: {frame}")]
    UnexpectedReply {
        command: CommandId,
        frame: ResponseFrame,
    },

    #[error("Synchronization failed after {attempts} attempts")]
    SyncFailed { attempts: u32 },

    #[error("No capture session - take a snapshot first")]
    NoCaptureSession,

    #[error("Capture session in progress")]
    CaptureInProgress,

    #[error("Image length unknown - request the picture first")]
    PictureLengthUnknown,

    /// Raw picture size disagrees with the configured format and resolution
    #[error("Raw image length mismatch: expected {expected} bytes, device announced {announced}")]
    ImageLengthMismatch { expected: u32, announced: u32 },

    /// Package header does not match the transfer state
    #[error(
        "Transfer package number error: expected package {expected_id} ({expected_len} bytes), got package {id} ({len} bytes)"
    )]
    TransferPackageNumber {
        expected_id: u16,
        expected_len: u16,
        id: u16,
        len: u16,
    },

    /// Image data stopped arriving mid-transfer
    #[error("Send picture timeout in package {package_id} after {bytes_written} bytes")]
    SendPictureTimeout { package_id: u16, bytes_written: u32 },

    #[error("Verify code mismatch in package {package_id}")]
    PackageVerify { package_id: u16 },

    /// Device ended the transfer before the announced length
    #[error("Image truncated: expected {expected} bytes, received {received}")]
    TruncatedImage { expected: u32, received: u32 },

    #[error("Image sink error: {0}")]
    Sink(#[source] io::Error),

    #[error("No reset line attached")]
    NoResetLine,
}

impl Error {
    /// Device-reported error, if this is a NAK
    pub fn device_error(&self) -> Option<DeviceError> {
        match self {
            Self::Device { error, .. } => Some(*error),
            _ => None,
        }
    }

    /// No (complete) answer arrived, as opposed to a negative one
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::CommandTimeout { .. } | Self::SendPictureTimeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Check if retrying the enclosing operation might succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::CommandTimeout { .. } | Self::SyncFailed { .. } | Self::UnexpectedReply { .. } => {
                true
            }
            Self::Core(e) => e.is_recoverable(),
            Self::Transport(e) => e.is_timeout(),
            Self::Device { error, .. } => error.is_transient(),
            _ => false,
        }
    }

    /// Check if the link must be synchronized again
    pub fn requires_resync(&self) -> bool {
        match self {
            Self::SyncFailed { .. } => true,
            Self::Core(e) => e.requires_resync(),
            _ => false,
        }
    }

    /// Check if this error ended a capture session
    pub fn is_transfer_failure(&self) -> bool {
        matches!(
            self,
            Self::TransferPackageNumber { .. }
                | Self::SendPictureTimeout { .. }
                | Self::PackageVerify { .. }
                | Self::TruncatedImage { .. }
                | Self::Sink(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_and_nak_stay_distinct() {
        let timeout = Error::CommandTimeout {
            command: CommandId::Initial,
        };
        let nak = Error::Device {
            command: CommandId::Initial,
            error: DeviceError::Parameter,
        };

        assert!(timeout.is_timeout());
        assert!(timeout.is_recoverable());
        assert_eq!(timeout.device_error(), None);

        assert!(!nak.is_timeout());
        assert!(!nak.is_recoverable());
        assert_eq!(nak.device_error(), Some(DeviceError::Parameter));
    }

    #[test]
    fn test_transport_timeout_is_timeout() {
        let err = Error::from(ucam_transport::Error::ReadTimeout);
        assert!(err.is_timeout());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_transfer_failures() {
        let err = Error::TransferPackageNumber {
            expected_id: 2,
            expected_len: 276,
            id: 2,
            len: 512,
        };
        assert!(err.is_transfer_failure());
        assert!(!err.is_recoverable());
    }
}
