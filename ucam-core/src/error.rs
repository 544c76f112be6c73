//! Error types for ucam-core

use crate::link::LinkState;

/// Result type alias for ucam protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// First byte of a frame is not the protocol prefix
    #[error("Malformed frame: expected prefix 0xAA, got 0x{prefix:02X}")]
    MalformedFrame {
        prefix: u8,
    },

    /// Frame buffer has the wrong size
    #[error("Frame length mismatch: expected {expected} bytes, got {actual} bytes")]
    FrameLength {
        expected: usize,
        actual: usize,
    },

    /// Package header buffer has the wrong size
    #[error("Package header too short: expected {expected} bytes, got {actual} bytes")]
    HeaderTooShort {
        expected: usize,
        actual: usize,
    },

    /// Unknown command identifier
    #[error("Unknown command id: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Operation requires a synchronized link
    #[error("Link not synchronized (state: {0})")]
    NotSynced(LinkState),

    /// Invalid link state transition
    #[error("Invalid link state transition from {from} to {to}")]
    InvalidTransition {
        from: LinkState,
        to: LinkState,
    },
}

impl Error {
    /// Check if error is recoverable (retrying the enclosing operation might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedFrame { .. } | Self::FrameLength { .. } | Self::HeaderTooShort { .. }
        )
    }

    /// Check if error requires a new synchronization handshake
    pub fn requires_resync(&self) -> bool {
        matches!(self, Self::NotSynced(_) | Self::InvalidTransition { .. })
    }
}
