//! uCAM-III command identifiers

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command identifiers
///
/// Second byte of every frame. The numeric values are fixed by the camera
/// firmware and shared by both directions of the link.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandId {
    // Configuration
    Initial = 0x01,
    SetPackageSize = 0x06,
    SetBaudRate = 0x07,
    Light = 0x13,
    SetTone = 0x14,
    Sleep = 0x15,

    // Capture
    GetPicture = 0x04,
    Snapshot = 0x05,
    Data = 0x0A,

    // Link control
    Reset = 0x08,
    Sync = 0x0D,

    // Replies
    Ack = 0x0E,
    Nak = 0x0F,
}

impl CommandId {
    /// Check if this is a reply (ACK or NAK)
    pub fn is_reply(self) -> bool {
        matches!(self, Self::Ack | Self::Nak)
    }

    /// Check if this command may be sent on an unsynchronized link
    pub fn allowed_unsynced(self) -> bool {
        matches!(self, Self::Sync)
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::GetPicture => "GET_PICTURE",
            Self::Snapshot => "SNAPSHOT",
            Self::SetPackageSize => "SET_PACKAGE_SIZE",
            Self::SetBaudRate => "SET_BAUD_RATE",
            Self::Reset => "RESET",
            Self::Data => "DATA",
            Self::Sync => "SYNC",
            Self::Ack => "ACK",
            Self::Nak => "NAK",
            Self::Light => "LIGHT",
            Self::SetTone => "SET_TONE",
            Self::Sleep => "SLEEP",
        }
    }
}

impl From<CommandId> for u8 {
    fn from(cmd: CommandId) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for CommandId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Initial),
            0x04 => Ok(Self::GetPicture),
            0x05 => Ok(Self::Snapshot),
            0x06 => Ok(Self::SetPackageSize),
            0x07 => Ok(Self::SetBaudRate),
            0x08 => Ok(Self::Reset),
            0x0A => Ok(Self::Data),
            0x0D => Ok(Self::Sync),
            0x0E => Ok(Self::Ack),
            0x0F => Ok(Self::Nak),
            0x13 => Ok(Self::Light),
            0x14 => Ok(Self::SetTone),
            0x15 => Ok(Self::Sleep),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_conversion() {
        assert_eq!(u8::from(CommandId::Sync), 0x0D);
        assert_eq!(CommandId::try_from(0x0D).unwrap(), CommandId::Sync);
        assert_eq!(CommandId::try_from(0x15).unwrap(), CommandId::Sleep);
    }

    #[test]
    fn test_command_is_reply() {
        assert!(CommandId::Ack.is_reply());
        assert!(CommandId::Nak.is_reply());
        assert!(!CommandId::Snapshot.is_reply());
    }

    #[test]
    fn test_only_sync_allowed_unsynced() {
        assert!(CommandId::Sync.allowed_unsynced());
        assert!(!CommandId::Initial.allowed_unsynced());
        assert!(!CommandId::Ack.allowed_unsynced());
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(CommandId::try_from(0x02), Err(Error::UnknownCommand(0x02)));
    }

    #[test]
    fn test_command_display() {
        assert_eq!(CommandId::GetPicture.to_string(), "GET_PICTURE(0x04)");
    }
}
