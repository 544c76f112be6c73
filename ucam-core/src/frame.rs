//! 6-byte command/response frame codec
//!
//! ```text
//! ┌────────┬───────────┬────────┬────────┬────────┬────────┐
//! │ Prefix │ CommandId │ Param1 │ Param2 │ Param3 │ Param4 │
//! │  0xAA  │  1 byte   │ 1 byte │ 1 byte │ 1 byte │ 1 byte │
//! └────────┴───────────┴────────┴────────┴────────┴────────┘
//! ```

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use bytes::{Buf, BufMut};
use tracing::trace;

use crate::{
    command::CommandId,
    constants::{FRAME_LEN, FRAME_PREFIX},
    error::{Error, Result},
};

/// Encode a frame from its raw fields
///
/// # Examples
///
/// ```
/// use ucam_core::{frame, CommandId};
///
/// let bytes = frame::encode(CommandId::Sync, 0, 0, 0, 0);
/// assert_eq!(bytes, [0xAA, 0x0D, 0x00, 0x00, 0x00, 0x00]);
/// ```
pub fn encode(command: CommandId, p1: u8, p2: u8, p3: u8, p4: u8) -> [u8; FRAME_LEN] {
    CommandFrame::with_params(command, [p1, p2, p3, p4]).encode()
}

/// Decode a frame received from the device
///
/// Only the shape is checked here. Whether the frame is an ACK, a NAK or
/// something else is left to the caller.
///
/// # Errors
///
/// - `FrameLength` if the buffer is not exactly 6 bytes
/// - `MalformedFrame` if the first byte is not the prefix
pub fn decode(bytes: &[u8]) -> Result<ResponseFrame> {
    if bytes.len() != FRAME_LEN {
        return Err(Error::FrameLength {
            expected: FRAME_LEN,
            actual: bytes.len(),
        });
    }

    let mut buf = bytes;
    let prefix = buf.get_u8();
    if prefix != FRAME_PREFIX {
        return Err(Error::MalformedFrame { prefix });
    }

    let command = buf.get_u8();
    let mut params = [0u8; 4];
    buf.copy_to_slice(&mut params);

    let frame = ResponseFrame { command, params };
    trace!(frame = %hex::encode(bytes), "Decoded frame");

    Ok(frame)
}

/// Host-to-device command frame
///
/// Immutable once built; one instance per command issued.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    command: CommandId,
    params: [u8; 4],
}

impl CommandFrame {
    /// Create a frame with all parameters zero
    pub fn new(command: CommandId) -> Self {
        Self {
            command,
            params: [0; 4],
        }
    }

    /// Create a frame with explicit parameters
    pub fn with_params(command: CommandId, params: [u8; 4]) -> Self {
        Self { command, params }
    }

    /// SYNC frame used during link negotiation
    pub fn sync() -> Self {
        Self::new(CommandId::Sync)
    }

    /// ACK frame acknowledging `command`
    ///
    /// `package_id` is used during image transfer to request a package.
    pub fn ack(command: CommandId, counter: u8, package_id: u16) -> Self {
        let id = package_id.to_le_bytes();
        Self::with_params(CommandId::Ack, [command.into(), counter, id[0], id[1]])
    }

    /// ACK frame requesting the JPEG package with `package_id`
    pub fn package_ack(package_id: u16) -> Self {
        let id = package_id.to_le_bytes();
        Self::with_params(CommandId::Ack, [0x00, 0x00, id[0], id[1]])
    }

    pub fn command(&self) -> CommandId {
        self.command
    }

    pub fn params(&self) -> [u8; 4] {
        self.params
    }

    /// Encode to the 6-byte wire representation
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut out = [0u8; FRAME_LEN];
        let mut buf = &mut out[..];
        buf.put_u8(FRAME_PREFIX);
        buf.put_u8(self.command.into());
        buf.put_slice(&self.params);
        out
    }
}

impl fmt::Debug for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandFrame")
            .field("command", &self.command)
            .field("params", &hex::encode(self.params))
            .finish()
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.command, hex::encode(self.params))
    }
}

/// Device-to-host frame
///
/// The command byte is kept raw: a device resynchronizing after noise may
/// send identifiers outside the known table.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame {
    pub command: u8,
    pub params: [u8; 4],
}

impl ResponseFrame {
    /// Build a frame as the device would send it
    pub fn new(command: CommandId, params: [u8; 4]) -> Self {
        Self {
            command: command.into(),
            params,
        }
    }

    /// Known command id, if any
    pub fn command_id(&self) -> Result<CommandId> {
        CommandId::try_from(self.command)
    }

    /// Check the command byte against `command`
    pub fn is(&self, command: CommandId) -> bool {
        self.command == u8::from(command)
    }

    /// ACK: command id being acknowledged
    pub fn acked_command(&self) -> u8 {
        self.params[0]
    }

    /// ACK/NAK: device reply counter
    pub fn counter(&self) -> u8 {
        self.params[1]
    }

    /// ACK: package id (little-endian in params 3-4)
    pub fn package_id(&self) -> u16 {
        LittleEndian::read_u16(&self.params[2..4])
    }

    /// NAK: device error code
    pub fn nak_code(&self) -> u8 {
        self.params[2]
    }

    /// DATA: picture type
    pub fn data_kind(&self) -> u8 {
        self.params[0]
    }

    /// DATA: 24-bit image length (little-endian in params 2-4)
    pub fn data_length(&self) -> u32 {
        LittleEndian::read_u24(&self.params[1..4])
    }

    /// Wire representation
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut out = [0u8; FRAME_LEN];
        out[0] = FRAME_PREFIX;
        out[1] = self.command;
        out[2..].copy_from_slice(&self.params);
        out
    }
}

impl fmt::Debug for ResponseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseFrame")
            .field("command", &format!("0x{:02X}", self.command))
            .field("params", &hex::encode(self.params))
            .finish()
    }
}

impl fmt::Display for ResponseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command_id() {
            Ok(cmd) => write!(f, "{}[{}]", cmd, hex::encode(self.params)),
            Err(_) => write!(f, "0x{:02X}[{}]", self.command, hex::encode(self.params)),
        }
    }
}
