//! Single command/acknowledgement exchange
//!
//! A command session owns the transport and the link record. It sends
//! exactly one frame per `execute` and interprets exactly one reply; retry
//! policy stays with the caller because not every command is safe to
//! resend.

use std::time::Duration;

use tracing::{debug, trace, warn};

use ucam_core::{frame, CommandFrame, CommandId, DeviceError, Link, LinkState, ResponseFrame, FRAME_LEN};
use ucam_transport::Transport;

use crate::{
    error::{Error, Result},
    sync::{SyncNegotiator, SyncReport},
};

/// Positive reply to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub command: CommandId,
    pub counter: u8,
    pub package_id: u16,
}

impl Ack {
    fn from_frame(command: CommandId, frame: &ResponseFrame) -> Self {
        Self {
            command,
            counter: frame.counter(),
            package_id: frame.package_id(),
        }
    }
}

/// Command channel to one camera
pub struct CommandSession<T> {
    transport: T,
    link: Link,
    timeout: Duration,
}

impl<T: Transport> CommandSession<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            transport,
            link: Link::new(),
            timeout,
        }
    }

    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Default reply timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Run the SYNC handshake on this session's transport
    pub fn synchronize(&mut self, negotiator: &SyncNegotiator) -> Result<SyncReport> {
        negotiator.negotiate(&mut self.transport, &mut self.link)
    }

    /// Forget synchronization after a device reset
    pub fn desync(&mut self) {
        self.link.reset();
    }

    /// Send one command and interpret its reply
    ///
    /// # Errors
    ///
    /// - `NotSynced` if the link is not synchronized
    /// - `CommandTimeout` if no complete reply arrived
    /// - `Device` if the camera answered NAK
    /// - `UnexpectedReply` for an ACK of another command or any other frame
    pub fn execute(&mut self, command: CommandFrame, timeout: Duration) -> Result<Ack> {
        let id = command.command();
        debug!("Executing {}", command);

        self.send(command)?;

        let reply = match self.receive_frame(timeout) {
            Ok(frame) => frame,
            Err(e) if e.is_timeout() => {
                warn!("No reply to {}", id);
                return Err(Error::CommandTimeout { command: id });
            }
            Err(e) => return Err(e),
        };

        interpret(id, reply)
    }

    /// Send a frame without waiting for a reply
    ///
    /// Used for ACKs the host owes the camera.
    pub fn send(&mut self, command: CommandFrame) -> Result<()> {
        if !command.command().allowed_unsynced() {
            self.link.ensure_synced()?;
        }

        let bytes = command.encode();
        trace!(frame = %hex::encode(bytes), "Sending");
        self.transport.send(&bytes)?;

        Ok(())
    }

    /// Read and decode one frame
    pub fn receive_frame(&mut self, timeout: Duration) -> Result<ResponseFrame> {
        let mut buf = [0u8; FRAME_LEN];
        self.transport.receive_exact(&mut buf, timeout)?;
        Ok(frame::decode(&buf)?)
    }

    /// Read exactly `buf.len()` raw bytes
    pub fn receive_raw(&mut self, buf: &mut [u8], timeout: Duration) -> Result<()> {
        self.transport.receive_exact(buf, timeout)?;
        Ok(())
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// Map a reply frame to the outcome of `command`
fn interpret(command: CommandId, reply: ResponseFrame) -> Result<Ack> {
    if reply.is(CommandId::Ack) {
        if reply.acked_command() == u8::from(command) {
            trace!("{} acknowledged (counter {})", command, reply.counter());
            return Ok(Ack::from_frame(command, &reply));
        }
        return Err(Error::UnexpectedReply {
            command,
            frame: reply,
        });
    }

    if reply.is(CommandId::Nak) {
        let error = DeviceError::from_code(reply.nak_code());
        debug!("{} rejected: {}", command, error);
        return Err(Error::Device { command, error });
    }

    Err(Error::UnexpectedReply {
        command,
        frame: reply,
    })
}
