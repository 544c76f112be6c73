//! Transport layer for the uCAM protocol
//!
//! Provides the byte channel and reset line the protocol engine drives,
//! plus a serial-port implementation for real hardware.

pub mod error;
pub mod serial;

#[cfg(feature = "rpi")]
pub mod gpio;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{Error, Result};
pub use serial::SerialTransport;

#[cfg(feature = "rpi")]
pub use gpio::GpioResetLine;

use std::time::{Duration, Instant};

use tracing::trace;

/// Byte channel to the camera
///
/// Reads are unreliable: they may time out or return fewer bytes than
/// requested.
pub trait Transport: Send {
    /// Write raw bytes
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read up to `buf.len()` bytes, waiting at most `timeout`
    ///
    /// Returns `Error::ReadTimeout` if nothing arrived.
    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Discard pending input
    fn clear_input(&mut self) -> Result<()> {
        Ok(())
    }

    /// Current line speed, if the transport knows it
    fn baud_rate(&self) -> Option<u32> {
        None
    }

    /// Switch line speed
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<()>;

    /// Human-readable endpoint name
    fn describe(&self) -> String;

    /// Fill `buf` completely within `timeout`
    ///
    /// Short reads are retried until the deadline. At least one read is
    /// always attempted.
    fn receive_exact(&mut self, buf: &mut [u8], timeout: Duration) -> Result<()> {
        // No deadline when the timeout overflows the clock
        let deadline = Instant::now().checked_add(timeout);
        let mut filled = 0;

        while filled < buf.len() {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => timeout,
            };
            match self.receive(&mut buf[filled..], remaining) {
                Ok(0) | Err(Error::ReadTimeout) => break,
                Ok(n) => filled += n,
                Err(e) => return Err(e),
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break;
            }
        }

        match filled {
            n if n == buf.len() => Ok(()),
            0 => Err(Error::ReadTimeout),
            received => {
                trace!(expected = buf.len(), received, "Short read");
                Err(Error::Incomplete {
                    expected: buf.len(),
                    received,
                })
            }
        }
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }

    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        (**self).receive(buf, timeout)
    }

    fn clear_input(&mut self) -> Result<()> {
        (**self).clear_input()
    }

    fn baud_rate(&self) -> Option<u32> {
        (**self).baud_rate()
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<()> {
        (**self).set_baud_rate(baud_rate)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn receive_exact(&mut self, buf: &mut [u8], timeout: Duration) -> Result<()> {
        (**self).receive_exact(buf, timeout)
    }
}

/// Hardware reset line of the camera
pub trait ResetLine: Send {
    /// Drive the line; `true` holds the camera in reset
    fn set_reset(&mut self, asserted: bool) -> Result<()>;
}

impl<T: ResetLine + ?Sized> ResetLine for Box<T> {
    fn set_reset(&mut self, asserted: bool) -> Result<()> {
        (**self).set_reset(asserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedTransport;
    use pretty_assertions::assert_eq;

    const TIMEOUT: Duration = Duration::from_millis(20);

    #[test]
    fn test_receive_exact_joins_short_reads() {
        let mut transport = ScriptedTransport::new().with_max_read(2);
        transport.push_bytes(&[1, 2, 3, 4, 5]);

        let mut buf = [0u8; 5];
        transport.receive_exact(&mut buf, TIMEOUT).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_receive_exact_unbounded_timeout() {
        let mut transport = ScriptedTransport::new().with_max_read(4);
        transport.push_bytes(&[0xAA, 0x0E, 0x0D, 0x00, 0x00, 0x00]);
        transport.push_bytes(&[0xAA]);

        let mut buf = [0u8; 6];
        transport.receive_exact(&mut buf, Duration::MAX).unwrap();
        assert_eq!(buf, [0xAA, 0x0E, 0x0D, 0x00, 0x00, 0x00]);

        let result = transport.receive_exact(&mut buf, Duration::MAX);
        assert!(matches!(
            result,
            Err(Error::Incomplete {
                expected: 6,
                received: 1
            })
        ));
    }

    #[test]
    fn test_receive_exact_timeout_without_data() {
        let mut transport = ScriptedTransport::new();

        let mut buf = [0u8; 6];
        let result = transport.receive_exact(&mut buf, TIMEOUT);
        assert!(matches!(result, Err(Error::ReadTimeout)));
    }

    #[test]
    fn test_receive_exact_reports_partial_data() {
        let mut transport = ScriptedTransport::new();
        transport.push_bytes(&[0xAA, 0x0E]);
        transport.push_timeout();

        let mut buf = [0u8; 6];
        let result = transport.receive_exact(&mut buf, TIMEOUT);
        assert!(matches!(
            result,
            Err(Error::Incomplete {
                expected: 6,
                received: 2
            })
        ));
    }

    #[test]
    fn test_boxed_transport_delegates() {
        let transport = ScriptedTransport::new();
        let mut boxed: Box<dyn Transport> = Box::new(transport.clone());

        boxed.send(&[0xAA, 0x0D, 0, 0, 0, 0]).unwrap();
        assert_eq!(transport.written(), vec![0xAA, 0x0D, 0, 0, 0, 0]);
    }
}
