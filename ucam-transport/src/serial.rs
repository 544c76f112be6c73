//! Serial port transport
//!
//! The camera talks 8N1 over a UART. On the flight board this is
//! `/dev/ttyAMA0` at 921600 bps.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

/// Serial transport for uCAM devices
pub struct SerialTransport {
    path: String,
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Default device node on the flight board
    pub const DEFAULT_PATH: &'static str = "/dev/ttyAMA0";

    /// Default link speed on the flight board
    pub const DEFAULT_BAUD_RATE: u32 = 921_600;

    /// Open a serial port
    pub fn open(path: impl Into<String>, baud_rate: u32) -> Result<Self> {
        let path = path.into();

        debug!("Opening {} at {} bps...", path, baud_rate);

        let port = serialport::new(&path, baud_rate)
            .timeout(Duration::from_millis(100))
            .open()?;

        debug!("Opened {}", path);

        Ok(Self { path, port })
    }

    /// Wrap an already opened port
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        let path = port.name().unwrap_or_else(|| "serial".to_string());
        Self { path, port }
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        trace!("Sending {} bytes: {}", data.len(), hex::encode(&data[..data.len().min(16)]));

        self.port.write_all(data)?;
        self.port.flush()?;

        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        if timeout.is_zero() {
            return Err(Error::ReadTimeout);
        }

        self.port.set_timeout(timeout)?;

        match self.port.read(buf) {
            Ok(0) => Err(Error::ReadTimeout),
            Ok(n) => {
                trace!("Received {} bytes: {}", n, hex::encode(&buf[..n.min(16)]));
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Err(Error::ReadTimeout),
            Err(e) => {
                warn!("Read error on {}: {}", self.path, e);
                Err(Error::Io(e))
            }
        }
    }

    fn clear_input(&mut self) -> Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn baud_rate(&self) -> Option<u32> {
        self.port.baud_rate().ok()
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<()> {
        debug!("Switching {} to {} bps", self.path, baud_rate);
        self.port.set_baud_rate(baud_rate)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_port_fails() {
        let result = SerialTransport::open("/dev/ucam-does-not-exist", 921_600);
        assert!(result.is_err());
    }
}
