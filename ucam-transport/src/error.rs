//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Read timeout")]
    ReadTimeout,

    #[error("Incomplete read: expected {expected} bytes, got {received}")]
    Incomplete { expected: usize, received: usize },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[cfg(feature = "rpi")]
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}

impl Error {
    /// No (complete) answer arrived within the timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ReadTimeout | Self::Incomplete { .. })
    }
}
