//! # ucam
//!
//! Host-side driver for uCAM-III serial camera modules.
//!
//! ## Features
//!
//! - SYNC handshake with bounded, growing per-attempt timeouts
//! - Command/acknowledgement sessions with device error decoding
//! - JPEG package transfer and raw stream capture into any `io::Write`
//! - Hardware reset through a pluggable reset line
//!
//! The engine is synchronous: every call blocks until the camera answers or
//! its timeout expires.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ucam::{Camera, DeviceConfig, SerialTransport, SnapshotKind};
//!
//! fn main() -> ucam::Result<()> {
//!     let transport = SerialTransport::open("/dev/ttyAMA0", 921_600)?;
//!     let mut camera = Camera::new(transport);
//!
//!     camera.try_init(&DeviceConfig::default())?;
//!
//!     let mut image = Vec::new();
//!     camera.capture(SnapshotKind::Compressed, &mut image)?;
//!     println!("{} bytes", image.len());
//!
//!     Ok(())
//! }
//! ```

pub mod camera;
pub mod capture;
pub mod config;
pub mod error;
pub mod report;
pub mod session;
pub mod sync;

// Re-exports
pub use camera::Camera;
pub use capture::{CaptureController, CaptureSession, TransferSummary};
pub use config::LinkConfig;
pub use error::{Error, Result};
pub use report::{ErrorReporter, NullReporter, TracingReporter};
pub use session::{Ack, CommandSession};
pub use sync::{SyncNegotiator, SyncReport};

pub use ucam_core::{CommandId, DeviceError, LinkState};
pub use ucam_transport::{ResetLine, SerialTransport, Transport};
pub use ucam_types::{
    BaudRate, DeviceConfig, ImageFormat, JpegResolution, LightFrequency, PictureType,
    RawResolution, ResetKind, Resolution, SnapshotKind, Tone, ToneSettings,
};

#[cfg(feature = "rpi")]
pub use ucam_transport::GpioResetLine;

/// Coarse outcome at the outermost boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(_) => Self::Failure,
        }
    }
}
