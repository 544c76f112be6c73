//! Type definitions for ucam

pub mod baud;
pub mod config;
pub mod error;
pub mod format;
pub mod options;

pub use baud::BaudRate;
pub use config::{DeviceConfig, ToneSettings};
pub use error::{Error, Result};
pub use format::{ImageFormat, JpegResolution, RawResolution, Resolution};
pub use options::{LightFrequency, PictureType, ResetKind, SnapshotKind, Tone};
