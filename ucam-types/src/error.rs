use crate::format::{ImageFormat, Resolution};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Resolution {resolution} is not available for format {format}")]
    IncompatibleResolution {
        format: ImageFormat,
        resolution: Resolution,
    },

    #[error("Package size {size} out of range ({min}..={max} bytes)")]
    PackageSizeOutOfRange { size: u16, min: u16, max: u16 },

    #[error("Tone level {0} out of range (0..=4)")]
    ToneOutOfRange(u8),
}
