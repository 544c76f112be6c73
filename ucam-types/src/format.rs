//! Image formats and resolutions

use std::fmt;

/// Image format selected with INITIAL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ImageFormat {
    /// 8-bit gray scale (Y only)
    RawGray8 = 0x03,
    /// 16-bit colour, CrYCbY
    RawCrYCbY16 = 0x08,
    /// 16-bit colour, RGB 565
    RawRgb16 = 0x06,
    Jpeg = 0x07,
}

impl ImageFormat {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_raw(self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    /// Bytes per pixel of an uncompressed picture
    pub fn bytes_per_pixel(self) -> Option<u32> {
        match self {
            Self::RawGray8 => Some(1),
            Self::RawCrYCbY16 | Self::RawRgb16 => Some(2),
            Self::Jpeg => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RawGray8 => "raw-gray8",
            Self::RawCrYCbY16 => "raw-crycby16",
            Self::RawRgb16 => "raw-rgb16",
            Self::Jpeg => "jpeg",
        };
        f.write_str(name)
    }
}

/// Resolutions available to raw formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RawResolution {
    R80x60 = 0x01,
    R160x120 = 0x03,
    R128x128 = 0x09,
    R128x96 = 0x0B,
}

impl RawResolution {
    /// Width and height in pixels
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::R80x60 => (80, 60),
            Self::R160x120 => (160, 120),
            Self::R128x128 => (128, 128),
            Self::R128x96 => (128, 96),
        }
    }
}

/// Resolutions available to JPEG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum JpegResolution {
    R160x128 = 0x03,
    R320x240 = 0x05,
    R640x480 = 0x07,
}

impl JpegResolution {
    /// Width and height in pixels
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::R160x128 => (160, 128),
            Self::R320x240 => (320, 240),
            Self::R640x480 => (640, 480),
        }
    }
}

/// Format-specific resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Raw(RawResolution),
    Jpeg(JpegResolution),
}

impl Resolution {
    pub fn code(self) -> u8 {
        match self {
            Self::Raw(res) => res as u8,
            Self::Jpeg(res) => res as u8,
        }
    }

    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Raw(res) => res.dimensions(),
            Self::Jpeg(res) => res.dimensions(),
        }
    }

    /// Check that this resolution belongs to the family of `format`
    pub fn is_compatible_with(self, format: ImageFormat) -> bool {
        match self {
            Self::Raw(_) => format.is_raw(),
            Self::Jpeg(_) => !format.is_raw(),
        }
    }

    /// Uncompressed picture size in bytes, if `format` is raw
    pub fn raw_image_len(self, format: ImageFormat) -> Option<u32> {
        let (w, h) = self.dimensions();
        format.bytes_per_pixel().map(|bpp| w * h * bpp)
    }
}

impl From<RawResolution> for Resolution {
    fn from(res: RawResolution) -> Self {
        Self::Raw(res)
    }
}

impl From<JpegResolution> for Resolution {
    fn from(res: JpegResolution) -> Self {
        Self::Jpeg(res)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "{}x{}", w, h)
    }
}
