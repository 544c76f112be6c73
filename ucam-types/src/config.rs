//! Device configuration applied before capture

use std::fmt;

use ucam_core::constants;

use crate::{
    baud::BaudRate,
    error::{Error, Result},
    format::{ImageFormat, JpegResolution, Resolution},
    options::{LightFrequency, Tone},
};

/// Contrast, brightness and exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToneSettings {
    pub contrast: Tone,
    pub brightness: Tone,
    pub exposure: Tone,
}

/// Camera configuration
///
/// # Examples
///
/// ```
/// use ucam_types::{DeviceConfig, ImageFormat, JpegResolution};
///
/// let config = DeviceConfig::new(ImageFormat::Jpeg, JpegResolution::R640x480.into())
///     .with_package_size(512);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub format: ImageFormat,
    pub resolution: Resolution,

    /// Package size in bytes (64..=512)
    pub package_size: u16,

    /// New link speed; `None` keeps the current one
    pub baud_rate: Option<BaudRate>,

    pub light_frequency: LightFrequency,
    pub tone: ToneSettings,

    /// Seconds of inactivity before the camera sleeps
    pub sleep_timeout: u8,
}

impl DeviceConfig {
    /// Smallest package size the device accepts
    pub const MIN_PACKAGE_SIZE: u16 = constants::MIN_PACKAGE_SIZE;

    /// Largest package size the device accepts
    pub const MAX_PACKAGE_SIZE: u16 = constants::MAX_PACKAGE_SIZE;

    /// Sleep timeout after power-up (seconds)
    pub const DEFAULT_SLEEP_TIMEOUT: u8 = 15;

    pub fn new(format: ImageFormat, resolution: Resolution) -> Self {
        Self {
            format,
            resolution,
            package_size: Self::MAX_PACKAGE_SIZE,
            baud_rate: None,
            light_frequency: LightFrequency::default(),
            tone: ToneSettings::default(),
            sleep_timeout: Self::DEFAULT_SLEEP_TIMEOUT,
        }
    }

    pub fn with_package_size(mut self, size: u16) -> Self {
        self.package_size = size;
        self
    }

    pub fn with_baud_rate(mut self, rate: BaudRate) -> Self {
        self.baud_rate = Some(rate);
        self
    }

    pub fn with_light_frequency(mut self, freq: LightFrequency) -> Self {
        self.light_frequency = freq;
        self
    }

    pub fn with_tone(mut self, tone: ToneSettings) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_sleep_timeout(mut self, seconds: u8) -> Self {
        self.sleep_timeout = seconds;
        self
    }

    /// Check format/resolution consistency and package size range
    pub fn validate(&self) -> Result<()> {
        if !self.resolution.is_compatible_with(self.format) {
            return Err(Error::IncompatibleResolution {
                format: self.format,
                resolution: self.resolution,
            });
        }

        if !(Self::MIN_PACKAGE_SIZE..=Self::MAX_PACKAGE_SIZE).contains(&self.package_size) {
            return Err(Error::PackageSizeOutOfRange {
                size: self.package_size,
                min: Self::MIN_PACKAGE_SIZE,
                max: Self::MAX_PACKAGE_SIZE,
            });
        }

        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new(ImageFormat::Jpeg, JpegResolution::R640x480.into())
    }
}

impl fmt::Display for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config[{} {}, package={}B]",
            self.format, self.resolution, self.package_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::RawResolution;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = DeviceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.package_size, 512);
        assert_eq!(config.sleep_timeout, 15);
        assert_eq!(config.baud_rate, None);
    }

    #[test]
    fn test_incompatible_resolution() {
        let config = DeviceConfig::new(ImageFormat::Jpeg, RawResolution::R80x60.into());
        assert_eq!(
            config.validate(),
            Err(Error::IncompatibleResolution {
                format: ImageFormat::Jpeg,
                resolution: Resolution::Raw(RawResolution::R80x60),
            })
        );
    }

    #[test]
    fn test_package_size_bounds() {
        let base = DeviceConfig::default();

        assert!(base.clone().with_package_size(64).validate().is_ok());
        assert!(base.clone().with_package_size(512).validate().is_ok());
        assert!(matches!(
            base.clone().with_package_size(513).validate(),
            Err(Error::PackageSizeOutOfRange { size: 513, .. })
        ));
        assert!(matches!(
            base.with_package_size(32).validate(),
            Err(Error::PackageSizeOutOfRange { size: 32, .. })
        ));
    }

    #[test]
    fn test_package_size_limits_follow_protocol() {
        assert_eq!(DeviceConfig::MIN_PACKAGE_SIZE, constants::MIN_PACKAGE_SIZE);
        assert_eq!(DeviceConfig::MAX_PACKAGE_SIZE, constants::MAX_PACKAGE_SIZE);
        assert_eq!(
            DeviceConfig::default().with_package_size(constants::MAX_PACKAGE_SIZE + 1).validate(),
            Err(Error::PackageSizeOutOfRange {
                size: constants::MAX_PACKAGE_SIZE + 1,
                min: constants::MIN_PACKAGE_SIZE,
                max: constants::MAX_PACKAGE_SIZE,
            })
        );
    }

    #[test]
    fn test_builder() {
        let tone = ToneSettings {
            contrast: Tone::High,
            brightness: Tone::Low,
            exposure: Tone::Normal,
        };
        let config = DeviceConfig::new(ImageFormat::RawGray8, RawResolution::R160x120.into())
            .with_baud_rate(BaudRate::B115200)
            .with_light_frequency(LightFrequency::Hz60)
            .with_tone(tone)
            .with_sleep_timeout(0);

        assert_eq!(config.baud_rate, Some(BaudRate::B115200));
        assert_eq!(config.light_frequency, LightFrequency::Hz60);
        assert_eq!(config.tone, tone);
        assert_eq!(config.sleep_timeout, 0);
        assert!(config.validate().is_ok());
    }
}
