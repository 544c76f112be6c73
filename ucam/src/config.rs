//! Link timing and transfer configuration

use std::time::Duration;

use ucam_core::constants;

/// Timing and retry bounds of the protocol engine
///
/// Defaults follow the device datasheet; tests shrink them to run against
/// simulated transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Maximum SYNC attempts before giving up
    pub max_sync_tries: u32,

    /// Timeout of the first SYNC attempt
    pub sync_timeout: Duration,

    /// Added to the SYNC timeout after each failed attempt
    pub sync_timeout_step: Duration,

    /// Timeout for one command reply
    pub command_timeout: Duration,

    /// Timeout for each part of an image package
    pub package_timeout: Duration,

    /// Upper bound for package sizes
    pub max_package_size: u16,

    /// Packages carry a 2-byte verify code trailer
    ///
    /// Fielded uCAM-III firmware appends one to every JPEG package; enable
    /// this when talking to real hardware.
    pub verify_code: bool,

    /// How long the reset line is held
    pub reset_pulse: Duration,

    /// Wait after releasing reset before talking to the camera
    pub boot_delay: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_sync_tries: constants::MAX_SYNC_TRIES,
            sync_timeout: Duration::from_millis(constants::SYNC_TIMEOUT_MS),
            sync_timeout_step: Duration::from_millis(constants::SYNC_TIMEOUT_STEP_MS),
            command_timeout: Duration::from_millis(constants::COMMAND_TIMEOUT_MS),
            package_timeout: Duration::from_millis(constants::PACKAGE_TIMEOUT_MS),
            max_package_size: constants::MAX_PACKAGE_SIZE,
            verify_code: false,
            reset_pulse: Duration::from_millis(10),
            boot_delay: Duration::from_millis(100),
        }
    }
}

impl LinkConfig {
    /// Set maximum SYNC attempts
    pub fn with_max_sync_tries(mut self, tries: u32) -> Self {
        self.max_sync_tries = tries;
        self
    }

    /// Set SYNC timeout and its per-attempt increment
    pub fn with_sync_timeout(mut self, timeout: Duration, step: Duration) -> Self {
        self.sync_timeout = timeout;
        self.sync_timeout_step = step;
        self
    }

    /// Set command reply timeout
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set package read timeout
    pub fn with_package_timeout(mut self, timeout: Duration) -> Self {
        self.package_timeout = timeout;
        self
    }

    /// Cap package sizes below the device maximum
    pub fn with_max_package_size(mut self, size: u16) -> Self {
        self.max_package_size = size.min(constants::MAX_PACKAGE_SIZE);
        self
    }

    /// Expect verify code trailers on packages
    pub fn with_verify_code(mut self, enabled: bool) -> Self {
        self.verify_code = enabled;
        self
    }

    /// Set reset pulse width and boot delay
    pub fn with_reset_timing(mut self, pulse: Duration, boot_delay: Duration) -> Self {
        self.reset_pulse = pulse;
        self.boot_delay = boot_delay;
        self
    }
}
