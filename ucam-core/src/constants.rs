//! Protocol constants

/// First byte of every command and response frame
pub const FRAME_PREFIX: u8 = 0xAA;

/// Number of bytes in one command frame
pub const FRAME_LEN: usize = 6;

/// Package header size (id + length, little-endian)
pub const PACKAGE_HEADER_LEN: usize = 4;

/// Verify code trailer appended to JPEG packages by the fielded firmware
pub const VERIFY_CODE_LEN: usize = 2;

/// Largest package the device can be configured for (bytes)
pub const MAX_PACKAGE_SIZE: u16 = 512;

/// Smallest package the device accepts (bytes)
pub const MIN_PACKAGE_SIZE: u16 = 64;

/// Package size after power-up or full reset (bytes)
pub const DEFAULT_PACKAGE_SIZE: u16 = 64;

/// Package id the host sends to close a JPEG transfer
pub const END_OF_TRANSFER_ID: u16 = 0xF0F0;

/// Maximum number of SYNC attempts during synchronization
pub const MAX_SYNC_TRIES: u32 = 60;

/// Initial per-attempt SYNC timeout (milliseconds)
pub const SYNC_TIMEOUT_MS: u64 = 5;

/// Per-attempt SYNC timeout increment (milliseconds)
pub const SYNC_TIMEOUT_STEP_MS: u64 = 1;

/// Default command response timeout (milliseconds)
pub const COMMAND_TIMEOUT_MS: u64 = 500;

/// Default timeout for each package read (milliseconds)
pub const PACKAGE_TIMEOUT_MS: u64 = 500;

/// Parameter bytes with fixed meaning
pub mod params {
    /// SET_PACKAGE_SIZE first parameter
    pub const PACKAGE_SIZE_SELECTOR: u8 = 0x08;

    /// RESET fourth parameter requesting an immediate reset
    pub const RESET_IMMEDIATE: u8 = 0xFF;

    /// INITIAL filler for the unused resolution slot
    pub const RESOLUTION_FILLER: u8 = 0x07;

    /// Third ACK parameter closing an uncompressed transfer
    pub const RAW_TRANSFER_DONE: u8 = 0x01;
}
