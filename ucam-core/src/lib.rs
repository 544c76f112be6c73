//! # ucam-core
//!
//! Core protocol implementation for uCAM-III serial camera modules.
//!
//! This crate provides the low-level protocol primitives:
//! - 6-byte frame encoding/decoding
//! - Image package header and verify code
//! - Command identifiers and device error codes
//! - Link synchronization state
//! - Protocol constants

pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod link;
pub mod nak;
pub mod package;

pub use command::CommandId;
pub use error::{Error, Result};
pub use frame::{CommandFrame, ResponseFrame};
pub use link::{Link, LinkState};
pub use nak::DeviceError;
pub use package::PackageHeader;

/// Frame size on the wire
pub const FRAME_LEN: usize = constants::FRAME_LEN;
