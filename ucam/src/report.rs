//! Error reporting at the driver boundary

use tracing::{error, warn};

use crate::error::Error;

/// Consumer of errors that reach the outermost boundary
///
/// The protocol engine only returns errors. The driver hands them to a
/// reporter when it collapses a result into a [`Status`](crate::Status).
pub trait ErrorReporter: Send {
    fn report(&mut self, error: &Error);
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for Box<R> {
    fn report(&mut self, error: &Error) {
        (**self).report(error)
    }
}

/// Logs reported errors through `tracing`
///
/// Device NAKs are logged with their numeric code.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&mut self, error: &Error) {
        match error.device_error() {
            Some(device) => error!(code = device.code(), label = device.label(), "{}", error),
            None if error.is_recoverable() => warn!("{}", error),
            None => error!("{}", error),
        }
    }
}

/// Drops every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ErrorReporter for NullReporter {
    fn report(&mut self, _error: &Error) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucam_core::{CommandId, DeviceError};

    #[test]
    fn test_boxed_reporters() {
        let mut reporters: Vec<Box<dyn ErrorReporter>> =
            vec![Box::new(TracingReporter), Box::new(NullReporter)];
        let err = Error::Device {
            command: CommandId::Snapshot,
            error: DeviceError::PictureNotReady,
        };

        for reporter in reporters.iter_mut() {
            reporter.report(&err);
        }
    }
}
