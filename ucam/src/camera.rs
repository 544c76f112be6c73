//! Camera driver

use std::{io::Write, thread, time::Duration};

use tracing::{debug, info};

use ucam_core::{constants::params, CommandFrame, CommandId, LinkState};
use ucam_transport::{ResetLine, Transport};
use ucam_types::{DeviceConfig, PictureType, ResetKind, SnapshotKind};

use crate::{
    capture::{CaptureController, CaptureSession, TransferSummary},
    config::LinkConfig,
    error::{Error, Result},
    report::{ErrorReporter, TracingReporter},
    sync::SyncReport,
    Status,
};

/// uCAM-III camera
///
/// Owns the transport, the optional reset line and the error reporter.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
///
/// use ucam::{Camera, DeviceConfig, SerialTransport, SnapshotKind, Status};
///
/// fn main() -> ucam::Result<()> {
///     let transport = SerialTransport::open("/dev/ttyAMA0", 921_600)?;
///     let mut camera = Camera::new(transport);
///
///     if camera.init(&DeviceConfig::default()) == Status::Failure {
///         return Ok(());
///     }
///
///     let mut file = File::create("snapshot.jpg").map_err(ucam::Error::Sink)?;
///     let summary = camera.capture(SnapshotKind::Compressed, &mut file)?;
///     println!("{} bytes", summary.bytes);
///     Ok(())
/// }
/// ```
pub struct Camera<T: Transport = Box<dyn Transport>> {
    controller: CaptureController<T>,
    reset_line: Option<Box<dyn ResetLine>>,
    reporter: Box<dyn ErrorReporter>,
}

impl<T: Transport> Camera<T> {
    /// Create a camera with default link timing
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, LinkConfig::default())
    }

    pub fn with_config(transport: T, config: LinkConfig) -> Self {
        Self {
            controller: CaptureController::new(transport, config),
            reset_line: None,
            reporter: Box::new(TracingReporter),
        }
    }

    /// Attach the hardware reset line
    pub fn with_reset_line(mut self, line: impl ResetLine + 'static) -> Self {
        self.reset_line = Some(Box::new(line));
        self
    }

    /// Replace the default `TracingReporter`
    pub fn with_reporter(mut self, reporter: impl ErrorReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn link_state(&self) -> LinkState {
        self.controller.link_state()
    }

    pub fn is_synced(&self) -> bool {
        self.link_state() == LinkState::Synced
    }

    pub fn package_size(&self) -> u16 {
        self.controller.package_size()
    }

    pub fn capture_session(&self) -> Option<&CaptureSession> {
        self.controller.capture()
    }

    pub fn controller(&self) -> &CaptureController<T> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CaptureController<T> {
        &mut self.controller
    }

    /// Pulse the reset line and wait for the camera to boot
    ///
    /// The link must be synchronized again afterwards.
    pub fn hard_reset(&mut self) -> Result<()> {
        let line = self.reset_line.as_mut().ok_or(Error::NoResetLine)?;
        let config = self.controller.config();
        let (pulse, boot_delay) = (config.reset_pulse, config.boot_delay);

        info!("Hard reset");
        line.set_reset(true)?;
        pause(pulse);
        line.set_reset(false)?;
        pause(boot_delay);

        self.controller.device_reset(true);
        Ok(())
    }

    /// RESET command
    ///
    /// `Full` reboots the firmware and forgets the package size;
    /// `StateMachines` keeps the registers. Both require a new SYNC.
    pub fn soft_reset(&mut self, kind: ResetKind, immediate: bool) -> Result<()> {
        let special = if immediate { params::RESET_IMMEDIATE } else { 0x00 };
        let timeout = self.controller.config().command_timeout;

        info!("Soft reset ({:?})", kind);
        self.controller.session_mut().execute(
            CommandFrame::with_params(CommandId::Reset, [kind as u8, 0x00, 0x00, special]),
            timeout,
        )?;

        self.controller.device_reset(kind == ResetKind::Full);
        Ok(())
    }

    /// Synchronize the link
    pub fn sync(&mut self) -> Result<SyncReport> {
        self.controller.synchronize()
    }

    /// Apply a device configuration
    pub fn configure(&mut self, config: &DeviceConfig) -> Result<()> {
        self.controller.configure(config)
    }

    pub fn snapshot(&mut self, kind: SnapshotKind, skipped_frames: u16) -> Result<()> {
        self.controller.snapshot(kind, skipped_frames)
    }

    pub fn get_picture(&mut self, picture: PictureType) -> Result<u32> {
        self.controller.get_picture(picture)
    }

    pub fn transfer_packages<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<TransferSummary> {
        self.controller.transfer_packages(sink)
    }

    /// Take a snapshot and pull it into `sink`
    pub fn capture<W: Write + ?Sized>(
        &mut self,
        kind: SnapshotKind,
        sink: &mut W,
    ) -> Result<TransferSummary> {
        self.controller.snapshot(kind, 0)?;
        let len = self.controller.get_picture(PictureType::Snapshot)?;
        debug!("Capturing {} bytes", len);
        self.controller.transfer_packages(sink)
    }

    /// Reset (when a reset line is attached), synchronize and configure
    pub fn try_init(&mut self, config: &DeviceConfig) -> Result<()> {
        if self.reset_line.is_some() {
            self.hard_reset()?;
        }
        self.sync()?;
        self.configure(config)?;

        info!("Camera ready");
        Ok(())
    }

    /// Like [`try_init`](Self::try_init), reporting failures
    pub fn init(&mut self, config: &DeviceConfig) -> Status {
        match self.try_init(config) {
            Ok(()) => Status::Success,
            Err(e) => {
                self.reporter.report(&e);
                Status::Failure
            }
        }
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.controller.into_transport()
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::{mock, predicate::eq, Sequence};
    use pretty_assertions::assert_eq;
    use ucam_core::DeviceError;
    use ucam_transport::mock::ScriptedTransport;

    mock! {
        pub Reset {}

        impl ResetLine for Reset {
            fn set_reset(&mut self, asserted: bool) -> ucam_transport::Result<()>;
        }
    }

    mock! {
        pub Reporter {}

        impl ErrorReporter for Reporter {
            fn report(&mut self, error: &Error);
        }
    }

    const ACK_SYNC: [u8; 6] = [0xAA, 0x0E, 0x0D, 0x00, 0x00, 0x00];
    const SYNC: [u8; 6] = [0xAA, 0x0D, 0x00, 0x00, 0x00, 0x00];

    fn test_config() -> LinkConfig {
        LinkConfig::default()
            .with_max_sync_tries(3)
            .with_command_timeout(Duration::from_millis(20))
            .with_package_timeout(Duration::from_millis(20))
            .with_reset_timing(Duration::ZERO, Duration::ZERO)
    }

    fn ack(command: CommandId) -> [u8; 6] {
        [0xAA, 0x0E, command as u8, 0x00, 0x00, 0x00]
    }

    fn answer_configure(transport: &ScriptedTransport) {
        for cmd in [
            CommandId::Initial,
            CommandId::SetPackageSize,
            CommandId::Light,
            CommandId::SetTone,
            CommandId::Sleep,
        ] {
            transport.push_bytes(&ack(cmd));
        }
    }

    fn pulse_expected() -> MockReset {
        let mut line = MockReset::new();
        let mut seq = Sequence::new();
        line.expect_set_reset()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        line.expect_set_reset()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        line
    }

    #[test]
    fn test_hard_reset_pulses_line() {
        let transport = ScriptedTransport::new();
        transport.push_bytes(&ACK_SYNC);
        transport.push_bytes(&SYNC);
        let mut camera = Camera::with_config(transport.clone(), test_config())
            .with_reset_line(pulse_expected());
        camera.sync().unwrap();

        camera.hard_reset().unwrap();

        assert_eq!(camera.link_state(), LinkState::Unsynced);
        assert_eq!(camera.package_size(), 64);
    }

    #[test]
    fn test_hard_reset_without_line() {
        let mut camera = Camera::with_config(ScriptedTransport::new(), test_config());
        assert!(matches!(camera.hard_reset(), Err(Error::NoResetLine)));
    }

    #[test]
    fn test_hard_reset_gpio_failure() {
        let mut line = MockReset::new();
        line.expect_set_reset()
            .returning(|_| Err(ucam_transport::Error::ConnectionClosed));
        let mut camera =
            Camera::with_config(ScriptedTransport::new(), test_config()).with_reset_line(line);

        assert!(matches!(
            camera.hard_reset(),
            Err(Error::Transport(ucam_transport::Error::ConnectionClosed))
        ));
    }

    #[test]
    fn test_soft_reset_frames() {
        let transport = ScriptedTransport::new();
        transport.push_bytes(&ACK_SYNC);
        transport.push_bytes(&SYNC);
        transport.push_bytes(&ack(CommandId::Reset));
        let mut camera = Camera::with_config(transport.clone(), test_config());
        camera.sync().unwrap();

        camera.soft_reset(ResetKind::StateMachines, true).unwrap();

        assert_eq!(
            transport.written_frames().last(),
            Some(&[0xAA, 0x08, 0x01, 0x00, 0x00, 0xFF])
        );
        assert!(!camera.is_synced());
    }

    #[test]
    fn test_capture_end_to_end() {
        let transport = ScriptedTransport::new();
        transport.push_bytes(&ACK_SYNC);
        transport.push_bytes(&SYNC);
        answer_configure(&transport);
        let mut camera = Camera::with_config(transport.clone(), test_config())
            .with_reset_line(pulse_expected());

        assert_eq!(camera.init(&DeviceConfig::default()), Status::Success);
        assert_eq!(camera.package_size(), 512);

        let picture: Vec<u8> = (0..700u32).map(|i| i as u8).collect();
        transport.push_bytes(&ack(CommandId::Snapshot));
        transport.push_bytes(&ack(CommandId::GetPicture));
        transport.push_bytes(&[0xAA, 0x0A, 0x01, 0xBC, 0x02, 0x00]);
        for (id, chunk) in picture.chunks(512).enumerate() {
            let mut package = vec![id as u8, 0x00];
            package.extend_from_slice(&(chunk.len() as u16).to_le_bytes());
            package.extend_from_slice(chunk);
            transport.push_bytes(&package);
        }

        let mut sink = Vec::new();
        let summary = camera.capture(SnapshotKind::Compressed, &mut sink).unwrap();

        assert_eq!(summary.bytes, 700);
        assert_eq!(summary.packages, 2);
        assert_eq!(sink, picture);
        assert!(camera.capture_session().is_none());
        assert_eq!(transport.pending(), 0);
    }

    #[test]
    fn test_init_reports_sync_failure() {
        let mut reporter = MockReporter::new();
        reporter
            .expect_report()
            .withf(|e| matches!(e, Error::SyncFailed { attempts: 3 }))
            .times(1)
            .return_const(());
        let mut camera =
            Camera::with_config(ScriptedTransport::new(), test_config()).with_reporter(reporter);

        assert_eq!(camera.init(&DeviceConfig::default()), Status::Failure);
        assert_eq!(camera.link_state(), LinkState::Failed);
    }

    #[test]
    fn test_init_reports_device_error() {
        let transport = ScriptedTransport::new();
        transport.push_bytes(&ACK_SYNC);
        transport.push_bytes(&SYNC);
        transport.push_bytes(&[0xAA, 0x0F, 0x00, 0x00, 0x0B, 0x00]);
        let mut reporter = MockReporter::new();
        reporter
            .expect_report()
            .withf(|e| e.device_error() == Some(DeviceError::Parameter))
            .times(1)
            .return_const(());
        let mut camera = Camera::with_config(transport, test_config()).with_reporter(reporter);

        assert_eq!(camera.init(&DeviceConfig::default()), Status::Failure);
    }

    #[test]
    fn test_boxed_transport() {
        let transport = ScriptedTransport::new();
        let boxed: Box<dyn Transport> = Box::new(transport.clone());
        let camera: Camera = Camera::with_config(boxed, test_config());

        assert_eq!(camera.link_state(), LinkState::Unsynced);
        assert_eq!(camera.into_transport().describe(), "scripted");
    }
}
