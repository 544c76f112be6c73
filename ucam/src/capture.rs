//! Configuration, snapshot and image retrieval
//!
//! JPEG pictures arrive as numbered packages:
//!
//! ```text
//! host                              camera
//!  │ ── GET_PICTURE ────────────────▶ │
//!  │ ◀──────────────── ACK(GET_PIC) ─ │
//!  │ ◀──────────── DATA(type, len) ── │
//!  │ ── ACK(package 0) ─────────────▶ │
//!  │ ◀──────── [id][len][payload] ─── │
//!  │ ── ACK(package 1) ─────────────▶ │   requesting k+1 acknowledges k
//!  │            ...                   │
//!  │ ── ACK(0xF0F0) ────────────────▶ │   end of transfer
//! ```
//!
//! Raw pictures arrive as one unpackaged stream of the announced length.

use std::io::Write;

use bytes::BytesMut;
use tracing::{debug, info, trace, warn};

use ucam_core::{
    constants::{self, params},
    package, CommandFrame, CommandId, LinkState, PackageHeader,
};
use ucam_transport::Transport;
use ucam_types::{
    BaudRate, DeviceConfig, ImageFormat, LightFrequency, PictureType, Resolution, SnapshotKind,
    ToneSettings,
};

use crate::{
    config::LinkConfig,
    error::{Error, Result},
    session::{Ack, CommandSession},
    sync::{SyncNegotiator, SyncReport},
};

/// State of one snapshot-to-completion cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSession {
    pub kind: SnapshotKind,

    /// Announced by the DATA frame after GET_PICTURE
    pub total_len: Option<u32>,

    pub packages_received: u32,
    pub bytes_written: u32,
}

impl CaptureSession {
    fn new(kind: SnapshotKind) -> Self {
        Self {
            kind,
            total_len: None,
            packages_received: 0,
            bytes_written: 0,
        }
    }
}

/// Result of a completed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    pub kind: SnapshotKind,
    pub packages: u32,
    pub bytes: u32,
}

/// Drives configuration, snapshots and package retrieval
pub struct CaptureController<T> {
    session: CommandSession<T>,
    config: LinkConfig,
    package_size: u16,

    /// Format and resolution acknowledged by INITIAL
    image: Option<(ImageFormat, Resolution)>,

    capture: Option<CaptureSession>,
    buf: BytesMut,
}

impl<T: Transport> CaptureController<T> {
    pub fn new(transport: T, config: LinkConfig) -> Self {
        let buf = BytesMut::with_capacity(config.max_package_size as usize);
        Self {
            session: CommandSession::new(transport, config.command_timeout),
            config,
            package_size: constants::DEFAULT_PACKAGE_SIZE,
            image: None,
            capture: None,
            buf,
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn session(&self) -> &CommandSession<T> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut CommandSession<T> {
        &mut self.session
    }

    pub fn link_state(&self) -> LinkState {
        self.session.link_state()
    }

    /// Package size currently configured on the device
    pub fn package_size(&self) -> u16 {
        self.package_size
    }

    /// Active capture session, if any
    pub fn capture(&self) -> Option<&CaptureSession> {
        self.capture.as_ref()
    }

    /// Run the SYNC handshake with the configured bounds
    pub fn synchronize(&mut self) -> Result<SyncReport> {
        let negotiator = SyncNegotiator::from_config(&self.config);
        self.session.synchronize(&negotiator)
    }

    /// Apply a full device configuration
    ///
    /// Commands are issued in order and the first failure aborts the
    /// sequence. Settings acknowledged before the failure stay applied.
    pub fn configure(&mut self, device: &DeviceConfig) -> Result<()> {
        self.ensure_idle()?;
        device.validate()?;

        self.initial(device.format, device.resolution)?;
        self.set_package_size(device.package_size)?;

        if let Some(rate) = device.baud_rate {
            if self.session.transport().baud_rate() != Some(rate.bps()) {
                self.set_baud_rate(rate)?;
            }
        }

        self.set_light_frequency(device.light_frequency)?;
        self.set_tone(device.tone)?;
        self.set_sleep_timeout(device.sleep_timeout)?;

        info!("Configured {}", device);
        Ok(())
    }

    /// INITIAL: select image format and resolution
    pub fn initial(&mut self, format: ImageFormat, resolution: Resolution) -> Result<()> {
        let (raw, jpeg) = match resolution {
            Resolution::Raw(_) => (resolution.code(), params::RESOLUTION_FILLER),
            Resolution::Jpeg(_) => (params::RESOLUTION_FILLER, resolution.code()),
        };
        self.command(CommandFrame::with_params(
            CommandId::Initial,
            [0x00, format.code(), raw, jpeg],
        ))?;

        self.image = Some((format, resolution));
        Ok(())
    }

    /// SET_PACKAGE_SIZE
    ///
    /// Refused while a capture session is active.
    pub fn set_package_size(&mut self, size: u16) -> Result<()> {
        self.ensure_idle()?;

        let max = self.config.max_package_size;
        if !(constants::MIN_PACKAGE_SIZE..=max).contains(&size) {
            return Err(ucam_types::Error::PackageSizeOutOfRange {
                size,
                min: constants::MIN_PACKAGE_SIZE,
                max,
            }
            .into());
        }

        let [lo, hi] = size.to_le_bytes();
        self.command(CommandFrame::with_params(
            CommandId::SetPackageSize,
            [params::PACKAGE_SIZE_SELECTOR, lo, hi, 0x00],
        ))?;

        self.package_size = size;
        debug!("Package size set to {} bytes", size);
        Ok(())
    }

    /// SET_BAUD_RATE, then switch the local side
    pub fn set_baud_rate(&mut self, rate: BaudRate) -> Result<()> {
        let (first, second) = rate.dividers();
        self.command(CommandFrame::with_params(
            CommandId::SetBaudRate,
            [first, second, 0x00, 0x00],
        ))?;

        self.session.transport_mut().set_baud_rate(rate.bps())?;
        info!("Link speed switched to {}", rate);
        Ok(())
    }

    /// LIGHT: flicker compensation
    pub fn set_light_frequency(&mut self, freq: LightFrequency) -> Result<()> {
        self.command(CommandFrame::with_params(
            CommandId::Light,
            [freq as u8, 0x00, 0x00, 0x00],
        ))?;
        Ok(())
    }

    /// SET_TONE: contrast, brightness, exposure
    pub fn set_tone(&mut self, tone: ToneSettings) -> Result<()> {
        self.command(CommandFrame::with_params(
            CommandId::SetTone,
            [
                tone.contrast.code(),
                tone.brightness.code(),
                tone.exposure.code(),
                0x00,
            ],
        ))?;
        Ok(())
    }

    /// SLEEP: inactivity timeout in seconds
    pub fn set_sleep_timeout(&mut self, seconds: u8) -> Result<()> {
        self.command(CommandFrame::with_params(
            CommandId::Sleep,
            [seconds, 0x00, 0x00, 0x00],
        ))?;
        Ok(())
    }

    /// SNAPSHOT: freeze a picture and start a capture session
    ///
    /// A session left over from an abandoned capture is replaced.
    pub fn snapshot(&mut self, kind: SnapshotKind, skipped_frames: u16) -> Result<()> {
        let [lo, hi] = skipped_frames.to_le_bytes();
        self.command(CommandFrame::with_params(
            CommandId::Snapshot,
            [kind as u8, lo, hi, 0x00],
        ))?;

        if let Some(old) = self.capture.replace(CaptureSession::new(kind)) {
            warn!("Abandoned capture session replaced ({} bytes written)", old.bytes_written);
        }
        debug!("Snapshot taken ({:?})", kind);
        Ok(())
    }

    /// GET_PICTURE: returns the image length announced by the device
    pub fn get_picture(&mut self, picture: PictureType) -> Result<u32> {
        let kind = match (picture.direct_kind(), &self.capture) {
            (Some(kind), _) => kind,
            (None, Some(capture)) => capture.kind,
            (None, None) => return Err(Error::NoCaptureSession),
        };

        self.command(CommandFrame::with_params(
            CommandId::GetPicture,
            [picture as u8, 0x00, 0x00, 0x00],
        ))?;

        let timeout = self.config.command_timeout;
        let data = match self.session.receive_frame(timeout) {
            Ok(frame) => frame,
            Err(e) if e.is_timeout() => {
                return Err(Error::CommandTimeout {
                    command: CommandId::GetPicture,
                });
            }
            Err(e) => return Err(e),
        };
        if !data.is(CommandId::Data) || data.data_kind() != picture as u8 {
            return Err(Error::UnexpectedReply {
                command: CommandId::GetPicture,
                frame: data,
            });
        }

        let total_len = data.data_length();
        if kind == SnapshotKind::Uncompressed {
            let expected = self
                .image
                .and_then(|(format, resolution)| resolution.raw_image_len(format));
            if let Some(expected) = expected.filter(|&expected| expected != total_len) {
                return Err(Error::ImageLengthMismatch {
                    expected,
                    announced: total_len,
                });
            }
        }
        let capture = match picture.direct_kind() {
            Some(_) => self.capture.insert(CaptureSession::new(kind)),
            None => self.capture.get_or_insert_with(|| CaptureSession::new(kind)),
        };
        capture.total_len = Some(total_len);

        debug!("Picture ready: {} bytes ({:?})", total_len, kind);
        Ok(total_len)
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.session.into_transport()
    }

    /// Pull the announced image into `sink`
    ///
    /// The capture session ends whether or not the transfer succeeds. After
    /// an error the sink holds a partial image that must be discarded.
    pub fn transfer_packages<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<TransferSummary> {
        let mut capture = self.capture.take().ok_or(Error::NoCaptureSession)?;
        let Some(total) = capture.total_len else {
            self.capture = Some(capture);
            return Err(Error::PictureLengthUnknown);
        };

        let result = match capture.kind {
            SnapshotKind::Compressed => self.transfer_jpeg(&mut capture, total, sink),
            SnapshotKind::Uncompressed => self.transfer_raw(&mut capture, total, sink),
        };

        match result {
            Ok(()) => {
                info!(
                    "Transfer complete: {} bytes in {} package(s)",
                    capture.bytes_written, capture.packages_received
                );
                Ok(TransferSummary {
                    kind: capture.kind,
                    packages: capture.packages_received,
                    bytes: capture.bytes_written,
                })
            }
            Err(e) => {
                warn!(
                    "Transfer aborted after {} of {} bytes: {}",
                    capture.bytes_written, total, e
                );
                Err(e)
            }
        }
    }

    /// Drop the active capture session without transferring
    pub fn abort_capture(&mut self) -> Option<CaptureSession> {
        self.capture.take()
    }

    /// Forget device-side state after a reset
    ///
    /// A full reset also restores the power-up package size and image
    /// settings.
    pub fn device_reset(&mut self, full: bool) {
        self.capture = None;
        self.session.desync();
        if full {
            self.package_size = constants::DEFAULT_PACKAGE_SIZE;
            self.image = None;
        }
    }

    fn transfer_jpeg<W: Write + ?Sized>(
        &mut self,
        capture: &mut CaptureSession,
        total: u32,
        sink: &mut W,
    ) -> Result<()> {
        let trailer = if self.config.verify_code {
            constants::VERIFY_CODE_LEN
        } else {
            0
        };
        let overhead = if self.config.verify_code {
            (constants::PACKAGE_HEADER_LEN + constants::VERIFY_CODE_LEN) as u16
        } else {
            0
        };
        let capacity = u32::from(self.package_size - overhead);
        let timeout = self.config.package_timeout;
        let mut id: u16 = 0;

        while capture.bytes_written < total {
            let remaining = total - capture.bytes_written;
            let expected_len = remaining.min(capacity) as u16;

            self.session.send(CommandFrame::package_ack(id))?;

            let mut head = [0u8; constants::PACKAGE_HEADER_LEN];
            read_part(&mut self.session, &mut head, timeout, id, capture)?;
            let header = PackageHeader::decode(&head)?;

            if header.is_end_marker() {
                return Err(Error::TruncatedImage {
                    expected: total,
                    received: capture.bytes_written,
                });
            }
            if header.id != id || header.len != expected_len {
                return Err(Error::TransferPackageNumber {
                    expected_id: id,
                    expected_len,
                    id: header.id,
                    len: header.len,
                });
            }

            let len = header.len as usize;
            self.buf.clear();
            self.buf.resize(len + trailer, 0);
            read_part(&mut self.session, &mut self.buf[..], timeout, id, capture)?;

            if trailer > 0 && !package::verify(&header, &self.buf[..len], &self.buf[len..]) {
                return Err(Error::PackageVerify { package_id: id });
            }

            sink.write_all(&self.buf[..len]).map_err(Error::Sink)?;
            capture.packages_received += 1;
            capture.bytes_written += u32::from(header.len);

            trace!(
                package = id,
                len,
                written = capture.bytes_written,
                total,
                "Package received"
            );
            id = id.wrapping_add(1);
        }

        self.session
            .send(CommandFrame::package_ack(constants::END_OF_TRANSFER_ID))?;
        Ok(())
    }

    fn transfer_raw<W: Write + ?Sized>(
        &mut self,
        capture: &mut CaptureSession,
        total: u32,
        sink: &mut W,
    ) -> Result<()> {
        let chunk = u32::from(self.config.max_package_size);
        let timeout = self.config.package_timeout;

        while capture.bytes_written < total {
            let len = (total - capture.bytes_written).min(chunk) as usize;
            let part = capture.packages_received as u16;

            self.buf.clear();
            self.buf.resize(len, 0);
            read_part(&mut self.session, &mut self.buf[..], timeout, part, capture)?;

            sink.write_all(&self.buf[..]).map_err(Error::Sink)?;
            capture.packages_received += 1;
            capture.bytes_written += len as u32;
        }

        self.session.send(CommandFrame::with_params(
            CommandId::Ack,
            [
                CommandId::Data.into(),
                0x00,
                params::RAW_TRANSFER_DONE,
                0x00,
            ],
        ))?;
        Ok(())
    }

    fn command(&mut self, frame: CommandFrame) -> Result<Ack> {
        let timeout = self.config.command_timeout;
        self.session.execute(frame, timeout)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.capture.is_some() {
            return Err(Error::CaptureInProgress);
        }
        Ok(())
    }
}

/// Read one part of a package, mapping timeouts to `SendPictureTimeout`
fn read_part<T: Transport>(
    session: &mut CommandSession<T>,
    buf: &mut [u8],
    timeout: std::time::Duration,
    package_id: u16,
    capture: &CaptureSession,
) -> Result<()> {
    match session.receive_raw(buf, timeout) {
        Err(e) if e.is_timeout() => Err(Error::SendPictureTimeout {
            package_id,
            bytes_written: capture.bytes_written,
        }),
        other => other,
    }
}
