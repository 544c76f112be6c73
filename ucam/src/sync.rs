//! Link synchronization handshake
//!
//! ```text
//! host                    camera
//!  │ ── SYNC ──────────────▶ │   repeated until answered
//!  │ ◀────────── ACK(SYNC) ─ │
//!  │ ◀────────────── SYNC ── │
//!  │ ── ACK(SYNC) ─────────▶ │   link SYNCED
//! ```
//!
//! The link may come up in the middle of stale data or a half-finished
//! exchange, so every failed attempt drains the input and starts over.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use ucam_core::{frame, CommandFrame, CommandId, Link, ResponseFrame, FRAME_LEN};
use ucam_transport::Transport;

use crate::{
    config::LinkConfig,
    error::{Error, Result},
};

/// Outcome of a successful negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// SYNC attempts used, including the successful one
    pub attempts: u32,
}

/// Why an attempt was dropped
#[derive(Debug)]
enum Dropped {
    Timeout,
    Malformed(ucam_core::Error),
    Mismatch(ResponseFrame),
}

/// Drives the SYNC handshake state machine
#[derive(Debug, Clone)]
pub struct SyncNegotiator {
    max_tries: u32,
    timeout: Duration,
    step: Duration,
}

impl SyncNegotiator {
    pub fn new(max_tries: u32, timeout: Duration, step: Duration) -> Self {
        Self {
            max_tries,
            timeout,
            step,
        }
    }

    pub fn from_config(config: &LinkConfig) -> Self {
        Self::new(
            config.max_sync_tries,
            config.sync_timeout,
            config.sync_timeout_step,
        )
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// Timeout of the given attempt (1-based); grows by one step per attempt
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        self.timeout + self.step * attempt.saturating_sub(1)
    }

    /// Run the handshake
    ///
    /// # Errors
    ///
    /// - `SyncFailed` when every attempt was dropped; the link is `Failed`
    /// - transport errors other than timeouts; the link is `Failed`
    pub fn negotiate<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        link: &mut Link,
    ) -> Result<SyncReport> {
        link.begin_sync()?;

        debug!("Synchronizing with {} (max {} tries)...", transport.describe(), self.max_tries);

        for attempt in 1..=self.max_tries {
            link.record_attempt();
            match self.attempt(transport, self.timeout_for(attempt)) {
                Ok(Ok(())) => {
                    link.mark_synced()?;
                    info!("Synchronized after {} attempt(s)", attempt);
                    return Ok(SyncReport { attempts: attempt });
                }
                Ok(Err(reason)) => {
                    trace!(attempt, ?reason, "SYNC attempt dropped");
                    if !matches!(reason, Dropped::Timeout) {
                        transport.clear_input().map_err(|e| self.fail(link, e.into()))?;
                    }
                }
                Err(e) => return Err(self.fail(link, e)),
            }
        }

        warn!("Synchronization failed after {} attempts", self.max_tries);
        link.mark_failed()?;
        Err(Error::SyncFailed {
            attempts: self.max_tries,
        })
    }

    /// One SYNC exchange
    ///
    /// The outer `Result` carries fatal transport errors, the inner one
    /// dropped attempts.
    fn attempt<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        timeout: Duration,
    ) -> Result<std::result::Result<(), Dropped>> {
        transport.send(&CommandFrame::sync().encode())?;

        let ack = match read_frame(transport, timeout)? {
            Ok(frame) => frame,
            Err(reason) => return Ok(Err(reason)),
        };
        if !(ack.is(CommandId::Ack) && ack.acked_command() == u8::from(CommandId::Sync)) {
            return Ok(Err(Dropped::Mismatch(ack)));
        }

        let sync = match read_frame(transport, timeout)? {
            Ok(frame) => frame,
            Err(reason) => return Ok(Err(reason)),
        };
        if !sync.is(CommandId::Sync) {
            return Ok(Err(Dropped::Mismatch(sync)));
        }

        transport.send(&CommandFrame::ack(CommandId::Sync, 0, 0).encode())?;
        Ok(Ok(()))
    }

    fn fail(&self, link: &mut Link, error: Error) -> Error {
        if let Err(e) = link.mark_failed() {
            trace!("Link not marked failed: {}", e);
        }
        error
    }
}

impl Default for SyncNegotiator {
    fn default() -> Self {
        Self::from_config(&LinkConfig::default())
    }
}

fn read_frame<T: Transport + ?Sized>(
    transport: &mut T,
    timeout: Duration,
) -> Result<std::result::Result<ResponseFrame, Dropped>> {
    let mut buf = [0u8; FRAME_LEN];
    match transport.receive_exact(&mut buf, timeout) {
        Ok(()) => Ok(frame::decode(&buf).map_err(Dropped::Malformed)),
        Err(e) if e.is_timeout() => Ok(Err(Dropped::Timeout)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ucam_core::LinkState;
    use ucam_transport::mock::ScriptedTransport;

    const ACK_SYNC: [u8; 6] = [0xAA, 0x0E, 0x0D, 0x00, 0x00, 0x00];
    const SYNC: [u8; 6] = [0xAA, 0x0D, 0x00, 0x00, 0x00, 0x00];

    fn negotiator(max_tries: u32) -> SyncNegotiator {
        SyncNegotiator::new(max_tries, Duration::from_millis(5), Duration::from_millis(1))
    }

    fn answer_sync(transport: &ScriptedTransport) {
        transport.push_bytes(&ACK_SYNC);
        transport.push_bytes(&SYNC);
    }

    #[test]
    fn test_attempt_timeout_grows() {
        let negotiator = SyncNegotiator::default();
        assert_eq!(negotiator.timeout_for(1), Duration::from_millis(5));
        assert_eq!(negotiator.timeout_for(3), Duration::from_millis(7));
    }

    #[test]
    fn test_sync_first_attempt() {
        let transport = ScriptedTransport::new();
        answer_sync(&transport);
        let mut link = Link::new();

        let report = negotiator(60)
            .negotiate(&mut transport.clone(), &mut link)
            .unwrap();

        assert_eq!(report.attempts, 1);
        assert_eq!(link.state(), LinkState::Synced);
        assert_eq!(transport.written_frames(), vec![SYNC, ACK_SYNC]);
    }

    #[test]
    fn test_sync_second_attempt_after_timeout() {
        let transport = ScriptedTransport::new();
        transport.push_timeout();
        answer_sync(&transport);
        let mut link = Link::new();

        let report = negotiator(60)
            .negotiate(&mut transport.clone(), &mut link)
            .unwrap();

        assert_eq!(report.attempts, 2);
        assert_eq!(link.attempts(), 2);
        assert_eq!(link.state(), LinkState::Synced);
        assert_eq!(transport.written_frames(), vec![SYNC, SYNC, ACK_SYNC]);
    }

    #[test]
    fn test_sync_succeeds_on_every_attempt_up_to_max() {
        let max = 8;
        for n in 1..=max {
            let transport = ScriptedTransport::new();
            for _ in 1..n {
                transport.push_timeout();
            }
            answer_sync(&transport);
            let mut link = Link::new();

            let report = negotiator(max)
                .negotiate(&mut transport.clone(), &mut link)
                .unwrap();

            assert_eq!(report.attempts, n);
            assert!(link.is_synced());
        }
    }

    #[test]
    fn test_sync_exhausted() {
        let transport = ScriptedTransport::new();
        for _ in 0..5 {
            transport.push_timeout();
        }
        // Answer arrives one attempt too late
        answer_sync(&transport);
        let mut link = Link::new();

        let result = negotiator(5).negotiate(&mut transport.clone(), &mut link);

        assert!(matches!(result, Err(Error::SyncFailed { attempts: 5 })));
        assert_eq!(link.state(), LinkState::Failed);
        assert_eq!(link.attempts(), 5);
    }

    #[test]
    fn test_sync_drops_garbage_and_drains() {
        let transport = ScriptedTransport::new();
        transport.push_bytes(&[0x55, 0x0E, 0x0D, 0x00, 0x00, 0x00]);
        answer_sync(&transport);
        let mut link = Link::new();

        let report = negotiator(60)
            .negotiate(&mut transport.clone(), &mut link)
            .unwrap();

        assert_eq!(report.attempts, 2);
        assert_eq!(transport.clears(), 1);
    }

    #[test]
    fn test_sync_drops_ack_for_other_command() {
        let transport = ScriptedTransport::new();
        transport.push_bytes(&[0xAA, 0x0E, 0x05, 0x00, 0x00, 0x00]);
        answer_sync(&transport);
        let mut link = Link::new();

        let report = negotiator(60)
            .negotiate(&mut transport.clone(), &mut link)
            .unwrap();

        assert_eq!(report.attempts, 2);
    }

    #[test]
    fn test_sync_drops_attempt_missing_device_sync() {
        let transport = ScriptedTransport::new();
        transport.push_bytes(&ACK_SYNC);
        transport.push_timeout();
        answer_sync(&transport);
        let mut link = Link::new();

        let report = negotiator(60)
            .negotiate(&mut transport.clone(), &mut link)
            .unwrap();

        assert_eq!(report.attempts, 2);
        assert_eq!(transport.written_frames(), vec![SYNC, SYNC, ACK_SYNC]);
    }

    #[test]
    fn test_resync_after_failure() {
        let transport = ScriptedTransport::new();
        transport.push_timeout();
        let mut link = Link::new();

        assert!(negotiator(1).negotiate(&mut transport.clone(), &mut link).is_err());

        answer_sync(&transport);
        let report = negotiator(1)
            .negotiate(&mut transport.clone(), &mut link)
            .unwrap();
        assert_eq!(report.attempts, 1);
        assert!(link.is_synced());
    }
}
