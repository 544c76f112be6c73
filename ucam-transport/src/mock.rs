//! Scripted in-memory transport
//!
//! The script lists what the simulated camera sends, in order. Host writes
//! are recorded for inspection. Clones share the same script, so a test
//! can keep a handle after moving the transport into a driver.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::{error::*, Transport};

#[derive(Debug)]
enum Chunk {
    Bytes(VecDeque<u8>),
    Timeout,
}

#[derive(Debug, Default)]
struct Inner {
    script: VecDeque<Chunk>,
    written: Vec<u8>,
    baud_rate: Option<u32>,
    max_read: Option<usize>,
    clears: usize,
}

/// Transport replaying a scripted device
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of bytes returned by one read
    pub fn with_max_read(self, max: usize) -> Self {
        self.inner.lock().max_read = Some(max.max(1));
        self
    }

    pub fn with_baud_rate(self, baud_rate: u32) -> Self {
        self.inner.lock().baud_rate = Some(baud_rate);
        self
    }

    /// Queue bytes the device will send
    pub fn push_bytes(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.inner
            .lock()
            .script
            .push_back(Chunk::Bytes(bytes.iter().copied().collect()));
    }

    /// Queue one read that times out
    pub fn push_timeout(&self) {
        self.inner.lock().script.push_back(Chunk::Timeout);
    }

    /// Everything the host wrote so far
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().written.clone()
    }

    /// Host writes split into 6-byte frames
    pub fn written_frames(&self) -> Vec<[u8; 6]> {
        self.inner
            .lock()
            .written
            .chunks_exact(6)
            .map(|chunk| {
                let mut frame = [0u8; 6];
                frame.copy_from_slice(chunk);
                frame
            })
            .collect()
    }

    /// Script entries not consumed yet
    pub fn pending(&self) -> usize {
        self.inner.lock().script.len()
    }

    /// Number of `clear_input` calls
    pub fn clears(&self) -> usize {
        self.inner.lock().clears
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        trace!("Mock write {} bytes: {}", data.len(), hex::encode(data));
        self.inner.lock().written.extend_from_slice(data);
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        let mut inner = self.inner.lock();
        let limit = inner.max_read.unwrap_or(usize::MAX).min(buf.len());

        let n = match inner.script.front_mut() {
            None => return Err(Error::ReadTimeout),
            Some(Chunk::Timeout) => {
                inner.script.pop_front();
                return Err(Error::ReadTimeout);
            }
            Some(Chunk::Bytes(bytes)) => {
                let n = limit.min(bytes.len());
                for (slot, byte) in buf.iter_mut().zip(bytes.drain(..n)) {
                    *slot = byte;
                }
                n
            }
        };

        if matches!(inner.script.front(), Some(Chunk::Bytes(bytes)) if bytes.is_empty()) {
            inner.script.pop_front();
        }

        Ok(n)
    }

    fn clear_input(&mut self) -> Result<()> {
        self.inner.lock().clears += 1;
        Ok(())
    }

    fn baud_rate(&self) -> Option<u32> {
        self.inner.lock().baud_rate
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<()> {
        self.inner.lock().baud_rate = Some(baud_rate);
        Ok(())
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_script_order() {
        let mut transport = ScriptedTransport::new();
        transport.push_timeout();
        transport.push_bytes(&[1, 2, 3]);

        let mut buf = [0u8; 8];
        assert!(matches!(
            transport.receive(&mut buf, Duration::ZERO),
            Err(Error::ReadTimeout)
        ));
        assert_eq!(transport.receive(&mut buf, Duration::ZERO).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(transport.pending(), 0);
    }

    #[test]
    fn test_reads_do_not_cross_chunks() {
        let mut transport = ScriptedTransport::new();
        transport.push_bytes(&[1, 2]);
        transport.push_bytes(&[3]);

        let mut buf = [0u8; 8];
        assert_eq!(transport.receive(&mut buf, Duration::ZERO).unwrap(), 2);
        assert_eq!(transport.receive(&mut buf, Duration::ZERO).unwrap(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let handle = ScriptedTransport::new().with_baud_rate(115_200);
        let mut transport = handle.clone();

        transport.send(&[0xAA, 0x0D, 0, 0, 0, 0]).unwrap();
        transport.set_baud_rate(921_600).unwrap();

        assert_eq!(handle.written_frames(), vec![[0xAA, 0x0D, 0, 0, 0, 0]]);
        assert_eq!(handle.baud_rate(), Some(921_600));
    }
}
