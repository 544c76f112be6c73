//! Link synchronization state
//!
//! The link record tracks:
//! - Synchronization state
//! - SYNC attempts used by the last negotiation

use std::fmt;

use crate::error::{Error, Result};

/// Link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// No handshake since power-up or reset
    #[default]
    Unsynced,

    /// Handshake in progress
    Syncing,

    /// Ready for commands
    Synced,

    /// Last handshake exhausted its attempts
    Failed,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unsynced => "UNSYNCED",
            Self::Syncing => "SYNCING",
            Self::Synced => "SYNCED",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Link record
///
/// Owned by the driver instance; only the sync negotiator moves it into
/// `Synced`.
#[derive(Debug, Clone, Default)]
pub struct Link {
    state: LinkState,
    attempts: u32,
}

impl Link {
    /// Create an unsynchronized link
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// SYNC attempts used by the most recent negotiation
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_synced(&self) -> bool {
        self.state == LinkState::Synced
    }

    /// Fail unless the link is synchronized
    pub fn ensure_synced(&self) -> Result<()> {
        if !self.is_synced() {
            return Err(Error::NotSynced(self.state));
        }
        Ok(())
    }

    /// Enter `Syncing`
    ///
    /// Allowed from any state except `Syncing`; re-syncing a live link is
    /// how callers recover from a lost device.
    pub fn begin_sync(&mut self) -> Result<()> {
        if self.state == LinkState::Syncing {
            return Err(Error::InvalidTransition {
                from: self.state,
                to: LinkState::Syncing,
            });
        }

        self.state = LinkState::Syncing;
        self.attempts = 0;
        Ok(())
    }

    /// Record one SYNC attempt
    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// Mark negotiation successful
    pub fn mark_synced(&mut self) -> Result<()> {
        self.transition(LinkState::Synced)
    }

    /// Mark negotiation failed
    pub fn mark_failed(&mut self) -> Result<()> {
        self.transition(LinkState::Failed)
    }

    /// Drop synchronization (device reset or power loss)
    pub fn reset(&mut self) {
        self.state = LinkState::Unsynced;
        self.attempts = 0;
    }

    fn transition(&mut self, to: LinkState) -> Result<()> {
        if self.state != LinkState::Syncing {
            return Err(Error::InvalidTransition {
                from: self.state,
                to,
            });
        }

        self.state = to;
        Ok(())
    }
}
