//! # Sync State Management
//!
//! In-memory state of the offline monitor and the transition applied for
//! each native event.
//!
//! Transitions are plain overwrites: applying the same event twice leaves
//! the same state, which is what lets interleaved events stay harmless.

use tokio::time::Instant;

use crate::cache::offline::PendingOperation;
use crate::shared::event::SyncEvent;

/// Connectivity as last reported by the native side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkStatus {
    /// Nothing reported since mount
    #[default]
    Unknown,
    Online,
    Offline,
}

/// Transient connectivity/sync flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityState {
    pub network: NetworkStatus,
    pub reconnecting: bool,
    pub syncing: bool,
    pub last_error: Option<String>,
}

impl ConnectivityState {
    pub fn connected(&self) -> bool {
        self.network == NetworkStatus::Online
    }
}

/// Everything the monitor tracks between events
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    pub connectivity: ConnectivityState,
    pub show_reconnect_modal: bool,
    /// Last successfully read queue
    pub pending: Vec<PendingOperation>,
    /// Set on `onSyncStart`, cleared by any terminating event
    pub sync_started_at: Option<Instant>,
    /// Events fully processed, including their queue refresh
    pub events_handled: u64,
}

/// Work left to do after a transition, outside the state lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    /// Tell the caller's connectivity callback
    pub connectivity_changed: Option<bool>,
    /// Re-read the pending queue
    pub refresh_pending: bool,
}

impl MonitorState {
    /// Apply one native event.
    pub fn apply(&mut self, event: &SyncEvent, show_reconnecting_message: bool, now: Instant) -> Effects {
        let mut effects = Effects::default();

        match event {
            SyncEvent::WifiConnected => {
                self.connectivity.network = NetworkStatus::Online;
                self.connectivity.reconnecting = false;
                self.show_reconnect_modal = false;
                effects.connectivity_changed = Some(true);
            }
            SyncEvent::WifiDisconnected => {
                self.connectivity.network = NetworkStatus::Offline;
                if show_reconnecting_message {
                    // Also undoes an earlier dismissal
                    self.connectivity.reconnecting = true;
                    self.show_reconnect_modal = true;
                }
                effects.connectivity_changed = Some(false);
            }
            SyncEvent::SyncStart => {
                self.connectivity.syncing = true;
                self.sync_started_at = Some(now);
            }
            SyncEvent::SyncSuccess => {
                self.connectivity.syncing = false;
                self.connectivity.last_error = None;
                self.sync_started_at = None;
                effects.refresh_pending = true;
            }
            SyncEvent::SyncError { .. } => {
                self.connectivity.syncing = false;
                self.connectivity.last_error = event.error_message().map(str::to_string);
                self.sync_started_at = None;
            }
        }

        effects
    }

    /// Give up on a sync that never terminated
    pub fn abandon_sync(&mut self, message: String) {
        self.connectivity.syncing = false;
        self.connectivity.last_error = Some(message);
        self.sync_started_at = None;
    }

    /// Hide the prompt without touching connectivity
    pub fn dismiss_reconnect_modal(&mut self) {
        self.show_reconnect_modal = false;
    }

    pub fn reconnect_modal_visible(&self) -> bool {
        self.show_reconnect_modal && self.connectivity.reconnecting
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
