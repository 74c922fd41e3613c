//! # Native Collaborator
//!
//! The platform module that owns the durable queue, watches connectivity and
//! runs the actual sync. This crate only talks to it through [`NativeBridge`].
//!
//! ## Contract
//!
//! - `persist_pending_operation` must durably queue the serialized operation
//! - `read_pending_operations` returns a JSON array of queued operations
//! - `trigger_sync` is a best-effort kick; success does not mean the sync ran
//! - `subscribe` hands out one subscription covering all five sync events;
//!   dropping it releases all of them at once
//!
//! Events may arrive at any time, any number of times, in any order relative
//! to the calls above.

pub mod memory;

pub use memory::MemoryBridge;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::shared::error::OfflineError;
use crate::shared::event::SyncEvent;

/// Capacity of the event channel between the native side and listeners
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Surface of the native collaborator as consumed by the offline cache
#[async_trait]
pub trait NativeBridge: Send + Sync {
    /// Durably queue one serialized operation
    async fn persist_pending_operation(&self, serialized: &str) -> Result<(), OfflineError>;

    /// Read the whole queue as a JSON array
    async fn read_pending_operations(&self) -> Result<String, OfflineError>;

    /// Ask the native engine to sync now
    async fn trigger_sync(&self) -> Result<(), OfflineError>;

    /// Register for connectivity and sync events
    fn subscribe(&self) -> EventSubscription;
}

/// Sending half used by bridge implementations to publish native events
#[derive(Debug, Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<SyncEvent>,
}

impl EventEmitter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event; returns how many subscriptions received it
    pub fn emit(&self, event: SyncEvent) -> usize {
        tracing::debug!("native event {}", event.name());
        // No subscribers is fine: nobody is mounted yet
        self.sender.send(event).unwrap_or(0)
    }

    /// Publish an event as the platform reported it
    pub fn emit_raw(&self, name: &str, payload: Option<serde_json::Value>) -> Result<usize, OfflineError> {
        let event = SyncEvent::from_raw(name, payload)?;
        Ok(self.emit(event))
    }

    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription::new(self.sender.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration for all five native events.
///
/// Listening stops for every event at once when this is dropped.
#[derive(Debug)]
pub struct EventSubscription {
    receiver: broadcast::Receiver<SyncEvent>,
}

impl EventSubscription {
    pub fn new(receiver: broadcast::Receiver<SyncEvent>) -> Self {
        Self { receiver }
    }

    /// Next event, or `None` once the native side has gone away.
    ///
    /// If this subscriber fell behind, the missed events are skipped.
    pub async fn recv(&mut self) -> Option<SyncEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("event subscription lagged, skipped {} native events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
