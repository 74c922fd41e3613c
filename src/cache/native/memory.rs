//! # In-Memory Collaborator
//!
//! A process-local stand-in for the native module. It keeps the queue as the
//! ordered list of serialized operations it was given and emits the same
//! event sequences the Android module does.
//!
//! Used by tests and by the `cache_monitor` demo.
//!
//! ```rust,no_run
//! use noiton_offline::cache::native::{MemoryBridge, NativeBridge};
//!
//! # async fn example() {
//! let bridge = MemoryBridge::new().with_auto_sync();
//! bridge.set_connected(false);
//! bridge.persist_pending_operation(r#"{"op_id":"1","op_type":"CREATE","entity":"tarefa","payload":{}}"#).await.unwrap();
//! bridge.set_connected(true); // runs a sync and clears the queue
//! # }
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{EventEmitter, EventSubscription, NativeBridge};
use crate::shared::error::OfflineError;
use crate::shared::event::SyncEvent;

/// Failure injection switches
#[derive(Debug, Default, Clone, Copy)]
struct Faults {
    persist: bool,
    read: bool,
    trigger: bool,
    corrupt_read: bool,
}

/// In-process implementation of [`NativeBridge`]
#[derive(Debug)]
pub struct MemoryBridge {
    queue: Mutex<Vec<String>>,
    events: EventEmitter,
    faults: Mutex<Faults>,
    connected: AtomicBool,
    syncing: AtomicBool,
    auto_sync: bool,
    sync_requests: AtomicUsize,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            events: EventEmitter::new(),
            faults: Mutex::new(Faults::default()),
            connected: AtomicBool::new(false),
            syncing: AtomicBool::new(false),
            auto_sync: false,
            sync_requests: AtomicUsize::new(0),
        }
    }

    /// Run a sync whenever one is triggered or Wi-Fi comes back
    pub fn with_auto_sync(mut self) -> Self {
        self.auto_sync = true;
        self
    }

    /// Publish a native event to all subscriptions
    pub fn emit(&self, event: SyncEvent) -> usize {
        self.events.emit(event)
    }

    pub fn emitter(&self) -> &EventEmitter {
        &self.events
    }

    /// Flip connectivity and emit the matching event.
    ///
    /// With auto-sync, reconnecting also starts a sync pass.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
        if connected {
            self.emit(SyncEvent::WifiConnected);
            if self.auto_sync {
                self.run_sync();
            }
        } else {
            self.emit(SyncEvent::WifiDisconnected);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Successful pass: start, drop everything queued, success
    pub fn complete_sync(&self) {
        self.emit(SyncEvent::SyncStart);
        let sent = {
            let mut queue = self.lock_queue();
            std::mem::take(&mut *queue).len()
        };
        tracing::debug!("memory bridge synced {} operations", sent);
        self.emit(SyncEvent::SyncSuccess);
    }

    /// Failed pass: start, error; the queue is left as it was
    pub fn fail_sync(&self, error: impl Into<String>) {
        self.emit(SyncEvent::SyncStart);
        self.emit(SyncEvent::sync_error(error));
    }

    /// Serialized operations currently queued, oldest first
    pub fn queued(&self) -> Vec<String> {
        self.lock_queue().clone()
    }

    pub fn queued_len(&self) -> usize {
        self.lock_queue().len()
    }

    /// How many times `trigger_sync` was called
    pub fn sync_requests(&self) -> usize {
        self.sync_requests.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    pub fn fail_persist(&self, fail: bool) {
        self.update_faults(|faults| faults.persist = fail);
    }

    pub fn fail_read(&self, fail: bool) {
        self.update_faults(|faults| faults.read = fail);
    }

    pub fn fail_trigger(&self, fail: bool) {
        self.update_faults(|faults| faults.trigger = fail);
    }

    /// Make reads return something that is not a JSON array
    pub fn corrupt_read(&self, corrupt: bool) {
        self.update_faults(|faults| faults.corrupt_read = corrupt);
    }

    fn run_sync(&self) {
        // Wi-Fi required, one pass at a time
        if !self.is_connected() {
            return;
        }
        if self.syncing.swap(true, Ordering::SeqCst) {
            return;
        }
        self.complete_sync();
        self.syncing.store(false, Ordering::SeqCst);
    }

    fn faults(&self) -> Faults {
        *self.faults.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update_faults(&self, apply: impl FnOnce(&mut Faults)) {
        let mut faults = self.faults.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        apply(&mut faults);
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NativeBridge for MemoryBridge {
    async fn persist_pending_operation(&self, serialized: &str) -> Result<(), OfflineError> {
        if self.faults().persist {
            return Err(OfflineError::native("savePendingOp", "injected persist failure"));
        }
        self.lock_queue().push(serialized.to_string());
        Ok(())
    }

    async fn read_pending_operations(&self) -> Result<String, OfflineError> {
        let faults = self.faults();
        if faults.read {
            return Err(OfflineError::native("getPendingOps", "injected read failure"));
        }
        if faults.corrupt_read {
            return Ok("{not an array".to_string());
        }
        let queue = self.lock_queue();
        Ok(format!("[{}]", queue.join(",")))
    }

    async fn trigger_sync(&self) -> Result<(), OfflineError> {
        self.sync_requests.fetch_add(1, Ordering::SeqCst);
        if self.faults().trigger {
            return Err(OfflineError::native("startSync", "injected trigger failure"));
        }
        if self.auto_sync {
            self.run_sync();
        }
        Ok(())
    }

    fn subscribe(&self) -> EventSubscription {
        self.events.subscribe()
    }
}
