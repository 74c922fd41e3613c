//! # Offline Sync Monitor
//!
//! Listens to the native collaborator's connectivity and sync events and keeps
//! the in-memory picture the UI reads: online/offline, whether a sync is
//! running, the last sync error, the reconnect prompt and the pending queue.
//!
//! ## Architecture
//!
//! - **Subscription**: taken once at mount for all five events, released at unmount
//! - **Listener task**: applies events one at a time, in emission order
//! - **Sync state** (`sync_state.rs`): the transition table
//! - **Stall policy** (`stall.rs`): optional limit on how long `syncing` may last
//! - **Metrics** (`metrics.rs`): per-mount sync counters
//!
//! The native engine does all the real work. Nothing here retries, reorders
//! or resolves conflicts.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use noiton_offline::cache::native::MemoryBridge;
//! use noiton_offline::cache::sync::CacheMonitor;
//!
//! # async fn example() {
//! let bridge = Arc::new(MemoryBridge::new());
//! let monitor = CacheMonitor::new(bridge)
//!     .on_connectivity_change(|online| println!("online: {}", online))
//!     .mount()
//!     .await;
//!
//! if let Some(prompt) = monitor.reconnect_prompt().await {
//!     println!("{}", prompt.title);
//! }
//!
//! monitor.unmount().await;
//! # }
//! ```

pub mod metrics;
pub mod stall;
pub mod sync_state;

pub use metrics::SyncMetrics;
pub use stall::StallPolicy;
pub use sync_state::{ConnectivityState, Effects, MonitorState, NetworkStatus};

use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::cache::native::{EventSubscription, NativeBridge};
use crate::cache::offline::{OfflineCache, PendingOperation};
use crate::cache::reconnect::ReconnectPrompt;
use crate::shared::config::AppConfig;
use crate::shared::event::SyncEvent;

/// Called with `true` on reconnect and `false` on disconnect
pub type ConnectivityCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Monitor configuration, consumed by [`CacheMonitor::mount`]
pub struct CacheMonitor {
    bridge: Arc<dyn NativeBridge>,
    show_reconnecting_message: bool,
    stall_policy: StallPolicy,
    on_connectivity_change: Option<ConnectivityCallback>,
}

impl CacheMonitor {
    pub fn new(bridge: Arc<dyn NativeBridge>) -> Self {
        Self {
            bridge,
            show_reconnecting_message: true,
            stall_policy: StallPolicy::default(),
            on_connectivity_change: None,
        }
    }

    pub fn from_config(bridge: Arc<dyn NativeBridge>, config: &AppConfig) -> Self {
        Self::new(bridge)
            .show_reconnecting_message(config.show_reconnecting_message)
            .stall_policy(StallPolicy::from_config(config))
    }

    /// Raise the reconnect prompt on disconnect (default `true`)
    pub fn show_reconnecting_message(mut self, show: bool) -> Self {
        self.show_reconnecting_message = show;
        self
    }

    pub fn stall_policy(mut self, policy: StallPolicy) -> Self {
        self.stall_policy = policy;
        self
    }

    pub fn on_connectivity_change(mut self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_connectivity_change = Some(Arc::new(callback));
        self
    }

    /// Subscribe, load the queue once and start listening.
    pub async fn mount(self) -> MonitorHandle {
        // Subscribe before the first read so nothing emitted meanwhile is lost
        let subscription = self.bridge.subscribe();
        let refresh = Arc::new(Notify::new());
        let cache = OfflineCache::new(self.bridge).with_refresh_signal(refresh.clone());

        let core = Arc::new(MonitorCore {
            cache: cache.clone(),
            state: RwLock::new(MonitorState::default()),
            metrics: RwLock::new(SyncMetrics::new()),
            show_reconnecting_message: self.show_reconnecting_message,
            stall_policy: self.stall_policy,
            on_connectivity_change: self.on_connectivity_change,
        });

        core.load_pending().await;

        let task = tokio::spawn(run_listener(core.clone(), subscription, refresh.clone()));
        tracing::info!("offline monitor mounted");

        MonitorHandle {
            core,
            cache,
            refresh,
            task: Some(task),
        }
    }
}

impl std::fmt::Debug for CacheMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheMonitor")
            .field("show_reconnecting_message", &self.show_reconnecting_message)
            .field("stall_policy", &self.stall_policy)
            .field("on_connectivity_change", &self.on_connectivity_change.is_some())
            .finish()
    }
}

struct MonitorCore {
    cache: OfflineCache,
    state: RwLock<MonitorState>,
    metrics: RwLock<SyncMetrics>,
    show_reconnecting_message: bool,
    stall_policy: StallPolicy,
    on_connectivity_change: Option<ConnectivityCallback>,
}

impl MonitorCore {
    async fn handle_event(&self, event: SyncEvent) {
        let effects = {
            let mut state = self.state.write().await;
            state.apply(&event, self.show_reconnecting_message, Instant::now())
        };

        {
            let mut metrics = self.metrics.write().await;
            match &event {
                SyncEvent::SyncStart => metrics.record_sync_start(),
                SyncEvent::SyncSuccess => metrics.record_sync_success(),
                SyncEvent::SyncError { .. } => metrics.record_sync_failure(),
                SyncEvent::WifiConnected | SyncEvent::WifiDisconnected => {}
            }
        }

        match &event {
            SyncEvent::WifiConnected => tracing::info!("wifi connected"),
            SyncEvent::WifiDisconnected => tracing::info!("wifi disconnected"),
            SyncEvent::SyncStart => tracing::info!("sync started"),
            SyncEvent::SyncSuccess => tracing::info!("sync finished"),
            SyncEvent::SyncError { .. } => {
                tracing::warn!("sync failed: {}", event.error_message().unwrap_or_default())
            }
        }

        if let (Some(connected), Some(callback)) = (effects.connectivity_changed, &self.on_connectivity_change) {
            // Keep listening if the callback panics
            if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| callback(connected))) {
                tracing::warn!("connectivity callback panicked: {}", panic_message(&*e));
            }
        }

        if effects.refresh_pending {
            self.load_pending().await;
        }

        self.state.write().await.events_handled += 1;
    }

    /// Re-read the queue; on failure keep the last known list
    async fn load_pending(&self) {
        match self.cache.try_pending_operations().await {
            Ok(pending) => {
                tracing::debug!("{} pending operations", pending.len());
                self.state.write().await.pending = pending;
            }
            Err(e) => tracing::warn!("failed to load pending operations: {}", e),
        }
    }

    async fn stall_deadline(&self) -> Option<Instant> {
        let state = self.state.read().await;
        self.stall_policy.deadline(state.sync_started_at)
    }

    async fn handle_stall(&self) {
        let message = self.stall_policy.stall_message();
        {
            let mut state = self.state.write().await;
            if !state.connectivity.syncing {
                return;
            }
            state.abandon_sync(message.clone());
        }
        self.metrics.write().await.record_sync_stall();
        tracing::warn!("{}", message);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

async fn run_listener(core: Arc<MonitorCore>, mut subscription: EventSubscription, refresh: Arc<Notify>) {
    loop {
        let deadline = core.stall_deadline().await;

        tokio::select! {
            event = subscription.recv() => match event {
                Some(event) => core.handle_event(event).await,
                None => {
                    tracing::debug!("native event stream closed, offline monitor stopping");
                    break;
                }
            },
            _ = refresh.notified() => core.load_pending().await,
            _ = stall::wait_for_deadline(deadline) => core.handle_stall().await,
        }
    }
}

/// A mounted monitor.
///
/// Owns the event subscription through its listener task. Dropping the handle
/// or calling [`unmount`](Self::unmount) releases all five listeners together.
pub struct MonitorHandle {
    core: Arc<MonitorCore>,
    cache: OfflineCache,
    refresh: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Snapshot of the whole monitor state
    pub async fn state(&self) -> MonitorState {
        self.core.state.read().await.clone()
    }

    pub async fn connectivity(&self) -> ConnectivityState {
        self.core.state.read().await.connectivity.clone()
    }

    pub async fn pending_operations(&self) -> Vec<PendingOperation> {
        self.core.state.read().await.pending.clone()
    }

    pub async fn pending_count(&self) -> usize {
        self.core.state.read().await.pending_count()
    }

    /// The reconnect prompt, while it should be on screen
    pub async fn reconnect_prompt(&self) -> Option<ReconnectPrompt> {
        ReconnectPrompt::from_state(&*self.core.state.read().await)
    }

    /// Hide the prompt. Connectivity and pending reconnection are untouched.
    pub async fn dismiss_reconnect_modal(&self) {
        self.core.state.write().await.dismiss_reconnect_modal();
    }

    /// Enqueue front whose successful saves refresh this monitor's queue
    pub fn offline_cache(&self) -> OfflineCache {
        self.cache.clone()
    }

    pub async fn sync_now(&self) {
        self.cache.sync_now().await;
    }

    /// Ask the listener to re-read the queue.
    ///
    /// The read happens on the listener task, in order with native events.
    pub fn refresh_pending(&self) {
        self.refresh.notify_one();
    }

    pub async fn metrics(&self) -> SyncMetrics {
        self.core.metrics.read().await.clone()
    }

    /// Whether the listener task is still running
    pub fn is_listening(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop listening and wait until the subscription is released
    pub async fn unmount(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!("offline monitor listener ended abnormally: {}", e);
                }
            }
        }
        tracing::info!("offline monitor unmounted");
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for MonitorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorHandle")
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}
