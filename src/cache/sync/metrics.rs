//! # Sync Metrics
//!
//! Counters for the sync passes observed through native events during one
//! mount. Durations are measured between `onSyncStart` and the terminating
//! event, so they include time the native engine spent waiting on the network.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct SyncMetrics {
    pub total_syncs: u64,
    pub successful_syncs: u64,
    pub failed_syncs: u64,
    pub stalled_syncs: u64,
    pub average_sync_duration: Duration,
    pub last_sync_duration: Option<Duration>,
    last_sync_start: Option<Instant>,
    timed_syncs: u32,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sync_start(&mut self) {
        self.last_sync_start = Some(Instant::now());
        self.total_syncs += 1;
    }

    pub fn record_sync_success(&mut self) {
        self.successful_syncs += 1;
        if let Some(start) = self.last_sync_start.take() {
            let duration = start.elapsed();
            self.last_sync_duration = Some(duration);
            self.timed_syncs += 1;

            // Rolling average over successful passes that had a start
            let total_duration = self.average_sync_duration * (self.timed_syncs - 1) + duration;
            self.average_sync_duration = total_duration / self.timed_syncs;
        }
    }

    pub fn record_sync_failure(&mut self) {
        self.last_sync_start = None;
        self.failed_syncs += 1;
    }

    pub fn record_sync_stall(&mut self) {
        self.last_sync_start = None;
        self.stalled_syncs += 1;
    }

    /// Share of finished passes that succeeded
    pub fn success_rate(&self) -> f64 {
        let finished = self.successful_syncs + self.failed_syncs + self.stalled_syncs;
        if finished == 0 {
            return 0.0;
        }
        self.successful_syncs as f64 / finished as f64
    }
}
