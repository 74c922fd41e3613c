//! What to do when `onSyncStart` is never followed by a terminating event.
//!
//! The native engine defines no "sync abandoned" event, so this is a policy
//! choice left to the embedding app. The default waits forever.

use std::time::Duration;
use tokio::time::Instant;

use crate::shared::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StallPolicy {
    /// Stay in `syncing` until the native side says otherwise
    #[default]
    Indefinite,
    /// Clear `syncing` and record an error after this long
    ReportAfter(Duration),
}

impl StallPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.sync_stall_timeout {
            Some(timeout) => Self::ReportAfter(timeout),
            None => Self::Indefinite,
        }
    }

    /// When a sync that started at `started_at` counts as stalled
    pub fn deadline(&self, started_at: Option<Instant>) -> Option<Instant> {
        match (self, started_at) {
            // A deadline past the clock's range means no deadline
            (Self::ReportAfter(timeout), Some(started)) => started.checked_add(*timeout),
            _ => None,
        }
    }

    /// Error stored when the deadline passes
    pub fn stall_message(&self) -> String {
        match self {
            Self::ReportAfter(timeout) => {
                format!("sincronização não concluída em {}s", timeout.as_secs())
            }
            Self::Indefinite => "sincronização não concluída".to_string(),
        }
    }
}

/// Sleep until `deadline`, or forever when there is none
pub(crate) async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
