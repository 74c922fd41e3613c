/**
 * Native Sync Events
 *
 * The native collaborator reports connectivity and sync progress through five
 * named events. The names are part of its contract and must match exactly.
 */
use serde::{Deserialize, Serialize};

use crate::shared::error::OfflineError;

/// Wi-Fi came up
pub const ON_WIFI_CONNECTED: &str = "onWifiConnected";
/// Wi-Fi went away
pub const ON_WIFI_DISCONNECTED: &str = "onWifiDisconnected";
/// The native engine started pushing the queue
pub const ON_SYNC_START: &str = "onSyncStart";
/// The native engine finished and cleared what it sent
pub const ON_SYNC_SUCCESS: &str = "onSyncSuccess";
/// The native engine gave up on this pass
pub const ON_SYNC_ERROR: &str = "onSyncError";

/// Every event name the listener subscribes to
pub const SUBSCRIBED_EVENTS: [&str; 5] = [
    ON_WIFI_CONNECTED,
    ON_WIFI_DISCONNECTED,
    ON_SYNC_START,
    ON_SYNC_SUCCESS,
    ON_SYNC_ERROR,
];

/// Message stored when `onSyncError` carries no `error` field
pub const UNKNOWN_SYNC_ERROR: &str = "Erro desconhecido";

/// Event emitted by the native collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    WifiConnected,
    WifiDisconnected,
    SyncStart,
    SyncSuccess,
    SyncError {
        /// Reason reported by the native engine, if any
        error: Option<String>,
    },
}

/// Payload of `onSyncError`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

impl SyncEvent {
    /// Build an event from the name and payload the native side emitted
    pub fn from_raw(name: &str, payload: Option<serde_json::Value>) -> Result<Self, OfflineError> {
        match name {
            ON_WIFI_CONNECTED => Ok(Self::WifiConnected),
            ON_WIFI_DISCONNECTED => Ok(Self::WifiDisconnected),
            ON_SYNC_START => Ok(Self::SyncStart),
            ON_SYNC_SUCCESS => Ok(Self::SyncSuccess),
            ON_SYNC_ERROR => {
                // Non-object payloads are treated like a missing reason
                let error = payload
                    .and_then(|value| serde_json::from_value::<SyncErrorPayload>(value).ok())
                    .and_then(|payload| payload.error)
                    .filter(|error| !error.is_empty());
                Ok(Self::SyncError { error })
            }
            other => Err(OfflineError::unknown_event(other)),
        }
    }

    /// Create a sync error event with a reason
    pub fn sync_error(error: impl Into<String>) -> Self {
        Self::SyncError {
            error: Some(error.into()),
        }
    }

    /// Name of the event on the native side
    pub fn name(&self) -> &'static str {
        match self {
            Self::WifiConnected => ON_WIFI_CONNECTED,
            Self::WifiDisconnected => ON_WIFI_DISCONNECTED,
            Self::SyncStart => ON_SYNC_START,
            Self::SyncSuccess => ON_SYNC_SUCCESS,
            Self::SyncError { .. } => ON_SYNC_ERROR,
        }
    }

    /// Payload as the native side would emit it
    pub fn payload(&self) -> Option<serde_json::Value> {
        match self {
            Self::SyncError { error } => Some(serde_json::json!({ "error": error })),
            _ => None,
        }
    }

    /// Error message to store for a sync failure
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::SyncError { error } => Some(
                error
                    .as_deref()
                    .filter(|error| !error.is_empty())
                    .unwrap_or(UNKNOWN_SYNC_ERROR),
            ),
            _ => None,
        }
    }
}
