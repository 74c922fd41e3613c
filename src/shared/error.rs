//! Shared Error Types
//!
//! This module defines the error type used across the offline cache layer.
//! None of these errors are fatal: callers at the edge of the crate log them
//! and degrade to "nothing changed".
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON encoding/decoding of pending operations
//! - `NativeError` - a call into the native collaborator failed
//! - `UnknownEvent` - the collaborator emitted an event name we do not listen to
//!
//! # Usage
//!
//! ```rust
//! use noiton_offline::shared::error::OfflineError;
//!
//! let error = OfflineError::native("savePendingOp", "disk full");
//! assert!(error.to_string().contains("savePendingOp"));
//! ```
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can be safely shared across thread boundaries.
use thiserror::Error;

/// Errors raised by the offline cache layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OfflineError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// The native collaborator rejected or failed a call
    #[error("Native call '{call}' failed: {message}")]
    NativeError {
        /// Name of the native entry point
        call: &'static str,
        /// Human-readable error message
        message: String,
    },

    /// Event name outside the collaborator's contract
    #[error("Unknown native event: {name}")]
    UnknownEvent {
        /// The name as emitted
        name: String,
    },
}

impl OfflineError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new native-call error
    pub fn native(call: &'static str, message: impl Into<String>) -> Self {
        Self::NativeError {
            call,
            message: message.into(),
        }
    }

    /// Create a new unknown-event error
    pub fn unknown_event(name: impl Into<String>) -> Self {
        Self::UnknownEvent { name: name.into() }
    }
}

impl From<serde_json::Error> for OfflineError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
