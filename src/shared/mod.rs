//! Shared Module
//!
//! Types that describe the contract with the native collaborator and the
//! settings of the offline layer. Nothing here touches the runtime; the
//! `cache` module builds on these.

/// Native sync events
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use event::SyncEvent;
pub use error::OfflineError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
