//! Offline Cache Module
//!
//! The client-side offline layer of Noiton: it queues mutations while the
//! device has no network and follows the native collaborator's connectivity
//! and sync events.
//!
//! # Architecture
//!
//! - **`native`** - The collaborator surface (`NativeBridge`) and an in-memory stand-in
//! - **`offline`** - Pending-operation model, enqueue/read, manual sync trigger
//! - **`sync`** - Event listener, state transitions, stall policy, metrics
//! - **`reconnect`** - Content of the "no connection" prompt
//! - **`config`** - File and environment configuration
//!
//! # Module Structure
//!
//! ```text
//! cache/
//! ├── mod.rs        - Module exports and documentation
//! ├── config.rs     - Configuration loading
//! ├── reconnect.rs  - Reconnect prompt view model
//! ├── native/       - Native collaborator contract
//! ├── offline/      - Operation queue front
//! └── sync/         - Connectivity/sync monitor
//! ```

pub mod config;
pub mod native;
pub mod offline;
pub mod reconnect;
pub mod sync;

// Re-export commonly used types
pub use config::Config;
pub use native::{EventSubscription, MemoryBridge, NativeBridge};
pub use offline::{OfflineCache, OfflineOperation, OpType, PendingOperation};
pub use reconnect::ReconnectPrompt;
pub use sync::{CacheMonitor, ConnectivityState, MonitorHandle, MonitorState, NetworkStatus, StallPolicy};
