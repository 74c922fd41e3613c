//! Noiton Offline - Main Library
//!
//! The offline operation queue and connectivity-driven sync coordination of
//! the Noiton task-management client (workspaces, tasks, comments).
//!
//! # Overview
//!
//! When the device loses Wi-Fi, the client keeps working: task and comment
//! mutations are queued through a native collaborator that owns the durable
//! store, watches connectivity and pushes the queue to the backend once the
//! network returns. This library is the thin layer on top of it:
//!
//! - Enqueue pending operations and read the queue back
//! - Kick a manual sync
//! - Follow the native connectivity and sync events
//! - Drive the "no connection" prompt and the pending-operation count
//!
//! # Module Structure
//!
//! - **`shared`** - Contract types
//!   - Native event names and payloads
//!   - Error types
//!   - Configuration
//!
//! - **`cache`** - The offline layer
//!   - `NativeBridge` trait and an in-memory collaborator
//!   - `OfflineCache`: enqueue, read, sync trigger
//!   - `CacheMonitor`: event listener, reconnect prompt, stall policy, metrics
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use noiton_offline::cache::{CacheMonitor, Config, MemoryBridge};
//! use noiton_offline::cache::offline::NewTarefa;
//!
//! # async fn example() {
//! let config = Config::default();
//! let bridge = Arc::new(MemoryBridge::new());
//!
//! let monitor = CacheMonitor::from_config(bridge, config.app())
//!     .on_connectivity_change(|online| println!("online: {}", online))
//!     .mount()
//!     .await;
//!
//! let cache = monitor.offline_cache();
//! cache
//!     .save_tarefa_offline(NewTarefa {
//!         titulo: "Revisar relatório".to_string(),
//!         descricao: "Criada sem internet".to_string(),
//!         id_workspace: 1,
//!         id_usuario: 1,
//!         data_limite: None,
//!         prioridade: None,
//!     })
//!     .await;
//!
//! monitor.sync_now().await;
//! monitor.unmount().await;
//! # }
//! ```
//!
//! # What this library does not do
//!
//! Persistence, connectivity detection and the sync itself belong to the
//! native collaborator. There is no retry policy, conflict resolution or
//! ordering guarantee here beyond what the collaborator provides.
//!
//! # Thread Safety
//!
//! - Monitor state lives behind `tokio::sync::RwLock` and is only changed by
//!   the listener task, one event at a time
//! - `OfflineCache` is `Clone + Send + Sync` and can be shared freely
//!
//! # Error Handling
//!
//! - Fallible internals return `Result<T, OfflineError>`
//! - Public enqueue/read/trigger calls log failures and degrade to
//!   `false`, an empty queue, or nothing

/// Contract types shared by the whole crate
pub mod shared;

/// Offline queue and sync monitor
pub mod cache;
