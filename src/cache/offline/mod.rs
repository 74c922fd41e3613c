//! # Offline Operation Cache
//!
//! Queues mutations the UI could not (or should not) send right away and lets
//! the native collaborator deliver them later.
//!
//! ## Architecture
//!
//! - **Operation model** (`operation.rs`): what gets queued and how it is encoded
//! - **Entity helpers** (`entities.rs`): typed payloads for tasks and comments
//! - **`OfflineCache`**: enqueue, read back, and kick a sync
//!
//! Every call here reports failure as a value and logs it; nothing is thrown
//! to the caller and nothing is retried.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use noiton_offline::cache::native::MemoryBridge;
//! use noiton_offline::cache::offline::{OfflineCache, OfflineOperation};
//!
//! # async fn example() {
//! let cache = OfflineCache::new(Arc::new(MemoryBridge::new()));
//!
//! let saved = cache
//!     .save_offline_operation(OfflineOperation::create("tarefa", serde_json::json!({"titulo": "X"})))
//!     .await;
//! assert!(saved);
//!
//! let pending = cache.get_pending_operations().await;
//! cache.sync_now().await;
//! # }
//! ```

pub mod entities;
pub mod operation;

pub use entities::{NewComentario, NewTarefa, TarefaChanges, ENTITY_COMENTARIO, ENTITY_TAREFA};
pub use operation::{decode_pending_operations, OfflineOperation, OpIdGenerator, OpType, PendingOperation};

use std::sync::Arc;
use tokio::sync::Notify;

use crate::cache::native::NativeBridge;
use crate::shared::error::OfflineError;

/// Enqueue/read/trigger front for the native collaborator
#[derive(Clone)]
pub struct OfflineCache {
    bridge: Arc<dyn NativeBridge>,
    ids: Arc<OpIdGenerator>,
    /// Poked after each successful enqueue so a mounted monitor re-reads the queue
    refresh: Option<Arc<Notify>>,
}

impl OfflineCache {
    pub fn new(bridge: Arc<dyn NativeBridge>) -> Self {
        Self {
            bridge,
            ids: Arc::new(OpIdGenerator::new()),
            refresh: None,
        }
    }

    /// Signal `refresh` after every successful enqueue
    pub fn with_refresh_signal(mut self, refresh: Arc<Notify>) -> Self {
        self.refresh = Some(refresh);
        self
    }

    /// Queue an operation. Returns `false` if it could not be handed over.
    pub async fn save_offline_operation(&self, operation: OfflineOperation) -> bool {
        let op = operation.into_pending(self.ids.next_id());

        match self.persist(&op).await {
            Ok(()) => {
                tracing::info!(
                    op_id = %op.op_id,
                    op_type = %op.op_type,
                    entity = %op.entity,
                    "offline operation saved"
                );
                if let Some(refresh) = &self.refresh {
                    refresh.notify_one();
                }
                true
            }
            Err(e) => {
                tracing::warn!("failed to save offline operation {}: {}", op.op_id, e);
                false
            }
        }
    }

    async fn persist(&self, op: &PendingOperation) -> Result<(), OfflineError> {
        let serialized = op.to_json()?;
        self.bridge.persist_pending_operation(&serialized).await
    }

    /// Queue as the native store reports it, failing on bridge or decode errors
    pub async fn try_pending_operations(&self) -> Result<Vec<PendingOperation>, OfflineError> {
        let raw = self.bridge.read_pending_operations().await?;
        decode_pending_operations(&raw)
    }

    /// Queue as the native store reports it; empty if it cannot be read
    pub async fn get_pending_operations(&self) -> Vec<PendingOperation> {
        match self.try_pending_operations().await {
            Ok(ops) => ops,
            Err(e) => {
                tracing::warn!("failed to load pending operations: {}", e);
                Vec::new()
            }
        }
    }

    /// Ask the native engine to sync. The outcome arrives as sync events.
    pub async fn sync_now(&self) {
        tracing::info!("forcing manual sync");
        if let Err(e) = self.bridge.trigger_sync().await {
            tracing::warn!("manual sync request failed: {}", e);
        }
    }

    pub async fn save_tarefa_offline(&self, tarefa: NewTarefa) -> bool {
        self.save_built(tarefa.into_operation()).await
    }

    pub async fn update_tarefa_offline(&self, id: i64, changes: TarefaChanges) -> bool {
        self.save_built(changes.into_operation(id)).await
    }

    pub async fn delete_tarefa_offline(&self, id: i64) -> bool {
        self.save_offline_operation(entities::delete_tarefa(id)).await
    }

    pub async fn save_comentario_offline(&self, comentario: NewComentario) -> bool {
        self.save_built(comentario.into_operation()).await
    }

    async fn save_built(&self, built: Result<OfflineOperation, OfflineError>) -> bool {
        match built {
            Ok(operation) => self.save_offline_operation(operation).await,
            Err(e) => {
                tracing::warn!("failed to build offline operation: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for OfflineCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineCache")
            .field("refresh", &self.refresh.is_some())
            .finish_non_exhaustive()
    }
}
