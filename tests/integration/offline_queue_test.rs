//! Enqueue, read back and manual sync through the in-memory collaborator

use std::collections::HashSet;
use std::sync::Arc;

use noiton_offline::cache::offline::{OfflineCache, OfflineOperation, OpType, TarefaChanges};
use noiton_offline::cache::MemoryBridge;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::sample_tarefa;

#[tokio::test]
async fn test_create_tarefa_round_trip() {
    let bridge = Arc::new(MemoryBridge::new());
    let cache = OfflineCache::new(bridge.clone());

    let saved = cache
        .save_offline_operation(OfflineOperation::create("tarefa", json!({"titulo": "X"})))
        .await;
    assert!(saved);

    let pending = cache.get_pending_operations().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].op_type, OpType::Create);
    assert_eq!(pending[0].entity, "tarefa");
    assert_eq!(pending[0].payload, json!({"titulo": "X"}));
}

#[tokio::test]
async fn test_queue_keeps_insertion_order_and_unique_ids() {
    let bridge = Arc::new(MemoryBridge::new());
    let cache = OfflineCache::new(bridge.clone());

    assert!(cache.save_tarefa_offline(sample_tarefa("primeira")).await);
    assert!(
        cache
            .update_tarefa_offline(1, TarefaChanges { status: Some("concluida".into()), ..Default::default() })
            .await
    );
    assert!(cache.delete_tarefa_offline(1).await);

    let pending = cache.get_pending_operations().await;
    let types: Vec<OpType> = pending.iter().map(|op| op.op_type).collect();
    assert_eq!(types, vec![OpType::Create, OpType::Update, OpType::Delete]);

    let ids: HashSet<&str> = pending.iter().map(|op| op.op_id.as_str()).collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_empty_queue_reads_empty() {
    let cache = OfflineCache::new(Arc::new(MemoryBridge::new()));
    assert!(cache.get_pending_operations().await.is_empty());
}

#[tokio::test]
async fn test_sync_now_with_auto_sync_drains_queue() {
    let bridge = Arc::new(MemoryBridge::new().with_auto_sync());
    bridge.set_connected(true);
    let cache = OfflineCache::new(bridge.clone());

    assert!(cache.save_tarefa_offline(sample_tarefa("X")).await);
    cache.sync_now().await;

    assert_eq!(bridge.sync_requests(), 1);
    assert!(cache.get_pending_operations().await.is_empty());
}

#[tokio::test]
async fn test_sync_now_offline_keeps_queue() {
    let bridge = Arc::new(MemoryBridge::new().with_auto_sync());
    bridge.set_connected(false);
    let cache = OfflineCache::new(bridge.clone());

    assert!(cache.save_tarefa_offline(sample_tarefa("X")).await);
    cache.sync_now().await;

    assert_eq!(cache.get_pending_operations().await.len(), 1);
}

#[tokio::test]
async fn test_failures_degrade_without_panicking() {
    let bridge = Arc::new(MemoryBridge::new());
    let cache = OfflineCache::new(bridge.clone());

    bridge.fail_persist(true);
    assert!(!cache.save_tarefa_offline(sample_tarefa("X")).await);

    bridge.fail_persist(false);
    assert!(cache.save_tarefa_offline(sample_tarefa("Y")).await);

    bridge.fail_read(true);
    assert!(cache.get_pending_operations().await.is_empty());

    bridge.fail_trigger(true);
    cache.sync_now().await;
}
