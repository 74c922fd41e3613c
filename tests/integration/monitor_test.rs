//! Monitor behaviour over realistic event sequences

use noiton_offline::cache::offline::OfflineCache;
use noiton_offline::cache::{CacheMonitor, MemoryBridge, NetworkStatus, StallPolicy};
use noiton_offline::shared::{AppConfig, SyncEvent};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{sample_tarefa, wait_until, MonitorFixture};

#[tokio::test]
async fn test_disconnect_then_reconnect() {
    let fixture = MonitorFixture::mount(MemoryBridge::new(), true).await;

    fixture.bridge.set_connected(false);
    fixture.settle(1).await;

    let state = fixture.monitor.state().await;
    assert_eq!(state.connectivity.network, NetworkStatus::Offline);
    assert!(state.connectivity.reconnecting);
    assert!(state.show_reconnect_modal);
    assert!(fixture.monitor.reconnect_prompt().await.is_some());

    fixture.bridge.set_connected(true);
    fixture.settle(2).await;

    let state = fixture.monitor.state().await;
    assert_eq!(state.connectivity.network, NetworkStatus::Online);
    assert!(!state.connectivity.reconnecting);
    assert!(!state.show_reconnect_modal);
    assert_eq!(fixture.callbacks(), vec![false, true]);
}

#[tokio::test]
async fn test_sync_error_keeps_pending() {
    let bridge = MemoryBridge::new();
    let fixture = MonitorFixture::mount(bridge, true).await;
    let cache = fixture.monitor.offline_cache();
    assert!(cache.save_tarefa_offline(sample_tarefa("A")).await);
    assert!(cache.save_tarefa_offline(sample_tarefa("B")).await);
    wait_until(|| async { fixture.monitor.pending_count().await == 2 }).await;

    fixture.bridge.emit(SyncEvent::SyncStart);
    fixture.bridge.emit(SyncEvent::sync_error("timeout"));
    fixture.settle(2).await;

    let connectivity = fixture.monitor.connectivity().await;
    assert!(!connectivity.syncing);
    assert_eq!(connectivity.last_error.as_deref(), Some("timeout"));
    assert_eq!(fixture.monitor.pending_count().await, 2);
}

#[tokio::test]
async fn test_sync_error_without_reason() {
    let fixture = MonitorFixture::mount(MemoryBridge::new(), true).await;

    fixture
        .bridge
        .emitter()
        .emit_raw("onSyncError", Some(json!({"code": 500})))
        .unwrap();
    fixture.settle(1).await;

    assert_eq!(
        fixture.monitor.connectivity().await.last_error.as_deref(),
        Some("Erro desconhecido")
    );
}

#[tokio::test]
async fn test_empty_sync_error_stores_default() {
    let fixture = MonitorFixture::mount(MemoryBridge::new(), true).await;

    fixture.bridge.fail_sync("");
    fixture.settle(2).await;

    assert_eq!(
        fixture.monitor.connectivity().await.last_error.as_deref(),
        Some("Erro desconhecido")
    );
}

#[tokio::test]
async fn test_successful_sync_clears_error_and_queue() {
    let fixture = MonitorFixture::mount(MemoryBridge::new(), true).await;
    assert!(fixture.monitor.offline_cache().delete_tarefa_offline(3).await);

    fixture.bridge.fail_sync("timeout");
    fixture.settle(2).await;
    assert!(fixture.monitor.connectivity().await.last_error.is_some());

    fixture.bridge.complete_sync();
    fixture.settle(4).await;

    let connectivity = fixture.monitor.connectivity().await;
    assert!(!connectivity.syncing);
    assert!(connectivity.last_error.is_none());
    assert_eq!(fixture.monitor.pending_count().await, 0);
}

#[tokio::test]
async fn test_reconnect_message_disabled() {
    let fixture = MonitorFixture::mount(MemoryBridge::new(), false).await;

    fixture.bridge.set_connected(false);
    fixture.settle(1).await;

    let state = fixture.monitor.state().await;
    assert_eq!(state.connectivity.network, NetworkStatus::Offline);
    assert!(!state.connectivity.reconnecting);
    assert!(!state.show_reconnect_modal);
    assert!(fixture.monitor.reconnect_prompt().await.is_none());
    assert_eq!(fixture.callbacks(), vec![false]);
}

#[tokio::test]
async fn test_dismissed_prompt_returns_on_next_disconnect() {
    let fixture = MonitorFixture::mount(MemoryBridge::new(), true).await;

    fixture.bridge.set_connected(false);
    fixture.settle(1).await;
    fixture.monitor.dismiss_reconnect_modal().await;

    let state = fixture.monitor.state().await;
    assert!(!state.show_reconnect_modal);
    assert!(state.connectivity.reconnecting);
    assert!(fixture.monitor.reconnect_prompt().await.is_none());

    fixture.bridge.set_connected(false);
    fixture.settle(2).await;
    assert!(fixture.monitor.reconnect_prompt().await.is_some());
}

#[tokio::test]
async fn test_prompt_counts_pending_operations() {
    let fixture = MonitorFixture::mount(MemoryBridge::new(), true).await;
    fixture.bridge.set_connected(false);
    fixture.settle(1).await;

    let prompt = fixture.monitor.reconnect_prompt().await.unwrap();
    assert_eq!(prompt.title, "📡 Sem Conexão");
    assert!(prompt.pending_line.is_none());

    let cache = fixture.monitor.offline_cache();
    assert!(cache.save_tarefa_offline(sample_tarefa("A")).await);
    assert!(cache.save_tarefa_offline(sample_tarefa("B")).await);
    wait_until(|| async { fixture.monitor.pending_count().await == 2 }).await;

    let prompt = fixture.monitor.reconnect_prompt().await.unwrap();
    assert_eq!(prompt.pending_line.as_deref(), Some("📝 2 operação(ões) pendente(s)"));
}

#[tokio::test]
async fn test_auto_sync_after_reconnect() {
    let fixture = MonitorFixture::mount(MemoryBridge::new().with_auto_sync(), true).await;
    fixture.bridge.set_connected(false);
    fixture.settle(1).await;

    assert!(fixture.monitor.offline_cache().save_tarefa_offline(sample_tarefa("A")).await);
    wait_until(|| async { fixture.monitor.pending_count().await == 1 }).await;

    // WifiConnected, SyncStart, SyncSuccess
    fixture.bridge.set_connected(true);
    fixture.settle(4).await;

    assert_eq!(fixture.monitor.pending_count().await, 0);
    let metrics = fixture.monitor.metrics().await;
    assert_eq!(metrics.successful_syncs, 1);
}

#[tokio::test]
async fn test_queue_written_elsewhere_shows_after_sync_success() {
    let fixture = MonitorFixture::mount(MemoryBridge::new(), true).await;
    let outside = OfflineCache::new(fixture.bridge.clone());
    assert!(outside.save_tarefa_offline(sample_tarefa("A")).await);
    assert_eq!(fixture.monitor.pending_count().await, 0);

    fixture.bridge.emit(SyncEvent::SyncSuccess);
    fixture.settle(1).await;
    assert_eq!(fixture.monitor.pending_count().await, 1);
}

#[tokio::test]
async fn test_events_after_unmount_are_ignored() {
    let fixture = MonitorFixture::mount(MemoryBridge::new(), true).await;
    let bridge = fixture.bridge.clone();
    let seen = fixture.callbacks.clone();

    fixture.monitor.unmount().await;
    assert_eq!(bridge.subscriber_count(), 0);

    assert_eq!(bridge.emit(SyncEvent::WifiDisconnected), 0);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_drop_releases_subscription() {
    let bridge = std::sync::Arc::new(MemoryBridge::new());
    let monitor = CacheMonitor::new(bridge.clone()).mount().await;
    assert_eq!(bridge.subscriber_count(), 1);

    drop(monitor);
    wait_until(|| async { bridge.subscriber_count() == 0 }).await;
}

#[tokio::test(start_paused = true)]
async fn test_config_stall_timeout() {
    let config = AppConfig::builder()
        .sync_stall_timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap();
    assert_eq!(
        StallPolicy::from_config(&config),
        StallPolicy::ReportAfter(std::time::Duration::from_secs(10))
    );

    let bridge = std::sync::Arc::new(MemoryBridge::new());
    let monitor = CacheMonitor::from_config(bridge.clone(), &config).mount().await;

    bridge.emit(SyncEvent::SyncStart);
    wait_until(|| async { monitor.connectivity().await.syncing }).await;

    tokio::time::sleep(std::time::Duration::from_secs(11)).await;
    let connectivity = monitor.connectivity().await;
    assert!(!connectivity.syncing);
    assert!(connectivity.last_error.is_some());
}
