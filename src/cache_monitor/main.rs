/**
 * Offline Cache Monitor - Demo Entry Point
 *
 * Mounts the offline monitor over the in-memory collaborator and walks
 * through a disconnect -> queue -> reconnect -> sync cycle, logging the
 * state the UI would see at each step.
 */
use std::sync::Arc;
use std::time::Duration;

use noiton_offline::cache::offline::{NewComentario, NewTarefa, TarefaChanges};
use noiton_offline::cache::{CacheMonitor, Config, MemoryBridge, MonitorHandle};

/// Time given to the listener task to catch up between steps
const STEP_DELAY: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = Config::load()?;
    match config.source() {
        Some(path) => tracing::info!("configuration loaded from {}", path.display()),
        None => tracing::info!("no configuration file, using defaults"),
    }

    let bridge = Arc::new(MemoryBridge::new().with_auto_sync());
    let monitor = CacheMonitor::from_config(bridge.clone(), config.app())
        .on_connectivity_change(|online| tracing::info!("connectivity callback: online={}", online))
        .mount()
        .await;

    bridge.set_connected(false);
    step(&monitor, "wifi lost").await;

    let cache = monitor.offline_cache();
    cache
        .save_tarefa_offline(NewTarefa {
            titulo: "Tarefa offline".to_string(),
            descricao: "Criada sem internet".to_string(),
            id_workspace: 1,
            id_usuario: 1,
            data_limite: None,
            prioridade: Some("alta".to_string()),
        })
        .await;
    cache
        .update_tarefa_offline(
            1,
            TarefaChanges {
                status: Some("em_andamento".to_string()),
                ..Default::default()
            },
        )
        .await;
    cache
        .save_comentario_offline(NewComentario {
            conteudo: "Comentário escrito offline".to_string(),
            id_tarefa: 1,
            id_usuario: 1,
        })
        .await;
    step(&monitor, "operations queued").await;

    monitor.dismiss_reconnect_modal().await;
    step(&monitor, "prompt dismissed").await;

    bridge.set_connected(true);
    step(&monitor, "wifi back").await;

    let metrics = monitor.metrics().await;
    tracing::info!(
        "syncs: {} started, {} ok, {} failed, {} stalled",
        metrics.total_syncs,
        metrics.successful_syncs,
        metrics.failed_syncs,
        metrics.stalled_syncs
    );

    monitor.unmount().await;
    Ok(())
}

async fn step(monitor: &MonitorHandle, label: &str) {
    tokio::time::sleep(STEP_DELAY).await;

    let state = monitor.state().await;
    tracing::info!(
        "[{}] network={:?} syncing={} error={:?} pending={}",
        label,
        state.connectivity.network,
        state.connectivity.syncing,
        state.connectivity.last_error,
        state.pending_count()
    );

    if let Some(prompt) = monitor.reconnect_prompt().await {
        tracing::info!("[{}] prompt: {} / {}", label, prompt.title, prompt.message);
        if let Some(line) = prompt.pending_line {
            tracing::info!("[{}] prompt: {}", label, line);
        }
    }
}
