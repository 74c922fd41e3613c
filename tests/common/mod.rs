//! Common test utilities and helpers
//!
//! - Bridge and monitor fixtures
//! - Waiting on the listener task
//! - Sample payloads

use std::sync::{Arc, Mutex};

use noiton_offline::cache::offline::NewTarefa;
use noiton_offline::cache::{CacheMonitor, MemoryBridge, MonitorHandle};

/// A mounted monitor, its bridge and every connectivity callback value seen
pub struct MonitorFixture {
    pub bridge: Arc<MemoryBridge>,
    pub monitor: MonitorHandle,
    pub callbacks: Arc<Mutex<Vec<bool>>>,
}

impl MonitorFixture {
    pub async fn mount(bridge: MemoryBridge, show_reconnecting_message: bool) -> Self {
        let bridge = Arc::new(bridge);
        let callbacks = Arc::new(Mutex::new(Vec::new()));
        let recorder = callbacks.clone();
        let monitor = CacheMonitor::new(bridge.clone())
            .show_reconnecting_message(show_reconnecting_message)
            .on_connectivity_change(move |online| recorder.lock().unwrap().push(online))
            .mount()
            .await;

        Self {
            bridge,
            monitor,
            callbacks,
        }
    }

    pub fn callbacks(&self) -> Vec<bool> {
        self.callbacks.lock().unwrap().clone()
    }

    /// Wait until the listener has applied `events` events
    pub async fn settle(&self, events: u64) {
        wait_until(|| async { self.monitor.state().await.events_handled >= events }).await;
    }
}

/// Poll `condition`, yielding to the runtime between attempts
pub async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..1000 {
        if condition().await {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

pub fn sample_tarefa(titulo: &str) -> NewTarefa {
    NewTarefa {
        titulo: titulo.to_string(),
        descricao: "Criada sem internet".to_string(),
        id_workspace: 1,
        id_usuario: 1,
        data_limite: None,
        prioridade: None,
    }
}
