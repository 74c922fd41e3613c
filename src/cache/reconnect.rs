//! Reconnect prompt shown while Wi-Fi is down.
//!
//! Only the content is produced here; drawing it is the UI's job. Dismissing
//! the prompt goes through [`MonitorHandle::dismiss_reconnect_modal`] and never
//! changes connectivity.
//!
//! [`MonitorHandle::dismiss_reconnect_modal`]: crate::cache::sync::MonitorHandle::dismiss_reconnect_modal

use crate::cache::sync::MonitorState;

pub const TITLE: &str = "📡 Sem Conexão";
pub const MESSAGE: &str = "Aguardando reconexão com a internet...";
pub const STATUS: &str = "🔄 Reconectando";
pub const DISMISS_LABEL: &str = "Continuar Offline";

/// Content of the blocking "no connection" prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub status: &'static str,
    pub pending_count: usize,
    /// Absent when nothing is queued
    pub pending_line: Option<String>,
    pub dismiss_label: &'static str,
}

impl ReconnectPrompt {
    /// The prompt to show for `state`, if any
    pub fn from_state(state: &MonitorState) -> Option<Self> {
        if !state.reconnect_modal_visible() {
            return None;
        }
        let pending_count = state.pending_count();
        Some(Self {
            title: TITLE,
            message: MESSAGE,
            status: STATUS,
            pending_count,
            pending_line: pending_line(pending_count),
            dismiss_label: DISMISS_LABEL,
        })
    }
}

fn pending_line(count: usize) -> Option<String> {
    (count > 0).then(|| format!("📝 {} operação(ões) pendente(s)", count))
}
