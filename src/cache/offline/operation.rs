//! # Pending Operations
//!
//! The shape of a mutation queued while offline, as it is handed to and read
//! back from the native store.
//!
//! The payload stays a raw `serde_json::Value`: validation belongs to the
//! sync engine and the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::shared::error::OfflineError;

/// Kind of mutation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpType {
    Create,
    Update,
    Delete,
}

impl OpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpType::Create => "CREATE",
            OpType::Update => "UPDATE",
            OpType::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for OpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation requested by the UI, before it gets an id
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineOperation {
    pub op_type: OpType,
    pub entity: String,
    pub payload: Value,
}

impl OfflineOperation {
    pub fn new(op_type: OpType, entity: impl Into<String>, payload: Value) -> Self {
        Self {
            op_type,
            entity: entity.into(),
            payload,
        }
    }

    pub fn create(entity: impl Into<String>, payload: Value) -> Self {
        Self::new(OpType::Create, entity, payload)
    }

    pub fn update(entity: impl Into<String>, payload: Value) -> Self {
        Self::new(OpType::Update, entity, payload)
    }

    pub fn delete(entity: impl Into<String>, payload: Value) -> Self {
        Self::new(OpType::Delete, entity, payload)
    }

    /// Stamp the operation with its queue id
    pub fn into_pending(self, op_id: String) -> PendingOperation {
        PendingOperation {
            op_id,
            op_type: self.op_type,
            entity: self.entity,
            payload: self.payload,
            entity_id: None,
            client_ts: None,
            retry_count: None,
        }
    }
}

/// Queued operation as stored by the native collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingOperation {
    /// Client-generated, timestamp-derived id
    pub op_id: String,
    pub op_type: OpType,
    /// Target domain object, e.g. "tarefa"
    pub entity: String,
    #[serde(default)]
    pub payload: Value,
    /// Local id of the affected row, when the native store tracks one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Milliseconds since epoch at which the native store recorded the op
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
}

impl PendingOperation {
    /// Serialize for the native persist call
    pub fn to_json(&self) -> Result<String, OfflineError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode the JSON array returned by the native store, keeping its order.
pub fn decode_pending_operations(raw: &str) -> Result<Vec<PendingOperation>, OfflineError> {
    let mut operations: Vec<PendingOperation> = serde_json::from_str(raw)?;
    for op in operations.iter_mut() {
        unwrap_text_payload(&mut op.payload);
    }
    Ok(operations)
}

/// The Android store keeps payloads in a TEXT column and hands them back as
/// a JSON string. Structured content is unwrapped; anything else is kept.
fn unwrap_text_payload(payload: &mut Value) {
    let Value::String(text) = &*payload else {
        return;
    };
    if let Ok(inner @ (Value::Object(_) | Value::Array(_))) = serde_json::from_str::<Value>(text) {
        *payload = inner;
    }
}

/// Issues operation ids from the wall clock.
///
/// Ids are milliseconds since the Unix epoch. Two calls within the same
/// millisecond get consecutive values, so ids never repeat in a process.
#[derive(Debug, Default)]
pub struct OpIdGenerator {
    last: AtomicI64,
}

impl OpIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate.to_string(),
                Err(actual) => last = actual,
            }
        }
    }
}
