//! Payload builders for the entities the client queues while offline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operation::OfflineOperation;
use crate::shared::error::OfflineError;

pub const ENTITY_TAREFA: &str = "tarefa";
pub const ENTITY_COMENTARIO: &str = "comentario";

/// A task created without network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTarefa {
    pub titulo: String,
    pub descricao: String,
    pub id_workspace: i64,
    pub id_usuario: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_limite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prioridade: Option<String>,
}

/// Fields changed on an existing task; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TarefaChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_limite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prioridade: Option<String>,
}

/// A comment written without network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewComentario {
    pub conteudo: String,
    pub id_tarefa: i64,
    pub id_usuario: i64,
}

impl NewTarefa {
    pub fn into_operation(self) -> Result<OfflineOperation, OfflineError> {
        Ok(OfflineOperation::create(ENTITY_TAREFA, serde_json::to_value(self)?))
    }
}

impl TarefaChanges {
    /// UPDATE with payload `{ id, ...changes }`
    pub fn into_operation(self, id: i64) -> Result<OfflineOperation, OfflineError> {
        let mut payload = serde_json::to_value(self)?;
        match payload.as_object_mut() {
            Some(fields) => {
                fields.insert("id".to_string(), Value::from(id));
            }
            None => return Err(OfflineError::serialization("task changes must encode as an object")),
        }
        Ok(OfflineOperation::update(ENTITY_TAREFA, payload))
    }
}

/// DELETE with payload `{ id }`
pub fn delete_tarefa(id: i64) -> OfflineOperation {
    OfflineOperation::delete(ENTITY_TAREFA, serde_json::json!({ "id": id }))
}

impl NewComentario {
    pub fn into_operation(self) -> Result<OfflineOperation, OfflineError> {
        Ok(OfflineOperation::create(ENTITY_COMENTARIO, serde_json::to_value(self)?))
    }
}
