//! The workflow document codec.
//!
//! Serializes the graph to the JSON envelope used for export, import and
//! named save/load. Import is lenient: `nodes` and `edges` default to empty
//! collections and malformed JSON is rejected without mutating the live
//! graph.

use crate::error::{DocumentError, PersistError};
use crate::graph::{Edge, Node};
use crate::store::WorkflowStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

mod persist;

pub use persist::{InMemoryKvStore, KeyValueStore};

/// Format version written into every exported document.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub exported_at: DateTime<Utc>,
    #[serde(alias = "version")]
    pub format_version: String,
}

/// The exported/imported form of a workflow:
/// `{nodes, edges, metadata: {exportedAt, formatVersion}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocumentMetadata>,
}

/// The envelope handed to the persistence collaborator by a named save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWorkflow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Key under which a named workflow is stored, addressed by workflow id.
pub fn storage_key(workflow_id: &str) -> String {
    format!("workflow_{workflow_id}")
}

/// Serializes the live graph into a pretty-printed workflow document with a
/// fresh `exportedAt` timestamp.
pub fn export_document(store: &WorkflowStore) -> Result<String, DocumentError> {
    let document = WorkflowDocument {
        nodes: store.nodes().to_vec(),
        edges: store.edges().to_vec(),
        metadata: Some(DocumentMetadata {
            exported_at: Utc::now(),
            format_version: FORMAT_VERSION.to_string(),
        }),
    };
    serde_json::to_string_pretty(&document).map_err(|e| DocumentError::Serialize(e.to_string()))
}

/// Parses a workflow document and replaces the live graph with it, clearing
/// selection and history. On a parse failure the live graph is untouched.
pub fn import_document(store: &mut WorkflowStore, json: &str) -> Result<(), DocumentError> {
    let document: WorkflowDocument = serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, "workflow import rejected");
        DocumentError::Parse(e.to_string())
    })?;
    debug!(
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        "workflow imported"
    );
    store.replace_graph(document.nodes, document.edges);
    Ok(())
}

/// Wraps the live graph in a [`SavedWorkflow`] envelope under a fresh id and
/// hands it to the persistence collaborator. Returns the new workflow id.
pub fn save_named(
    store: &mut WorkflowStore,
    kv: &mut dyn KeyValueStore,
    name: &str,
) -> Result<String, PersistError> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let saved = SavedWorkflow {
        id: id.clone(),
        name: name.to_string(),
        nodes: store.nodes().to_vec(),
        edges: store.edges().to_vec(),
        created_at: now,
        updated_at: now,
    };
    let json = serde_json::to_string(&saved).map_err(|e| PersistError::Encode(e.to_string()))?;
    kv.set(&storage_key(&id), json)?;
    store.set_current_workflow_id(Some(id.clone()));
    debug!(workflow_id = %id, name = %name, "workflow saved");
    Ok(id)
}

/// Loads a named workflow and replaces the live graph with it. Returns
/// `Ok(false)` when no workflow is stored under the id, which is a stale
/// reference rather than an error.
pub fn load_saved(
    store: &mut WorkflowStore,
    kv: &dyn KeyValueStore,
    workflow_id: &str,
) -> Result<bool, PersistError> {
    let key = storage_key(workflow_id);
    let Some(json) = kv.get(&key)? else {
        debug!(workflow_id = %workflow_id, "load for unknown workflow ignored");
        return Ok(false);
    };
    let saved: SavedWorkflow = serde_json::from_str(&json).map_err(|e| PersistError::Decode {
        key,
        message: e.to_string(),
    })?;
    store.replace_graph(saved.nodes, saved.edges);
    store.set_current_workflow_id(Some(saved.id));
    Ok(true)
}

/// Removes a named workflow from the persistence collaborator.
pub fn delete_saved(kv: &mut dyn KeyValueStore, workflow_id: &str) -> Result<(), PersistError> {
    kv.remove(&storage_key(workflow_id))
}
