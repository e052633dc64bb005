use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Handle names used by the built-in node kinds. Handles are plain strings
/// on the wire; these constants exist so rule-table rows and traversals
/// cannot drift apart through typos.
pub mod handle {
    /// Text node input and output.
    pub const TEXT: &str = "text";
    /// Image node input and output.
    pub const IMAGE: &str = "image";
    /// LLM response output.
    pub const OUTPUT: &str = "output";
    /// LLM system prompt input.
    pub const SYSTEM_PROMPT: &str = "system_prompt";
    /// LLM user message input.
    pub const USER_MESSAGE: &str = "user_message";
    /// LLM image fan-in input. Multiple edges may target this handle.
    pub const IMAGES: &str = "images";
}

/// A directed, handle-qualified connection between two nodes.
///
/// Both endpoints must reference nodes present in the graph; the store
/// removes an edge as soon as either endpoint node is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_handle: String,
    pub target: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target_handle: String,
}

impl Edge {
    /// Creates an edge with a fresh unique id.
    pub fn new(
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            target_handle: target_handle.into(),
        }
    }

    /// True when `node_id` is either endpoint of this edge.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// A proposed connection, before validation assigned it an edge id.
/// Matches the shape the canvas hands over on a completed drag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_handle: String,
    pub target: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target_handle: String,
}

impl Connection {
    pub fn new(
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            target_handle: target_handle.into(),
        }
    }
}

/// Canvas exports emit `"sourceHandle": null` for default handles; treat
/// that the same as an absent field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
