use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Model preselected on freshly created LLM nodes.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The three node kinds the workflow builder knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Text,
    Image,
    Llm,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Text => write!(f, "text"),
            NodeKind::Image => write!(f, "image"),
            NodeKind::Llm => write!(f, "llm"),
        }
    }
}

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The offset applied when duplicating a node, so the copy does not land
    /// exactly on top of the original.
    pub fn offset_for_duplicate(self) -> Self {
        Self {
            x: self.x + 50.0,
            y: self.y + 50.0,
        }
    }
}

/// Attributes of a text input node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextData {
    #[serde(alias = "value")]
    pub text: String,
}

/// Attributes of an image input node. `image_data` holds a base64 data URI;
/// the core never decodes it, only passes it through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageData {
    #[serde(alias = "image")]
    pub image_data: String,
}

/// Attributes of an LLM invocation node.
///
/// `is_running`, `response` and `error` are the result channel of the
/// external inference collaborator: the eventual outcome of a run arrives as
/// an ordinary attribute patch, never as control flow through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmData {
    pub model: String,
    pub system_prompt: String,
    #[serde(alias = "isLoading")]
    pub is_running: bool,
    #[serde(alias = "lastResponse", skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(alias = "lastError", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for LlmData {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: String::new(),
            is_running: false,
            response: None,
            error: None,
        }
    }
}

/// Kind-specific node attributes as a tagged union, so every read site
/// matches exhaustively instead of probing an untyped attribute bag.
///
/// Serialized adjacently tagged as `"type"`/`"data"` with lowercase kind
/// names, which keeps the wire format of the original canvas JSON:
/// `{"type": "text", "data": {"text": "..."}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeData {
    Text(TextData),
    Image(ImageData),
    Llm(LlmData),
}

impl NodeData {
    /// Kind-specific default attributes used by the "add node" operation.
    pub fn defaults(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Text => NodeData::Text(TextData::default()),
            NodeKind::Image => NodeData::Image(ImageData::default()),
            NodeKind::Llm => NodeData::Llm(LlmData::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Image(_) => NodeKind::Image,
            NodeData::Llm(_) => NodeKind::Llm,
        }
    }

    /// Applies a shallow merge of `patch` onto these attributes and returns
    /// the merged result. Fields absent from the patch are untouched.
    ///
    /// Returns `None` when the patch targets a different node kind; the
    /// store treats that as a stale-reference no-op.
    pub fn merged(&self, patch: &NodePatch) -> Option<NodeData> {
        match (self, patch) {
            (NodeData::Text(data), NodePatch::Text(patch)) => {
                let mut data = data.clone();
                if let Some(text) = &patch.text {
                    data.text = text.clone();
                }
                Some(NodeData::Text(data))
            }
            (NodeData::Image(data), NodePatch::Image(patch)) => {
                let mut data = data.clone();
                if let Some(image_data) = &patch.image_data {
                    data.image_data = image_data.clone();
                }
                Some(NodeData::Image(data))
            }
            (NodeData::Llm(data), NodePatch::Llm(patch)) => {
                let mut data = data.clone();
                if let Some(model) = &patch.model {
                    data.model = model.clone();
                }
                if let Some(system_prompt) = &patch.system_prompt {
                    data.system_prompt = system_prompt.clone();
                }
                if let Some(is_running) = patch.is_running {
                    data.is_running = is_running;
                }
                if let Some(response) = &patch.response {
                    data.response = response.clone();
                }
                if let Some(error) = &patch.error {
                    data.error = error.clone();
                }
                Some(NodeData::Llm(data))
            }
            _ => None,
        }
    }
}

/// Partial update of a text node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextPatch {
    pub text: Option<String>,
}

/// Partial update of an image node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImagePatch {
    pub image_data: Option<String>,
}

/// Partial update of an LLM node.
///
/// `response` and `error` are clearable, so they use a double `Option`:
/// the outer `None` leaves the field untouched, `Some(None)` clears it,
/// `Some(Some(..))` sets it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LlmPatch {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub is_running: Option<bool>,
    pub response: Option<Option<String>>,
    pub error: Option<Option<String>>,
}

/// A shallow attribute merge for "update node", mirroring [`NodeData`]
/// variant for variant.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    Text(TextPatch),
    Image(ImagePatch),
    Llm(LlmPatch),
}

impl NodePatch {
    /// Patch that sets a text node's content.
    pub fn text(text: impl Into<String>) -> Self {
        NodePatch::Text(TextPatch {
            text: Some(text.into()),
        })
    }

    /// Patch that sets an image node's data URI.
    pub fn image(image_data: impl Into<String>) -> Self {
        NodePatch::Image(ImagePatch {
            image_data: Some(image_data.into()),
        })
    }

    /// Patch that overwrites every attribute with the values of `data`.
    /// Used by node duplication to copy attributes onto the fresh node.
    pub fn replace(data: &NodeData) -> Self {
        match data {
            NodeData::Text(data) => NodePatch::Text(TextPatch {
                text: Some(data.text.clone()),
            }),
            NodeData::Image(data) => NodePatch::Image(ImagePatch {
                image_data: Some(data.image_data.clone()),
            }),
            NodeData::Llm(data) => NodePatch::Llm(LlmPatch {
                model: Some(data.model.clone()),
                system_prompt: Some(data.system_prompt.clone()),
                is_running: Some(data.is_running),
                response: Some(data.response.clone()),
                error: Some(data.error.clone()),
            }),
        }
    }
}

/// A single node of the workflow graph.
///
/// The `id` is immutable and unique for the graph's lifetime. The serialized
/// form flattens [`NodeData`]'s tag next to `id` and `position`, producing
/// the canvas-compatible shape `{"id", "type", "position", "data"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(flatten)]
    pub data: NodeData,
}

impl Node {
    /// Creates a node of the given kind with default attributes and a fresh
    /// unique id.
    pub fn new(kind: NodeKind, position: Position) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            position,
            data: NodeData::defaults(kind),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}
