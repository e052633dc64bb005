//! The inference request envelope.
//!
//! The external generative-AI service is an opaque collaborator: the core
//! assembles a request for an LLM node from its incoming edges, and the
//! eventual outcome comes back as ordinary attribute patches on the node
//! (`is_running`, `response`, `error`). Nothing here performs I/O.

use crate::error::RequestError;
use crate::graph::{LlmPatch, NodeData, NodePatch, handle};
use crate::store::WorkflowStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crate::graph::DEFAULT_MODEL;

pub const MAX_USER_MESSAGE_LEN: usize = 10_000;
pub const MAX_SYSTEM_PROMPT_LEN: usize = 2_000;
pub const MAX_IMAGES: usize = 16;

/// A model offered by the inference collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// The models the workflow builder offers for LLM nodes.
pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "gemini-2.5-flash",
        name: "Gemini 2.5 Flash",
        description: "Fast, versatile model",
    },
    ModelInfo {
        id: "gemini-2.5-pro",
        name: "Gemini 2.5 Pro",
        description: "Most capable model",
    },
    ModelInfo {
        id: "gemini-2.0-flash",
        name: "Gemini 2.0 Flash",
        description: "Balanced performance",
    },
    ModelInfo {
        id: "gemini-2.0-flash-exp",
        name: "Gemini 2.0 Flash Experimental",
        description: "Latest features",
    },
    ModelInfo {
        id: "gemini-2.5-flash-lite",
        name: "Gemini 2.5 Flash Lite",
        description: "Lightweight, efficient",
    },
];

pub fn is_known_model(id: &str) -> bool {
    MODELS.iter().any(|model| model.id == id)
}

/// Request shape of the inference collaborator. Images are base64 data URIs
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRequest {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub user_message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl InferenceRequest {
    /// Checks the request against the collaborator's documented limits.
    pub fn validate(&self) -> Result<(), RequestError> {
        if !is_known_model(&self.model) {
            return Err(RequestError::UnknownModel(self.model.clone()));
        }
        if self.user_message.is_empty() {
            return Err(RequestError::EmptyUserMessage);
        }
        if self.user_message.len() > MAX_USER_MESSAGE_LEN {
            return Err(RequestError::UserMessageTooLong {
                len: self.user_message.len(),
                max: MAX_USER_MESSAGE_LEN,
            });
        }
        if let Some(system_prompt) = &self.system_prompt {
            if system_prompt.len() > MAX_SYSTEM_PROMPT_LEN {
                return Err(RequestError::SystemPromptTooLong {
                    len: system_prompt.len(),
                    max: MAX_SYSTEM_PROMPT_LEN,
                });
            }
        }
        if self.images.len() > MAX_IMAGES {
            return Err(RequestError::TooManyImages {
                count: self.images.len(),
                max: MAX_IMAGES,
            });
        }
        if let Some(index) = self
            .images
            .iter()
            .position(|image| !image.starts_with("data:image/"))
        {
            return Err(RequestError::InvalidImageData { index });
        }
        Ok(())
    }
}

/// Response shape of the inference collaborator: `{text}` on success,
/// `{error}` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InferenceResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            error: Some(message.into()),
        }
    }
}

/// Assembles the inference request for an LLM node from its incoming edges:
/// the user message from the `user_message` input, the system prompt from
/// the `system_prompt` input (falling back to the node's own attribute),
/// and every image connected to the `images` fan-in, in edge order.
pub fn assemble_request(
    store: &WorkflowStore,
    node_id: &str,
) -> Result<InferenceRequest, RequestError> {
    let node = store
        .node(node_id)
        .ok_or_else(|| RequestError::NodeNotFound(node_id.to_string()))?;
    let NodeData::Llm(llm) = &node.data else {
        return Err(RequestError::NotAnLlmNode(node_id.to_string()));
    };

    let user_message = store
        .edges()
        .iter()
        .find(|edge| edge.target == node_id && edge.target_handle == handle::USER_MESSAGE)
        .map(|edge| connected_text(store, &edge.source))
        .ok_or(RequestError::MissingUserMessage)?;

    let system_prompt = store
        .edges()
        .iter()
        .find(|edge| edge.target == node_id && edge.target_handle == handle::SYSTEM_PROMPT)
        .map(|edge| connected_text(store, &edge.source))
        .or_else(|| {
            (!llm.system_prompt.is_empty()).then(|| llm.system_prompt.clone())
        });

    let images: Vec<String> = store
        .edges()
        .iter()
        .filter(|edge| edge.target == node_id && edge.target_handle == handle::IMAGES)
        .filter_map(|edge| match &store.node(&edge.source)?.data {
            NodeData::Image(image) if !image.image_data.is_empty() => {
                Some(image.image_data.clone())
            }
            _ => None,
        })
        .collect();

    debug!(node_id = %node_id, images = images.len(), "inference request assembled");
    Ok(InferenceRequest {
        model: llm.model.clone(),
        system_prompt,
        user_message,
        images,
    })
}

/// Marks an LLM node as running and clears any previous outcome. The patch
/// flows through the ordinary update path, so it obeys the same history
/// rules as any other attribute change.
pub fn begin_run(store: &mut WorkflowStore, node_id: &str) {
    store.update_node(
        node_id,
        NodePatch::Llm(LlmPatch {
            is_running: Some(true),
            response: Some(None),
            error: Some(None),
            ..Default::default()
        }),
    );
}

/// Stores the outcome of a run on the originating node. A failure stores
/// the error verbatim, clears `is_running` and leaves `response` unset; it
/// is display state, never control flow.
pub fn complete_run(store: &mut WorkflowStore, node_id: &str, response: InferenceResponse) {
    let patch = match response.error {
        Some(error) => LlmPatch {
            is_running: Some(false),
            response: Some(None),
            error: Some(Some(error)),
            ..Default::default()
        },
        None => LlmPatch {
            is_running: Some(false),
            response: Some(Some(response.text)),
            error: Some(None),
            ..Default::default()
        },
    };
    store.update_node(node_id, NodePatch::Llm(patch));
}

/// Text carried on a node's output: a text node's content or an LLM node's
/// last response. Image nodes carry no text.
fn connected_text(store: &WorkflowStore, node_id: &str) -> String {
    match store.node(node_id).map(|node| &node.data) {
        Some(NodeData::Text(text)) => text.text.clone(),
        Some(NodeData::Llm(llm)) => llm.response.clone().unwrap_or_default(),
        _ => String::new(),
    }
}
