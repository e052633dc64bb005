use crate::graph::NodeKind;
use thiserror::Error;

/// Returned when the connection rule table rejects a proposed edge.
///
/// A rejection never mutates the graph; it only carries the reason the UI
/// layer should surface next to the refused drag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "connection '{source_kind}:{source_handle}' -> '{target_kind}:{target_handle}' is not allowed: {reason}"
)]
pub struct ConnectionRejected {
    pub source_kind: NodeKind,
    pub source_handle: String,
    pub target_kind: NodeKind,
    pub target_handle: String,
    pub reason: String,
}

/// Errors that can occur while encoding or decoding a workflow document.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    #[error("failed to parse workflow JSON: {0}")]
    Parse(String),

    #[error("failed to serialize workflow document: {0}")]
    Serialize(String),
}

/// Errors that can occur while saving or loading a named workflow through
/// the key-value persistence collaborator.
#[derive(Error, Debug, Clone)]
pub enum PersistError {
    #[error("failed to encode stored workflow: {0}")]
    Encode(String),

    #[error("stored workflow under key '{key}' is corrupt: {message}")]
    Decode { key: String, message: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while assembling or validating an inference request
/// for an LLM node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("node '{0}' not found in the graph")]
    NodeNotFound(String),

    #[error("node '{0}' is not an LLM node")]
    NotAnLlmNode(String),

    #[error("no user message input is connected")]
    MissingUserMessage,

    #[error("user message is empty")]
    EmptyUserMessage,

    #[error("user message too long: {len} characters (max {max})")]
    UserMessageTooLong { len: usize, max: usize },

    #[error("system prompt too long: {len} characters (max {max})")]
    SystemPromptTooLong { len: usize, max: usize },

    #[error("too many images: {count} (max {max})")]
    TooManyImages { count: usize, max: usize },

    #[error("image {index} is not a base64 data URI")]
    InvalidImageData { index: usize },

    #[error("unknown model: '{0}'")]
    UnknownModel(String),
}
