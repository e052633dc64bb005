//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from
//! the weft crate. Import this module to get access to the core
//! functionality without having to import each type individually.
//!
//! # Example
//!
//! ```rust
//! use weft::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let mut store = WorkflowStore::new();
//! let text = store.add_node(NodeKind::Text, Position::new(0.0, 0.0));
//! let llm = store.add_node(NodeKind::Llm, Position::new(300.0, 0.0));
//! store.connect(Connection::new(&text, handle::TEXT, &llm, handle::USER_MESSAGE))?;
//!
//! let json = export_document(&store)?;
//! println!("{json}");
//! # Ok(())
//! # }
//! ```

// The graph store and its operations
pub use crate::store::{GraphChange, HISTORY_LIMIT, StoreEvent, Subscriber, WorkflowStore};

// Graph model types
pub use crate::graph::{
    Connection, DEFAULT_MODEL, Edge, ImageData, ImagePatch, LlmData, LlmPatch, Node, NodeData,
    NodeKind, NodePatch, Position, TextData, TextPatch, handle,
};

// Connection validation
pub use crate::rules::validate;

// Document codec and persistence
pub use crate::document::{
    DocumentMetadata, FORMAT_VERSION, InMemoryKvStore, KeyValueStore, SavedWorkflow,
    WorkflowDocument, delete_saved, export_document, import_document, load_saved, save_named,
    storage_key,
};

// Inference envelope
pub use crate::inference::{
    InferenceRequest, InferenceResponse, MODELS, ModelInfo, assemble_request, begin_run,
    complete_run,
};

// Error types
pub use crate::error::{ConnectionRejected, DocumentError, PersistError, RequestError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
