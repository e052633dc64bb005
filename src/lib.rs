//! # Weft - Workflow Graph Core
//!
//! **Weft** is the graph core of a node-based AI workflow builder. Users of
//! the surrounding application drag nodes (text input, image input, LLM
//! invocation) onto a canvas and wire them together; this crate owns
//! everything below the canvas: the typed workflow graph, the mutation
//! rules, a bounded undo/redo history, the connection rule table, and the
//! JSON document codec used for export, import and named save/load.
//!
//! ## Core Workflow
//!
//! 1.  **Mutate**: UI collaborators call the [`store::WorkflowStore`]
//!     operations (add/update/delete node, connect, disconnect, batched
//!     changes). The store validates, snapshots prior state for undo, and
//!     notifies subscribers.
//! 2.  **Validate**: proposed connections pass through the pure rule table
//!     in [`rules`] before an edge is accepted.
//! 3.  **Persist**: the [`document`] codec serializes the graph to the
//!     workflow document envelope for export/import, and wraps it for the
//!     key-value persistence collaborator on named saves.
//! 4.  **Run**: the external generative-AI service stays outside the crate.
//!     [`inference`] assembles the request envelope for an LLM node from its
//!     incoming edges; the eventual outcome arrives back as ordinary
//!     attribute patches.
//!
//! ## Quick Start
//!
//! ```rust
//! use weft::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut store = WorkflowStore::new();
//!
//!     // Build a minimal prompt chain: a text node feeding an LLM node.
//!     let text = store.add_node(NodeKind::Text, Position::new(0.0, 0.0));
//!     let llm = store.add_node(NodeKind::Llm, Position::new(320.0, 0.0));
//!     store.update_node(&text, NodePatch::text("Summarize the attached image."));
//!     store.connect(Connection::new(&text, handle::TEXT, &llm, handle::USER_MESSAGE))?;
//!
//!     // Every mutation snapshotted prior state, so this unwinds cleanly.
//!     store.undo();
//!     store.redo();
//!
//!     // Assemble the request the embedding application sends to its
//!     // inference backend, and store the outcome it got back.
//!     let request = assemble_request(&store, &llm)?;
//!     assert_eq!(request.user_message, "Summarize the attached image.");
//!     complete_run(&mut store, &llm, InferenceResponse::text("A quiet harbor at dusk."));
//!
//!     // Export the graph as a workflow document.
//!     let json = export_document(&store)?;
//!     assert!(json.contains("formatVersion"));
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod graph;
pub mod inference;
pub mod prelude;
pub mod rules;
pub mod store;
