//! Common test utilities for building workflow graphs.
use weft::prelude::*;

/// Adds a text node carrying `content`. Two history entries (add + update).
#[allow(dead_code)]
pub fn text_node(store: &mut WorkflowStore, content: &str) -> String {
    let id = store.add_node(NodeKind::Text, Position::new(0.0, 0.0));
    store.update_node(&id, NodePatch::text(content));
    id
}

/// Adds an image node carrying `data_uri`.
#[allow(dead_code)]
pub fn image_node(store: &mut WorkflowStore, data_uri: &str) -> String {
    let id = store.add_node(NodeKind::Image, Position::new(0.0, 160.0));
    store.update_node(&id, NodePatch::image(data_uri));
    id
}

/// Adds an LLM node with default attributes.
#[allow(dead_code)]
pub fn llm_node(store: &mut WorkflowStore) -> String {
    store.add_node(NodeKind::Llm, Position::new(320.0, 0.0))
}

/// Connects two nodes, panicking if the store rejects or drops the edge.
#[allow(dead_code)]
pub fn connect_ok(
    store: &mut WorkflowStore,
    source: &str,
    source_handle: &str,
    target: &str,
    target_handle: &str,
) -> String {
    store
        .connect(Connection::new(source, source_handle, target, target_handle))
        .expect("connection should be allowed")
        .expect("both endpoints should exist")
}

/// A minimal valid base64 image data URI.
#[allow(dead_code)]
pub fn data_uri() -> String {
    "data:image/png;base64,iVBORw0KGgo=".to_string()
}

/// The full observable graph state, for exact-restore comparisons.
#[allow(dead_code)]
pub fn state(store: &WorkflowStore) -> (Vec<Node>, Vec<Edge>, Option<String>) {
    (
        store.nodes().to_vec(),
        store.edges().to_vec(),
        store.selected().map(str::to_string),
    )
}
