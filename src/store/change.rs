use crate::graph::{Edge, Node, NodePatch, Position};

/// A single entry of a batched change set, mirroring the change events the
/// canvas emits (node drags, deletions, selection updates).
///
/// A batch applied through [`WorkflowStore::apply`] snapshots history at
/// most once, and only when at least one entry is not a pure selection
/// change.
///
/// [`WorkflowStore::apply`]: crate::store::WorkflowStore::apply
#[derive(Debug, Clone, PartialEq)]
pub enum GraphChange {
    /// Insert an already-constructed node. Skipped if the id is taken.
    AddNode(Node),
    /// Move a node to a new canvas position.
    MoveNode { id: String, position: Position },
    /// Shallow-merge attributes onto a node.
    UpdateNode { id: String, patch: NodePatch },
    /// Remove a node and every incident edge.
    RemoveNode { id: String },
    /// Insert an already-constructed edge. The rule table is not consulted
    /// here; the entry replays a change the UI already accepted. Skipped if
    /// either endpoint is missing.
    AddEdge(Edge),
    /// Remove a single edge.
    RemoveEdge { id: String },
    /// Update the selection. Never snapshotted.
    Select(Option<String>),
}

impl GraphChange {
    /// Pure selection changes never pollute undo history.
    pub fn is_selection(&self) -> bool {
        matches!(self, GraphChange::Select(_))
    }
}
