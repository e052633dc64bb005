//! The workflow graph store.
//!
//! [`WorkflowStore`] is the sole mutable owner of the live graph: it decides
//! which mutations are legal, snapshots prior state into a bounded undo
//! history, and notifies subscribers after every state change. All
//! operations on missing node or edge ids are silent no-ops, so a stale
//! reference from a deferred UI callback can never corrupt state or panic.

use crate::error::ConnectionRejected;
use crate::graph::{Connection, Edge, Node, NodeKind, NodePatch, Position};
use crate::rules;
use ahash::AHashSet;
use std::fmt;
use tracing::{debug, warn};

mod change;
mod history;

pub use change::GraphChange;
pub use history::{HISTORY_LIMIT, History, Snapshot};

/// Notification emitted to subscribers after a state change was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    NodeAdded { id: String },
    NodeChanged { id: String },
    NodeRemoved { id: String },
    EdgeAdded { id: String },
    EdgeRemoved { id: String },
    SelectionChanged { id: Option<String> },
    /// An undo or redo replaced the live state with a snapshot.
    HistoryMoved,
    /// An import or load replaced the whole graph.
    GraphReplaced,
}

/// Callback invoked for every [`StoreEvent`].
pub type Subscriber = Box<dyn FnMut(&StoreEvent) + Send>;

/// The mutable owner of a workflow graph with bounded undo/redo history.
#[derive(Default)]
pub struct WorkflowStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    selected: Option<String>,
    current_workflow_id: Option<String>,
    history: History,
    subscribers: Vec<Subscriber>,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Read access ---

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Id of the named workflow the graph was last saved to or loaded from.
    pub fn current_workflow_id(&self) -> Option<&str> {
        self.current_workflow_id.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Registers a subscriber that is invoked after every state change.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    // --- Mutations ---

    /// Adds a node of the given kind with default attributes, selects it,
    /// and returns its id. Always succeeds.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> String {
        self.commit();
        let node = Node::new(kind, position);
        let id = node.id.clone();
        debug!(node_id = %id, %kind, "node added");
        self.nodes.push(node);
        self.emit(StoreEvent::NodeAdded { id: id.clone() });
        self.selected = Some(id.clone());
        self.emit(StoreEvent::SelectionChanged {
            id: Some(id.clone()),
        });
        id
    }

    /// Shallow-merges `patch` into the node's attributes. A merge that
    /// leaves the attributes structurally identical is a complete no-op and
    /// records no history entry; unknown ids and kind-mismatched patches are
    /// ignored.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) {
        let Some(index) = self.nodes.iter().position(|node| node.id == id) else {
            debug!(node_id = %id, "update for unknown node ignored");
            return;
        };
        let Some(merged) = self.nodes[index].data.merged(&patch) else {
            warn!(node_id = %id, "attribute patch for mismatched node kind ignored");
            return;
        };
        if merged == self.nodes[index].data {
            return;
        }
        self.commit();
        self.nodes[index].data = merged;
        self.emit(StoreEvent::NodeChanged { id: id.to_string() });
    }

    /// Removes the node and every edge with it as source or target, and
    /// clears the selection if the node was selected. No-op if absent.
    pub fn delete_node(&mut self, id: &str) {
        if self.node(id).is_none() {
            debug!(node_id = %id, "delete for unknown node ignored");
            return;
        }
        self.commit();
        self.remove_node_inner(id);
    }

    /// Validates the proposed connection and appends a new edge on approval.
    ///
    /// Returns `Ok(Some(edge_id))` when the edge was added, `Ok(None)` when
    /// either endpoint no longer exists (a stale drag is not an error), and
    /// `Err` when the rule table rejects the pair, in which case the graph
    /// is left untouched. Duplicate edges between the same endpoints are
    /// permitted.
    pub fn connect(
        &mut self,
        connection: Connection,
    ) -> Result<Option<String>, ConnectionRejected> {
        let Some(source_kind) = self.node(&connection.source).map(Node::kind) else {
            debug!(source = %connection.source, "connect from stale source ignored");
            return Ok(None);
        };
        let Some(target_kind) = self.node(&connection.target).map(Node::kind) else {
            debug!(target = %connection.target, "connect to stale target ignored");
            return Ok(None);
        };
        rules::validate(
            source_kind,
            &connection.source_handle,
            target_kind,
            &connection.target_handle,
        )
        .map_err(|rejection| {
            warn!(%rejection, "connection rejected");
            rejection
        })?;

        self.commit();
        let edge = Edge::new(
            connection.source,
            connection.source_handle,
            connection.target,
            connection.target_handle,
        );
        let id = edge.id.clone();
        debug!(edge_id = %id, "edge added");
        self.edges.push(edge);
        self.emit(StoreEvent::EdgeAdded { id: id.clone() });
        Ok(Some(id))
    }

    /// Removes a single edge. No-op if absent.
    pub fn disconnect(&mut self, edge_id: &str) {
        if self.edge(edge_id).is_none() {
            debug!(edge_id = %edge_id, "disconnect for unknown edge ignored");
            return;
        }
        self.commit();
        self.remove_edge_inner(edge_id);
    }

    /// Applies a batch of changes atomically. The batch snapshots history at
    /// most once, and only when at least one entry is not a pure selection
    /// change.
    pub fn apply(&mut self, changes: Vec<GraphChange>) {
        if changes.is_empty() {
            return;
        }
        if changes.iter().any(|change| !change.is_selection()) {
            self.commit();
        }
        for change in changes {
            self.apply_one(change);
        }
    }

    /// Updates the selection. Pure UI state: never snapshotted, and a
    /// selection of an unknown node is ignored.
    pub fn set_selected(&mut self, id: Option<&str>) {
        let next = match id {
            Some(id) => {
                if self.node(id).is_none() {
                    debug!(node_id = %id, "select of unknown node ignored");
                    return;
                }
                Some(id.to_string())
            }
            None => None,
        };
        if self.selected == next {
            return;
        }
        self.selected = next;
        self.emit(StoreEvent::SelectionChanged {
            id: self.selected.clone(),
        });
    }

    /// Restores the most recent snapshot, moving the current live state to
    /// the redo stack. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_past() else {
            return false;
        };
        let current = self.snapshot();
        self.history.push_future(current);
        self.restore(snapshot);
        debug!("undo applied");
        self.emit(StoreEvent::HistoryMoved);
        true
    }

    /// Symmetric inverse of [`undo`](Self::undo). Returns false when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_future() else {
            return false;
        };
        let current = self.snapshot();
        self.history.push_past(current);
        self.restore(snapshot);
        debug!("redo applied");
        self.emit(StoreEvent::HistoryMoved);
        true
    }

    /// Adds a node of the same kind at a +50/+50 offset and copies all
    /// attributes onto it. Two history entries, the same as performing the
    /// operations by hand. Returns the new id, or `None` if the source node
    /// is unknown.
    pub fn duplicate_node(&mut self, id: &str) -> Option<String> {
        let original = self.node(id)?.clone();
        let new_id = self.add_node(original.kind(), original.position.offset_for_duplicate());
        self.update_node(&new_id, NodePatch::replace(&original.data));
        Some(new_id)
    }

    /// Replaces the whole graph, clearing selection, history and the current
    /// workflow id. Edges whose endpoints did not arrive with the new node
    /// set are dropped to keep referential integrity.
    pub(crate) fn replace_graph(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        let known: AHashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
        let edges: Vec<Edge> = edges
            .into_iter()
            .filter(|edge| {
                let intact = known.contains(edge.source.as_str())
                    && known.contains(edge.target.as_str());
                if !intact {
                    warn!(edge_id = %edge.id, "dropping edge with missing endpoint");
                }
                intact
            })
            .collect();
        self.nodes = nodes;
        self.edges = edges;
        self.selected = None;
        self.current_workflow_id = None;
        self.history.clear();
        self.emit(StoreEvent::GraphReplaced);
    }

    pub(crate) fn set_current_workflow_id(&mut self, id: Option<String>) {
        self.current_workflow_id = id;
    }

    // --- Internals ---

    fn apply_one(&mut self, change: GraphChange) {
        match change {
            GraphChange::AddNode(node) => {
                self.insert_node_inner(node);
            }
            GraphChange::MoveNode { id, position } => self.move_node_inner(&id, position),
            GraphChange::UpdateNode { id, patch } => self.patch_node_inner(&id, patch),
            GraphChange::RemoveNode { id } => {
                self.remove_node_inner(&id);
            }
            GraphChange::AddEdge(edge) => {
                self.insert_edge_inner(edge);
            }
            GraphChange::RemoveEdge { id } => {
                self.remove_edge_inner(&id);
            }
            GraphChange::Select(id) => self.set_selected(id.as_deref()),
        }
    }

    fn insert_node_inner(&mut self, node: Node) {
        if self.node(&node.id).is_some() {
            warn!(node_id = %node.id, "node with duplicate id ignored");
            return;
        }
        let id = node.id.clone();
        self.nodes.push(node);
        self.emit(StoreEvent::NodeAdded { id });
    }

    fn move_node_inner(&mut self, id: &str, position: Position) {
        let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) else {
            return;
        };
        node.position = position;
        self.emit(StoreEvent::NodeChanged { id: id.to_string() });
    }

    fn patch_node_inner(&mut self, id: &str, patch: NodePatch) {
        let Some(index) = self.nodes.iter().position(|node| node.id == id) else {
            return;
        };
        let Some(merged) = self.nodes[index].data.merged(&patch) else {
            warn!(node_id = %id, "attribute patch for mismatched node kind ignored");
            return;
        };
        if merged != self.nodes[index].data {
            self.nodes[index].data = merged;
            self.emit(StoreEvent::NodeChanged { id: id.to_string() });
        }
    }

    fn remove_node_inner(&mut self, id: &str) {
        let Some(index) = self.nodes.iter().position(|node| node.id == id) else {
            return;
        };
        self.nodes.remove(index);
        let mut removed = Vec::new();
        self.edges.retain(|edge| {
            if edge.touches(id) {
                removed.push(edge.id.clone());
                false
            } else {
                true
            }
        });
        for edge_id in removed {
            self.emit(StoreEvent::EdgeRemoved { id: edge_id });
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.emit(StoreEvent::SelectionChanged { id: None });
        }
        debug!(node_id = %id, "node removed");
        self.emit(StoreEvent::NodeRemoved { id: id.to_string() });
    }

    fn insert_edge_inner(&mut self, edge: Edge) {
        if self.edge(&edge.id).is_some() {
            warn!(edge_id = %edge.id, "edge with duplicate id ignored");
            return;
        }
        if self.node(&edge.source).is_none() || self.node(&edge.target).is_none() {
            debug!(edge_id = %edge.id, "edge with missing endpoint ignored");
            return;
        }
        let id = edge.id.clone();
        self.edges.push(edge);
        self.emit(StoreEvent::EdgeAdded { id });
    }

    fn remove_edge_inner(&mut self, id: &str) {
        let Some(index) = self.edges.iter().position(|edge| edge.id == id) else {
            return;
        };
        self.edges.remove(index);
        self.emit(StoreEvent::EdgeRemoved { id: id.to_string() });
    }

    /// Records the current live state as an undo snapshot, invalidating any
    /// redo branch.
    fn commit(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            selected: self.selected.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        self.selected = snapshot.selected;
    }

    fn emit(&mut self, event: StoreEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }
}

impl fmt::Debug for WorkflowStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowStore")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("selected", &self.selected)
            .field("current_workflow_id", &self.current_workflow_id)
            .field("history", &self.history)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
