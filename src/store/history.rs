use crate::graph::{Edge, Node};
use std::collections::VecDeque;

/// Maximum number of undo snapshots retained. Once the cap is reached the
/// oldest snapshot is evicted first.
pub const HISTORY_LIMIT: usize = 50;

/// An owned deep copy of the graph state at a point in time. Snapshots are
/// exclusively owned by the history that holds them and never alias the
/// live graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub selected: Option<String>,
}

/// Bounded undo/redo history.
///
/// `past` runs older to newer; `future` runs newer to older in undo order.
/// Recording any new snapshot clears `future`: branching history is not
/// supported, so redo is only valid directly after undo.
#[derive(Debug, Default)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: VecDeque<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-mutation state of the graph and invalidates any redo
    /// branch.
    pub(crate) fn record(&mut self, snapshot: Snapshot) {
        self.push_past(snapshot);
        self.future.clear();
    }

    pub(crate) fn push_past(&mut self, snapshot: Snapshot) {
        if self.past.len() == HISTORY_LIMIT {
            self.past.pop_front();
        }
        self.past.push_back(snapshot);
    }

    pub(crate) fn pop_past(&mut self) -> Option<Snapshot> {
        self.past.pop_back()
    }

    pub(crate) fn push_future(&mut self, snapshot: Snapshot) {
        self.future.push_front(snapshot);
    }

    pub(crate) fn pop_future(&mut self) -> Option<Snapshot> {
        self.future.pop_front()
    }

    pub(crate) fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
