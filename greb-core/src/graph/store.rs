//! Graph Store
//!
//! The branch graph owns every node. Nodes refer to each other by
//! [`NodeId`] only, and the two directions of an edge are always updated
//! together by the graph.

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::node::{Node, NodeId};
use super::reference::Reference;

/// Dependency graph of branches.
#[derive(Debug, Default, Clone)]
pub struct BranchGraph {
    /// All nodes, in creation order.
    pub(super) nodes: IndexMap<NodeId, Node>,

    /// Reference key to node lookup.
    index: IndexMap<Reference, NodeId>,

    next_id: u64,
}

impl BranchGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the node for `reference`, creating it if needed.
    ///
    /// The flag is `true` when the node already existed.
    pub fn node(&mut self, reference: Reference) -> (NodeId, bool) {
        if let Some(&id) = self.index.get(&reference) {
            return (id, true);
        }

        let id = NodeId::from(self.next_id);
        self.next_id += 1;
        trace!(%id, %reference, "creating node");
        self.index.insert(reference.clone(), id);
        self.nodes.insert(id, Node::new(id, reference));
        (id, false)
    }

    /// Record that `downstream` tracks `upstream` because of `reason`.
    ///
    /// Linking the same pair again only replaces the reason. Self edges and
    /// unknown ids are ignored.
    pub fn edge(&mut self, downstream: NodeId, upstream: NodeId, reason: impl Into<String>) {
        if downstream == upstream {
            debug!(node = %downstream, "ignoring self edge");
            return;
        }
        if !self.nodes.contains_key(&downstream) || !self.nodes.contains_key(&upstream) {
            return;
        }

        let reason = reason.into();
        trace!(%downstream, %upstream, %reason, "adding edge");
        if let Some(node) = self.nodes.get_mut(&downstream) {
            node.insert_upstream(upstream, reason);
        }
        if let Some(node) = self.nodes.get_mut(&upstream) {
            node.insert_downstream(downstream);
        }
    }

    /// Drop a node together with its edges, without re-parenting anything.
    ///
    /// Returns `false` if the node was not in the graph.
    pub fn discard(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.shift_remove(&id) else {
            return false;
        };
        self.index.shift_remove(node.reference());

        for upstream in node.upstreams().keys() {
            if let Some(up) = self.nodes.get_mut(upstream) {
                up.remove_downstream(id);
            }
        }
        for downstream in node.downstreams() {
            if let Some(down) = self.nodes.get_mut(downstream) {
                down.remove_upstream(id);
            }
        }

        debug!(%id, reference = %node.reference(), "discarded node");
        true
    }

    /// Get a reference to a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    ///
    /// Only the label can be changed this way; edges go through
    /// [`edge`](Self::edge) and [`remove`](Self::remove).
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Look up a node by reference without creating it.
    pub fn find(&self, reference: &Reference) -> Option<NodeId> {
        self.index.get(reference).copied()
    }

    /// Check whether a node is in the graph.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Label of a node, empty for unknown ids.
    pub fn label(&self, id: NodeId) -> &str {
        self.nodes.get(&id).map(Node::label).unwrap_or_default()
    }

    /// Get the total number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Nodes sorted by label, ties broken by reference.
    pub fn nodes_by_label(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        nodes.sort_by(|a, b| {
            a.label()
                .cmp(b.label())
                .then_with(|| a.reference().cmp(b.reference()))
        });
        nodes
    }

    /// Sort ids by label, ties broken by reference.
    pub(crate) fn sort_ids(&self, ids: &mut [NodeId]) {
        ids.sort_by(|a, b| {
            let (na, nb) = (&self.nodes[a], &self.nodes[b]);
            na.label()
                .cmp(nb.label())
                .then_with(|| na.reference().cmp(nb.reference()))
        });
    }
}
