//! Graph Nodes
//!
//! This module defines the node record stored in the branch graph.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use super::reference::Reference;

/// Handle to a node in a [`BranchGraph`](super::BranchGraph).
///
/// Ids are handed out by the owning graph in creation order, so two graphs
/// built from the same input use the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A branch in the dependency graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for this node.
    id: NodeId,

    /// Identity of the branch. Never changes.
    reference: Reference,

    /// Short human name, e.g. `main` or `origin/main`. Empty until resolved.
    branch: String,

    /// Branches this one tracks, with the `branch.<name>.merge` value that
    /// produced each edge.
    upstreams: IndexMap<NodeId, String>,

    /// Branches tracking this one.
    downstreams: IndexSet<NodeId>,
}

impl Node {
    /// Create a node without edges or branch name.
    pub(crate) fn new(id: NodeId, reference: Reference) -> Self {
        Self {
            id,
            reference,
            branch: String::new(),
            upstreams: IndexMap::new(),
            downstreams: IndexSet::new(),
        }
    }

    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The reference key this node was created for.
    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    /// The resolved branch name, empty if none was set.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Set the resolved branch name used as label.
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    /// Display label: the branch name, or the ref name while unresolved.
    pub fn label(&self) -> &str {
        if self.branch.is_empty() {
            &self.reference.name
        } else {
            &self.branch
        }
    }

    /// Whether the node lives in the local repository.
    pub fn is_local(&self) -> bool {
        self.reference.is_local()
    }

    /// Upstream nodes with the reason each edge was recorded for.
    pub fn upstreams(&self) -> &IndexMap<NodeId, String> {
        &self.upstreams
    }

    /// Nodes that track this one.
    pub fn downstreams(&self) -> &IndexSet<NodeId> {
        &self.downstreams
    }

    /// Whether this node tracks anything.
    pub fn has_upstreams(&self) -> bool {
        !self.upstreams.is_empty()
    }

    /// The reason recorded for the edge to `upstream`, if any.
    pub fn reason(&self, upstream: NodeId) -> Option<&str> {
        self.upstreams.get(&upstream).map(String::as_str)
    }

    // Edge bookkeeping is only reachable through the graph, which updates
    // both endpoints together.

    pub(super) fn insert_upstream(&mut self, upstream: NodeId, reason: String) {
        self.upstreams.insert(upstream, reason);
    }

    pub(super) fn remove_upstream(&mut self, upstream: NodeId) -> Option<String> {
        self.upstreams.shift_remove(&upstream)
    }

    pub(super) fn insert_downstream(&mut self, downstream: NodeId) {
        self.downstreams.insert(downstream);
    }

    pub(super) fn remove_downstream(&mut self, downstream: NodeId) -> bool {
        self.downstreams.shift_remove(&downstream)
    }
}
