//! Processing Order
//!
//! Branches are processed upstream first: a branch tracking another local
//! branch is only visited after that branch. Only nodes with at least one
//! upstream take part in the ordering, since branches that track nothing
//! have nothing to pull.
//!
//! # Algorithm
//!
//! Kahn's algorithm, layer by layer:
//!
//! 1. Count, for every pending node, how many of its upstreams are pending
//! 2. The first layer holds the nodes whose count is zero
//! 3. Emitting a layer decrements the counts of its pending downstreams;
//!    those that reach zero form the next layer
//! 4. Each layer is sorted by label so the output is reproducible
//!
//! Nodes caught in a cycle never reach zero. They are left out of the
//! result instead of failing the sort; [`BranchGraph::unordered`] lists them
//! for callers that want to be strict.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::node::NodeId;
use super::store::BranchGraph;

/// Which branches take part in processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Every branch with an upstream.
    #[default]
    All,
    /// Only branches whose upstreams all live in the local repository.
    LocalOnly,
}

impl BranchGraph {
    /// Layers of the processing order.
    ///
    /// Every node in a layer only depends on nodes of earlier layers or on
    /// nodes without upstreams.
    pub fn layers(&self) -> Vec<Vec<NodeId>> {
        let pending: IndexSet<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.has_upstreams())
            .map(|n| n.id())
            .collect();

        let mut in_degree: IndexMap<NodeId, usize> = IndexMap::with_capacity(pending.len());
        let mut layer = Vec::new();
        for &id in &pending {
            let degree = self.nodes[&id]
                .upstreams()
                .keys()
                .filter(|u| pending.contains(*u))
                .count();
            in_degree.insert(id, degree);
            if degree == 0 {
                layer.push(id);
            }
        }

        let mut layers = Vec::new();
        while !layer.is_empty() {
            self.sort_ids(&mut layer);

            let mut next = Vec::new();
            for id in &layer {
                for downstream in self.nodes[id].downstreams() {
                    if let Some(degree) = in_degree.get_mut(downstream) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 {
                            next.push(*downstream);
                        }
                    }
                }
            }

            layers.push(layer);
            layer = next;
        }

        let ordered: usize = layers.iter().map(Vec::len).sum();
        if ordered < pending.len() {
            warn!(
                skipped = pending.len() - ordered,
                "dependency cycle detected, some branches were left out of the order"
            );
        }

        layers
    }

    /// All nodes with an upstream, upstreams first.
    ///
    /// Nodes that are part of a dependency cycle (or depend on one) are
    /// silently missing from the result.
    pub fn sort(&self) -> Vec<NodeId> {
        self.layers().into_iter().flatten().collect()
    }

    /// Nodes with upstreams that [`sort`](Self::sort) could not place,
    /// sorted by label.
    pub fn unordered(&self) -> Vec<NodeId> {
        let sorted: IndexSet<NodeId> = self.sort().into_iter().collect();
        let mut rest: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.has_upstreams() && !sorted.contains(&n.id()))
            .map(|n| n.id())
            .collect();
        self.sort_ids(&mut rest);
        rest
    }

    /// Whether every upstream of `id` lives in the local repository.
    pub fn tracks_only_local(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| {
            node.upstreams()
                .keys()
                .all(|u| self.nodes.get(u).is_some_and(|up| up.is_local()))
        })
    }

    /// The sort restricted to `scope`.
    pub fn processing_order(&self, scope: Scope) -> Vec<NodeId> {
        let order = self.sort();
        match scope {
            Scope::All => order,
            Scope::LocalOnly => order
                .into_iter()
                .filter(|id| self.tracks_only_local(*id))
                .collect(),
        }
    }
}
