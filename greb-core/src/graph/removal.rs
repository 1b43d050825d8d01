//! Removal and Re-parenting
//!
//! When a branch is deleted, the branches tracking it are moved onto the
//! deleted branch's own upstreams. The graph is updated in place and the
//! configuration changes this implies are returned as [`Update`] records for
//! the caller to apply.
//!
//! git stores a single `branch.<name>.remote` next to any number of
//! `branch.<name>.merge` values, so every upstream of a branch must live in
//! the same remote. When re-parenting would mix remotes, the upstreams from
//! the other remote are dropped: the downstream keeps the ones that fit and
//! simply ends up tracking fewer branches.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::node::NodeId;
use super::store::BranchGraph;
use crate::error::{GraphError, Result};

/// A tracking configuration change implied by a removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Update {
    /// `downstream` stops tracking the merge value `upstream`.
    RemoveUpstream {
        downstream: String,
        upstream: String,
    },
    /// `downstream` now tracks branches of `remote`.
    SetRemote {
        downstream: String,
        remote: String,
    },
    /// `downstream` starts tracking the ref `upstream`.
    AddUpstream {
        downstream: String,
        upstream: String,
    },
}

impl Update {
    /// The branch whose configuration changes.
    pub fn downstream(&self) -> &str {
        match self {
            Self::RemoveUpstream { downstream, .. }
            | Self::SetRemote { downstream, .. }
            | Self::AddUpstream { downstream, .. } => downstream,
        }
    }

    /// Arguments to pass to `git config` to apply the change.
    pub fn git_config_args(&self) -> Vec<String> {
        match self {
            Self::RemoveUpstream { downstream, upstream } => vec![
                "--unset".to_string(),
                format!("branch.{downstream}.merge"),
                format!("^{}$", escape_pattern(upstream)),
            ],
            Self::SetRemote { downstream, remote } => {
                vec![format!("branch.{downstream}.remote"), remote.clone()]
            }
            Self::AddUpstream { downstream, upstream } => vec![
                "--add".to_string(),
                format!("branch.{downstream}.merge"),
                upstream.clone(),
            ],
        }
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoveUpstream { downstream, upstream } => {
                write!(f, "{downstream}: stop tracking {upstream}")
            }
            Self::SetRemote { downstream, remote } => {
                write!(f, "{downstream}: set remote {remote}")
            }
            Self::AddUpstream { downstream, upstream } => {
                write!(f, "{downstream}: start tracking {upstream}")
            }
        }
    }
}

/// Escape the characters `git config` treats specially in value patterns.
fn escape_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl BranchGraph {
    /// Remove `id`, re-parenting its downstreams onto its upstreams.
    ///
    /// For each downstream the updates come in application order: the old
    /// merge value is removed, then the remote is set if it changes, then
    /// the new merge values are added.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<Update>> {
        let node = self.get(id).ok_or(GraphError::UnknownNode(id))?;
        let upstreams: SmallVec<[NodeId; 4]> = node.upstreams().keys().copied().collect();
        let downstreams: SmallVec<[NodeId; 4]> = node.downstreams().iter().copied().collect();
        debug!(%id, label = node.label(), downstreams = downstreams.len(), "removing node");

        let mut updates = Vec::new();
        for downstream in downstreams {
            self.reparent(id, downstream, &upstreams, &mut updates);
        }

        self.discard(id);
        Ok(updates)
    }

    fn reparent(
        &mut self,
        removed: NodeId,
        downstream: NodeId,
        upstreams: &[NodeId],
        updates: &mut Vec<Update>,
    ) {
        let node = &self.nodes[&downstream];
        let label = node.label().to_string();
        let reason = node.reason(removed).unwrap_or_default().to_string();
        updates.push(Update::RemoveUpstream {
            downstream: label.clone(),
            upstream: reason,
        });

        // The remote the downstream keeps after losing `removed`.
        let mut remote = node
            .upstreams()
            .keys()
            .find(|&&u| u != removed)
            .map(|u| self.nodes[u].reference().remote.clone());

        let mut adopted: SmallVec<[NodeId; 4]> = SmallVec::new();
        for &upstream in upstreams {
            if upstream == downstream
                || self.nodes[&downstream].upstreams().contains_key(&upstream)
            {
                continue;
            }
            let reference = self.nodes[&upstream].reference();
            let current = remote.get_or_insert_with(|| {
                updates.push(Update::SetRemote {
                    downstream: label.clone(),
                    remote: reference.remote.clone(),
                });
                reference.remote.clone()
            });
            if *current != reference.remote {
                debug!(
                    downstream = %label,
                    upstream = %reference,
                    remote = %current,
                    "dropping upstream from another remote"
                );
                continue;
            }
            updates.push(Update::AddUpstream {
                downstream: label.clone(),
                upstream: reference.name.clone(),
            });
            adopted.push(upstream);
        }

        for upstream in adopted {
            let name = self.nodes[&upstream].reference().name.clone();
            self.edge(downstream, upstream, name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Reference;

    fn named(graph: &mut BranchGraph, name: &str, remote: &str) -> NodeId {
        let (id, _) = graph.node(Reference::new(name, remote));
        graph.get_mut(id).unwrap().set_branch(name.repeat(2));
        id
    }

    fn upstream_set(graph: &BranchGraph, id: NodeId) -> Vec<NodeId> {
        graph.get(id).unwrap().upstreams().keys().copied().collect()
    }

    fn downstream_set(graph: &BranchGraph, id: NodeId) -> Vec<NodeId> {
        graph.get(id).unwrap().downstreams().iter().copied().collect()
    }

    #[test]
    fn removal_reparents_onto_remote_upstreams() {
        let mut graph = BranchGraph::new();
        let a = named(&mut graph, "a", ".");
        let b = named(&mut graph, "b", ".");
        let c = named(&mut graph, "c", ".");
        let d = named(&mut graph, "d", "origin");
        let e = named(&mut graph, "e", "origin");
        graph.edge(a, c, "ac");
        graph.edge(b, c, "bc");
        graph.edge(c, d, "cd");
        graph.edge(c, e, "cd");

        let updates = graph.remove(c).unwrap();
        let expected = |who: &str, reason: &str| {
            vec![
                Update::RemoveUpstream {
                    downstream: who.into(),
                    upstream: reason.into(),
                },
                Update::SetRemote {
                    downstream: who.into(),
                    remote: "origin".into(),
                },
                Update::AddUpstream {
                    downstream: who.into(),
                    upstream: "d".into(),
                },
                Update::AddUpstream {
                    downstream: who.into(),
                    upstream: "e".into(),
                },
            ]
        };
        let mut all = expected("aa", "ac");
        all.extend(expected("bb", "bc"));
        assert_eq!(updates, all);

        assert_eq!(graph.len(), 4);
        assert!(!graph.contains(c));
        assert!(graph.find(&Reference::local("c")).is_none());
        assert_eq!(upstream_set(&graph, a), vec![d, e]);
        assert_eq!(upstream_set(&graph, b), vec![d, e]);
        assert!(downstream_set(&graph, a).is_empty());
        assert_eq!(downstream_set(&graph, d), vec![a, b]);
        assert_eq!(downstream_set(&graph, e), vec![a, b]);
        assert_eq!(graph.get(a).unwrap().reason(d), Some("d"));
    }

    #[test]
    fn retained_remote_filters_new_upstreams() {
        let mut graph = BranchGraph::new();
        let topic = named(&mut graph, "topic", ".");
        let base = named(&mut graph, "base", ".");
        let other = named(&mut graph, "other", ".");
        let remote_main = named(&mut graph, "main", "origin");
        let local_dev = named(&mut graph, "dev", ".");
        graph.edge(topic, base, "refs/heads/base");
        graph.edge(topic, other, "refs/heads/other");
        graph.edge(base, remote_main, "refs/heads/main");
        graph.edge(base, local_dev, "refs/heads/dev");

        let updates = graph.remove(base).unwrap();
        assert_eq!(
            updates,
            vec![
                Update::RemoveUpstream {
                    downstream: "topictopic".into(),
                    upstream: "refs/heads/base".into(),
                },
                Update::AddUpstream {
                    downstream: "topictopic".into(),
                    upstream: "dev".into(),
                },
            ]
        );
        assert_eq!(upstream_set(&graph, topic), vec![other, local_dev]);
        assert!(downstream_set(&graph, remote_main).is_empty());
    }

    #[test]
    fn mixed_remotes_keep_first_remote() {
        let mut graph = BranchGraph::new();
        let topic = named(&mut graph, "topic", ".");
        let base = named(&mut graph, "base", ".");
        let up1 = named(&mut graph, "main", "origin");
        let up2 = named(&mut graph, "main", "fork");
        graph.edge(topic, base, "refs/heads/base");
        graph.edge(base, up1, "refs/heads/main");
        graph.edge(base, up2, "refs/heads/main");

        let updates = graph.remove(base).unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(
            updates[1],
            Update::SetRemote {
                downstream: "topictopic".into(),
                remote: "origin".into(),
            }
        );
        assert_eq!(upstream_set(&graph, topic), vec![up1]);
        assert!(downstream_set(&graph, up2).is_empty());
    }

    #[test]
    fn existing_upstreams_are_not_duplicated() {
        let mut graph = BranchGraph::new();
        let topic = named(&mut graph, "topic", ".");
        let base = named(&mut graph, "base", ".");
        let main = named(&mut graph, "main", ".");
        graph.edge(topic, base, "refs/heads/base");
        graph.edge(topic, main, "refs/heads/main");
        graph.edge(base, main, "refs/heads/main");

        let updates = graph.remove(base).unwrap();
        assert_eq!(
            updates,
            vec![Update::RemoveUpstream {
                downstream: "topictopic".into(),
                upstream: "refs/heads/base".into(),
            }]
        );
        assert_eq!(upstream_set(&graph, topic), vec![main]);
        assert_eq!(graph.get(topic).unwrap().reason(main), Some("refs/heads/main"));
    }

    #[test]
    fn removing_a_root_leaves_downstreams_without_upstream() {
        let mut graph = BranchGraph::new();
        let main = named(&mut graph, "main", ".");
        let topic = named(&mut graph, "topic", ".");
        graph.edge(topic, main, "refs/heads/main");

        let updates = graph.remove(main).unwrap();
        assert_eq!(updates.len(), 1);
        assert!(!graph.get(topic).unwrap().has_upstreams());
    }

    #[test]
    fn unrelated_nodes_are_untouched() {
        let mut graph = BranchGraph::new();
        let a = named(&mut graph, "a", ".");
        let b = named(&mut graph, "b", ".");
        let x = named(&mut graph, "x", ".");
        let y = named(&mut graph, "y", "origin");
        graph.edge(a, b, "ab");
        graph.edge(x, y, "xy");

        graph.remove(b).unwrap();
        assert_eq!(upstream_set(&graph, x), vec![y]);
        assert_eq!(downstream_set(&graph, y), vec![x]);
        assert_eq!(graph.get(x).unwrap().reason(y), Some("xy"));
    }

    #[test]
    fn mutual_tracking_does_not_create_self_edges() {
        let mut graph = BranchGraph::new();
        let a = named(&mut graph, "a", ".");
        let b = named(&mut graph, "b", ".");
        graph.edge(a, b, "ab");
        graph.edge(b, a, "ba");

        let updates = graph.remove(b).unwrap();
        assert_eq!(
            updates,
            vec![Update::RemoveUpstream {
                downstream: "aa".into(),
                upstream: "ab".into(),
            }]
        );
        assert!(!graph.get(a).unwrap().has_upstreams());
        assert!(graph.get(a).unwrap().downstreams().is_empty());
    }

    #[test]
    fn unknown_nodes_are_reported() {
        let mut graph = BranchGraph::new();
        let a = named(&mut graph, "a", ".");
        graph.remove(a).unwrap();
        assert!(matches!(graph.remove(a), Err(GraphError::UnknownNode(id)) if id == a));
    }

    #[test]
    fn git_config_arguments() {
        let rm = Update::RemoveUpstream {
            downstream: "topic".into(),
            upstream: "refs/heads/v1.0".into(),
        };
        assert_eq!(
            rm.git_config_args(),
            vec!["--unset", "branch.topic.merge", "^refs/heads/v1\\.0$"]
        );

        let set = Update::SetRemote {
            downstream: "topic".into(),
            remote: "origin".into(),
        };
        assert_eq!(set.git_config_args(), vec!["branch.topic.remote", "origin"]);
        assert_eq!(set.to_string(), "topic: set remote origin");

        let add = Update::AddUpstream {
            downstream: "topic".into(),
            upstream: "refs/heads/main".into(),
        };
        assert_eq!(
            add.git_config_args(),
            vec!["--add", "branch.topic.merge", "refs/heads/main"]
        );
        assert_eq!(add.downstream(), "topic");
    }

    #[test]
    fn updates_serialize_with_kind_tag() {
        let update = Update::SetRemote {
            downstream: "topic".into(),
            remote: "origin".into(),
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"kind":"set_remote","downstream":"topic","remote":"origin"}"#);
        let back: Update = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
    }
}
