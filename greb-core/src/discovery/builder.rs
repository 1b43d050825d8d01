//! Graph Construction
//!
//! The graph is discovered breadth-first from a set of seed branches. For
//! every branch the tracking source is asked for `branch.<name>.remote` and
//! the `branch.<name>.merge` values:
//!
//! - a remote of `"."` means the branch tracks local branches, which are
//!   linked and queued for discovery themselves
//! - any other remote links the branch to refs of that remote; those are
//!   labeled with the remote-tracking branch they are fetched into, and
//!   dropped when no fetch refspec covers them

use std::collections::{HashMap, HashSet, VecDeque};

use smallvec::SmallVec;
use tracing::{debug, warn};

use super::refspec::FetchSpec;
use crate::error::Result;
use crate::graph::{BranchGraph, NodeId, Reference, LOCAL_REMOTE};

/// Prefix of local branch refs.
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Tracking configuration of one branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracking {
    /// Value of `branch.<name>.remote`.
    pub remote: String,
    /// Values of `branch.<name>.merge`.
    pub merges: SmallVec<[String; 2]>,
}

impl Tracking {
    /// Tracking of `remote` with the given merge values.
    pub fn new<I, S>(remote: impl Into<String>, merges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            remote: remote.into(),
            merges: merges.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read access to the repository configuration, provided by the caller.
pub trait TrackingSource {
    /// Tracking configuration of a local branch, `None` if it tracks nothing.
    fn tracking(&mut self, branch: &str) -> Result<Option<Tracking>>;

    /// Abbreviated name of a ref (`refs/heads/main` to `main`), `None` if
    /// the ref does not exist.
    fn abbreviate(&mut self, refname: &str) -> Option<String>;

    /// Values of `remote.<name>.fetch`.
    fn fetch_specs(&mut self, remote: &str) -> Result<Vec<String>>;
}

/// Breadth-first graph builder.
pub struct GraphBuilder<S> {
    source: S,
    graph: BranchGraph,
    fetch_specs: HashMap<String, Vec<FetchSpec>>,
}

impl<S: TrackingSource> GraphBuilder<S> {
    /// Create a builder reading from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            graph: BranchGraph::new(),
            fetch_specs: HashMap::new(),
        }
    }

    /// Discover the graph reachable from `seeds` (short branch names).
    ///
    /// Errors of the tracking source abort the discovery, except while
    /// resolving remote refs, where they only cause the ref to be skipped.
    pub fn build<I, B>(mut self, seeds: I) -> Result<BranchGraph>
    where
        I: IntoIterator<Item = B>,
        B: Into<String>,
    {
        let mut pending: VecDeque<String> = seeds.into_iter().map(Into::into).collect();
        let mut processed = HashSet::new();

        while let Some(branch) = pending.pop_front() {
            if !processed.insert(branch.clone()) {
                continue;
            }
            self.visit(&branch, &mut pending)?;
        }

        debug!(nodes = self.graph.len(), "graph discovered");
        Ok(self.graph)
    }

    fn visit(&mut self, branch: &str, pending: &mut VecDeque<String>) -> Result<()> {
        let (node, _) = self
            .graph
            .node(Reference::local(format!("{HEADS_PREFIX}{branch}")));
        if let Some(n) = self.graph.get_mut(node) {
            n.set_branch(branch);
        }

        let Some(tracking) = self.source.tracking(branch)? else {
            return Ok(());
        };
        debug!(branch, remote = %tracking.remote, merges = ?tracking.merges, "tracking");

        if tracking.remote == LOCAL_REMOTE {
            for merge in &tracking.merges {
                let Some(upstream) = self.source.abbreviate(merge) else {
                    debug!(branch, merge = %merge, "skipping unknown local upstream");
                    continue;
                };
                let (up, _) = self
                    .graph
                    .node(Reference::local(format!("{HEADS_PREFIX}{upstream}")));
                self.graph.edge(node, up, merge.as_str());
                pending.push_back(upstream);
            }
        } else if !tracking.remote.is_empty() {
            for merge in &tracking.merges {
                self.link_remote(node, merge, &tracking.remote);
            }
        }
        Ok(())
    }

    fn link_remote(&mut self, node: NodeId, merge: &str, remote: &str) {
        let reference = Reference::new(merge, remote);
        let (up, existed) = self.graph.node(reference.clone());
        if !existed {
            match self.remote_tracking_branch(&reference) {
                Some(label) => {
                    if let Some(n) = self.graph.get_mut(up) {
                        n.set_branch(label);
                    }
                }
                None => {
                    warn!(%reference, "remote ref is not fetched, ignoring it");
                    self.graph.discard(up);
                    return;
                }
            }
        }
        self.graph.edge(node, up, merge);
    }

    /// Short name of the remote-tracking branch `reference` is fetched into.
    fn remote_tracking_branch(&mut self, reference: &Reference) -> Option<String> {
        if !self.fetch_specs.contains_key(&reference.remote) {
            let specs = match self.source.fetch_specs(&reference.remote) {
                Ok(raw) => raw
                    .iter()
                    .filter_map(|spec| match FetchSpec::parse(spec) {
                        Ok(spec) => Some(spec),
                        Err(err) => {
                            warn!(remote = %reference.remote, %err, "skipping fetch refspec");
                            None
                        }
                    })
                    .collect(),
                Err(err) => {
                    warn!(remote = %reference.remote, %err, "cannot read fetch refspecs");
                    Vec::new()
                }
            };
            self.fetch_specs.insert(reference.remote.clone(), specs);
        }

        let local = self
            .fetch_specs
            .get(&reference.remote)?
            .iter()
            .find_map(|spec| spec.map(&reference.name))?;
        self.source.abbreviate(&local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    /// In-memory repository configuration.
    #[derive(Default)]
    struct Config {
        tracking: HashMap<String, Tracking>,
        refs: HashSet<String>,
        fetch: HashMap<String, Vec<String>>,
        fail_on: Option<String>,
    }

    impl TrackingSource for Config {
        fn tracking(&mut self, branch: &str) -> Result<Option<Tracking>> {
            if self.fail_on.as_deref() == Some(branch) {
                return Err(GraphError::source(
                    format!("git config branch.{branch}.remote"),
                    "boom",
                ));
            }
            Ok(self.tracking.get(branch).cloned())
        }

        fn abbreviate(&mut self, refname: &str) -> Option<String> {
            if !self.refs.contains(refname) {
                return None;
            }
            refname
                .strip_prefix(HEADS_PREFIX)
                .or_else(|| refname.strip_prefix("refs/remotes/"))
                .map(str::to_string)
        }

        fn fetch_specs(&mut self, remote: &str) -> Result<Vec<String>> {
            self.fetch
                .get(remote)
                .cloned()
                .ok_or_else(|| {
                    GraphError::source(format!("git config remote.{remote}.fetch"), "no such remote")
                })
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        for r in [
            "refs/heads/main",
            "refs/heads/topic",
            "refs/heads/fix",
            "refs/remotes/origin/main",
        ] {
            config.refs.insert(r.to_string());
        }
        config.fetch.insert(
            "origin".to_string(),
            vec!["+refs/heads/*:refs/remotes/origin/*".to_string()],
        );
        config
            .tracking
            .insert("main".to_string(), Tracking::new("origin", ["refs/heads/main"]));
        config
            .tracking
            .insert("topic".to_string(), Tracking::new(".", ["refs/heads/main"]));
        config
            .tracking
            .insert("fix".to_string(), Tracking::new(".", ["refs/heads/topic", "refs/heads/gone"]));
        config
    }

    #[test]
    fn discovers_upstreams_breadth_first() {
        let graph = GraphBuilder::new(config()).build(["fix"]).unwrap();

        let fix = graph.find(&Reference::local("refs/heads/fix")).unwrap();
        let topic = graph.find(&Reference::local("refs/heads/topic")).unwrap();
        let main = graph.find(&Reference::local("refs/heads/main")).unwrap();
        let origin = graph
            .find(&Reference::new("refs/heads/main", "origin"))
            .unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.label(topic), "topic");
        assert_eq!(graph.label(origin), "origin/main");
        assert_eq!(graph.get(fix).unwrap().reason(topic), Some("refs/heads/topic"));
        assert_eq!(graph.get(fix).unwrap().upstreams().len(), 1);
        assert_eq!(graph.get(main).unwrap().reason(origin), Some("refs/heads/main"));
        assert_eq!(graph.sort(), vec![main, topic, fix]);
    }

    #[test]
    fn unfetched_remote_refs_are_dropped() {
        let mut config = config();
        config
            .tracking
            .insert("main".to_string(), Tracking::new("origin", ["refs/pull/1/head"]));
        let graph = GraphBuilder::new(config).build(["main"]).unwrap();

        assert_eq!(graph.len(), 1);
        assert!(graph
            .find(&Reference::new("refs/pull/1/head", "origin"))
            .is_none());
    }

    #[test]
    fn unknown_remotes_are_dropped() {
        let mut config = config();
        config
            .tracking
            .insert("main".to_string(), Tracking::new("fork", ["refs/heads/main"]));
        let graph = GraphBuilder::new(config).build(["main"]).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn shared_remote_refs_are_resolved_once() {
        let mut config = config();
        config
            .tracking
            .insert("topic".to_string(), Tracking::new("origin", ["refs/heads/main"]));
        let graph = GraphBuilder::new(config).build(["main", "topic", "main"]).unwrap();

        let origin = graph
            .find(&Reference::new("refs/heads/main", "origin"))
            .unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get(origin).unwrap().downstreams().len(), 2);
    }

    #[test]
    fn source_errors_abort() {
        let mut config = config();
        config.fail_on = Some("topic".to_string());
        let err = GraphBuilder::new(config).build(["fix"]).unwrap_err();
        assert!(matches!(err, GraphError::Source { .. }));
    }
}
