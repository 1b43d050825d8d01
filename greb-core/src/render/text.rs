//! Forest Text
//!
//! Renders the graph as an indented forest: branches without upstream at
//! the top, each followed by the branches tracking it one level deeper. A
//! branch with several upstreams shows up under each of them.

use serde::{Deserialize, Serialize};

use crate::graph::{BranchGraph, NodeId};

/// Escape codes wrapped around highlighted labels. Empty codes disable
/// highlighting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPalette {
    pub current: String,
    pub remote: String,
    pub reset: String,
}

/// Indented text renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRenderer {
    /// Added once per depth level.
    pub indent: String,
    /// Written at the start of every line.
    pub prefix: String,
    /// Label of the checked out branch.
    pub current: Option<String>,
    pub palette: TextPalette,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            prefix: String::new(),
            current: None,
            palette: TextPalette::default(),
        }
    }
}

impl TextRenderer {
    /// Render the forest below `from`, or at every node without upstream
    /// when `from` is `None`.
    ///
    /// A given `from` takes the place of the invisible root: its downstreams
    /// are the top level and `from` itself is not printed.
    pub fn render(&self, graph: &BranchGraph, from: Option<NodeId>) -> String {
        let mut out = String::new();
        let mut path = Vec::new();
        match from {
            Some(id) => self.write_children(graph, id, 0, &mut path, &mut out),
            None => {
                let mut roots: Vec<NodeId> = graph
                    .iter()
                    .filter(|n| !n.has_upstreams())
                    .map(|n| n.id())
                    .collect();
                graph.sort_ids(&mut roots);
                for root in roots {
                    self.write_tree(graph, root, 0, &mut path, &mut out);
                }
            }
        }
        out
    }

    fn write_tree(
        &self,
        graph: &BranchGraph,
        id: NodeId,
        depth: usize,
        path: &mut Vec<NodeId>,
        out: &mut String,
    ) {
        let Some(node) = graph.get(id) else {
            return;
        };

        let (open, close) = self.decoration(node.label(), node.is_local());
        out.push_str(&self.prefix);
        out.push_str(&self.indent.repeat(depth));
        out.push_str(open);
        out.push_str(node.label());
        out.push_str(close);
        out.push('\n');

        self.write_children(graph, id, depth + 1, path, out);
    }

    /// Write the downstreams of `id` at `depth`, skipping nodes already on
    /// the current path.
    fn write_children(
        &self,
        graph: &BranchGraph,
        id: NodeId,
        depth: usize,
        path: &mut Vec<NodeId>,
        out: &mut String,
    ) {
        let Some(node) = graph.get(id) else {
            return;
        };

        path.push(id);
        let mut children: Vec<NodeId> = node
            .downstreams()
            .iter()
            .copied()
            .filter(|child| !path.contains(child))
            .collect();
        graph.sort_ids(&mut children);
        for child in children {
            self.write_tree(graph, child, depth, path, out);
        }
        path.pop();
    }

    fn decoration(&self, label: &str, local: bool) -> (&str, &str) {
        let palette = &self.palette;
        if self.current.as_deref() == Some(label) && !palette.current.is_empty() {
            (&palette.current, &palette.reset)
        } else if !local && !palette.remote.is_empty() {
            (&palette.remote, &palette.reset)
        } else {
            ("", "")
        }
    }
}
