//! Graphviz Output
//!
//! Renders the graph in the dot language. Every node is listed, sorted by
//! label, followed by its edges to its upstreams sorted by target label.
//! Edges into other repositories are dotted.

use crate::graph::{BranchGraph, Node};

/// Dot renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotRenderer {
    /// Label of the checked out branch.
    pub current: Option<String>,
    /// Graphviz color name for the current branch; `None` or empty disables.
    pub current_color: Option<String>,
    /// Graphviz color name for branches in other repositories.
    pub remote_color: Option<String>,
}

impl DotRenderer {
    /// Render the whole graph as a `digraph`. The output only depends on the
    /// graph contents, so repeated calls give identical text.
    pub fn render(&self, graph: &BranchGraph) -> String {
        let mut out = String::from("digraph {\n");

        for node in graph.nodes_by_label() {
            let label = escape(node.label());
            match self.color(node) {
                Some(color) => {
                    let color = escape(color);
                    out.push_str(&format!(
                        "  \"{label}\" [color=\"{color}\", fontcolor=\"{color}\"];\n"
                    ));
                }
                None => {
                    out.push_str(&format!("  \"{label}\";\n"));
                }
            }

            let mut targets: Vec<&Node> = node
                .upstreams()
                .keys()
                .filter_map(|id| graph.get(*id))
                .collect();
            targets.sort_by(|a, b| {
                a.label()
                    .cmp(b.label())
                    .then_with(|| a.reference().cmp(b.reference()))
            });
            for target in targets {
                let style = if target.is_local() { "" } else { " [style=dotted]" };
                let target = escape(target.label());
                out.push_str(&format!("  \"{label}\" -> \"{target}\"{style};\n"));
            }
        }

        out.push_str("}\n");
        out
    }

    fn color(&self, node: &Node) -> Option<&str> {
        let current = self.current_color.as_deref().filter(|c| !c.is_empty());
        let remote = self.remote_color.as_deref().filter(|c| !c.is_empty());
        if self.current.as_deref() == Some(node.label()) && current.is_some() {
            current
        } else if !node.is_local() {
            remote
        } else {
            None
        }
    }
}

/// Escape a string for use inside a quoted dot identifier.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
