//! Graph to display-tree conversion.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use petgraph::EdgeType;
use petgraph::stable_graph::NodeIndex;
use tracing::debug;

use super::{LabelResolver, TreeNode};
use crate::error::TreeError;
use crate::graph::PlotGraph;

/// Label used for the synthetic forest root when nothing better is known.
const DEFAULT_ROOT_LABEL: &str = "graph";

/// A node under construction and the successors it has yet to visit.
struct Frame {
    node: TreeNode,
    pending: std::vec::IntoIter<NodeIndex>,
}

/// Convert a graph into a labeled display tree.
///
/// With `root`, the tree is the part of the graph reachable from it; nodes
/// it cannot reach are left out. Without `root`, every top-level node
/// becomes a child of a synthetic root labeled `root_label`, else the
/// graph's name, else `"graph"`. Top-level nodes are those without incoming
/// edges, or one node per connected component for undirected graphs.
///
/// Children follow edge insertion order. Each node appears at most once:
/// a node shared by several parents sits under the first one to reach it,
/// and edges back to visited nodes are skipped.
pub fn graph_to_tree<N, Ty>(
    graph: &PlotGraph<N, Ty>,
    root: Option<&N>,
    labels: &LabelResolver,
    root_label: Option<&str>,
) -> Result<TreeNode, TreeError>
where
    N: Clone + Eq + Hash + Display,
    Ty: EdgeType,
{
    let mut builder = Builder {
        graph,
        labels,
        visited: HashSet::with_capacity(graph.node_count()),
    };

    let tree = match root {
        Some(id) => {
            let index = graph.index_of(id).ok_or_else(|| TreeError::UnknownRoot {
                node: id.to_string(),
            })?;
            builder.visit(index)?
        }
        None => {
            let label = root_label
                .or_else(|| graph.name())
                .unwrap_or(DEFAULT_ROOT_LABEL);
            let mut forest = TreeNode::new(label);
            for index in top_level(graph) {
                if !builder.visited.contains(&index) {
                    forest.push(builder.visit(index)?);
                }
            }
            forest
        }
    };

    debug!(
        nodes = builder.visited.len(),
        depth = tree.depth(),
        "built display tree"
    );
    Ok(tree)
}

/// Top-level candidates for forest mode, in node order.
fn top_level<N, Ty>(graph: &PlotGraph<N, Ty>) -> Vec<NodeIndex>
where
    N: Clone + Eq + Hash,
    Ty: EdgeType,
{
    if Ty::is_directed() {
        graph
            .node_indices()
            .filter(|&index| graph.in_degree_of(index) == 0)
            .collect()
    } else {
        // Every node is a candidate; the visited check keeps one per component.
        graph.node_indices().collect()
    }
}

struct Builder<'a, N, Ty> {
    graph: &'a PlotGraph<N, Ty>,
    labels: &'a LabelResolver,
    visited: HashSet<NodeIndex>,
}

impl<N, Ty> Builder<'_, N, Ty>
where
    N: Clone + Eq + Hash + Display,
    Ty: EdgeType,
{
    /// Mark `index` visited and open a frame for it.
    fn enter(&mut self, index: NodeIndex) -> Result<Frame, TreeError> {
        self.visited.insert(index);
        let record = self.graph.record(index);
        let label = self
            .labels
            .resolve(&record.id, &record.attrs)
            .map_err(|err| TreeError::LabelResolution {
                node: record.id.to_string(),
                attempted: err.attempted,
            })?;
        Ok(Frame {
            node: TreeNode::new(label),
            pending: self.graph.successor_indices(index).into_iter(),
        })
    }

    /// Depth-first visit from an unvisited node, with an explicit stack so
    /// deep graphs cannot overflow the call stack.
    fn visit(&mut self, start: NodeIndex) -> Result<TreeNode, TreeError> {
        let mut root = self.enter(start)?;
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let frame = stack.last_mut().unwrap_or(&mut root);
            match frame.pending.next() {
                Some(next) if self.visited.contains(&next) => {}
                Some(next) => {
                    let child = self.enter(next)?;
                    stack.push(child);
                }
                None => match stack.pop() {
                    Some(done) => stack.last_mut().unwrap_or(&mut root).node.push(done.node),
                    None => return Ok(root.node),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Attrs, DiPlotGraph, UnPlotGraph};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn named(name: &str) -> Attrs {
        let mut attrs = Attrs::new();
        attrs.insert("obj".into(), json!({ "name": name }));
        attrs
    }

    #[test]
    fn test_shared_child_appears_once() {
        let mut graph: DiPlotGraph<&str> = PlotGraph::new();
        graph.add_edge("A", "B");
        graph.add_edge("A", "C");
        graph.add_edge("B", "D");
        graph.add_edge("C", "D");

        let tree = graph_to_tree(&graph, Some(&"A"), &LabelResolver::default(), None).unwrap();

        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.labels(), vec!["A", "B", "D", "C"]);
        assert_eq!(tree.children[0].children, vec![TreeNode::new("D")]);
        assert!(tree.children[1].is_leaf());
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph: DiPlotGraph<u32> = PlotGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph.add_edge(3, 1);

        let tree = graph_to_tree(&graph, Some(&1), &LabelResolver::default(), None).unwrap();
        assert_eq!(tree.to_string(), "1\n└── 2\n    └── 3\n");
    }

    #[test]
    fn test_forest_mode_pure_cycle_has_no_top_level() {
        // Every node has a parent, so nothing hangs off the synthetic root.
        let mut graph: DiPlotGraph<u32> = PlotGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph.add_edge(3, 1);

        let tree = graph_to_tree(&graph, None, &LabelResolver::default(), None).unwrap();
        assert_eq!(tree.label, "graph");
        assert!(tree.is_leaf());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.to_string(), "graph\n");
    }

    #[test]
    fn test_unreachable_nodes_are_absent() {
        let mut graph: DiPlotGraph<&str> = PlotGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("c", "b");

        let tree = graph_to_tree(&graph, Some(&"a"), &LabelResolver::default(), None).unwrap();
        assert_eq!(tree.labels(), vec!["a", "b"]);
    }

    #[test]
    fn test_forest_mode_root_label() {
        let mut graph: DiPlotGraph<&str> = PlotGraph::new();
        graph.add_edge("p1", "t1");
        graph.add_edge("p2", "t2");
        graph.add_node("loose");

        let resolver = LabelResolver::default();
        let tree = graph_to_tree(&graph, None, &resolver, None).unwrap();
        assert_eq!(tree.label, "graph");
        assert_eq!(tree.labels(), vec!["graph", "p1", "t1", "p2", "t2", "loose"]);

        graph.set_name("Inbox");
        let tree = graph_to_tree(&graph, None, &resolver, None).unwrap();
        assert_eq!(tree.label, "Inbox");

        let tree = graph_to_tree(&graph, None, &resolver, Some("Projects")).unwrap();
        assert_eq!(tree.label, "Projects");
    }

    #[test]
    fn test_forest_mode_shared_child_under_first_root() {
        let mut graph: DiPlotGraph<&str> = PlotGraph::new();
        graph.add_edge("r1", "shared");
        graph.add_edge("r2", "shared");

        let tree = graph_to_tree(&graph, None, &LabelResolver::default(), None).unwrap();
        let expected = "\
graph
├── r1
│   └── shared
└── r2
";
        assert_eq!(tree.to_string(), expected);
    }

    #[test]
    fn test_undirected_forest_one_subtree_per_component() {
        let mut graph: UnPlotGraph<u32> = PlotGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph.add_edge(4, 5);

        let tree = graph_to_tree(&graph, None, &LabelResolver::default(), None).unwrap();
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.labels(), vec!["graph", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_labels_from_payload() {
        let mut graph: DiPlotGraph<u32> = PlotGraph::new();
        graph.add_node_with(1, named("Project"));
        graph.add_node_with(2, named("Task"));
        graph.add_edge(1, 2);

        let resolver = LabelResolver::new(["name"]);
        let tree = graph_to_tree(&graph, Some(&1), &resolver, None).unwrap();
        assert_eq!(tree.labels(), vec!["Project", "Task"]);
    }

    #[test]
    fn test_label_failure_names_node() {
        let mut graph: DiPlotGraph<u32> = PlotGraph::new();
        graph.add_node_with(1, named("Project"));
        graph.add_edge(1, 2);

        let resolver = LabelResolver::new(["name", "title"]);
        let err = graph_to_tree(&graph, Some(&1), &resolver, None).unwrap_err();
        assert_eq!(
            err,
            TreeError::LabelResolution {
                node: "2".into(),
                attempted: vec!["name".into(), "title".into()],
            }
        );
    }

    #[test]
    fn test_unknown_root() {
        let graph: DiPlotGraph<u32> = PlotGraph::new();
        let err = graph_to_tree(&graph, Some(&9), &LabelResolver::default(), None).unwrap_err();
        assert_eq!(err, TreeError::UnknownRoot { node: "9".into() });
    }

    #[test]
    fn test_deep_chain() {
        let mut graph: DiPlotGraph<u32> = PlotGraph::new();
        for i in 0..1_000 {
            graph.add_edge(i, i + 1);
        }

        let tree = graph_to_tree(&graph, Some(&0), &LabelResolver::default(), None).unwrap();
        assert_eq!(tree.depth(), 1_000);
    }
}
