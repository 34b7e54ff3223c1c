//! Display trees: labeled hierarchies for nested or indented rendering.
//!
//! [`graph_to_tree`] walks a graph from a root (or from every top-level node
//! under a synthetic root) and produces an owned [`TreeNode`]. A node reachable
//! through several parents appears once, under the first parent that visits
//! it. Labels come from node attributes through a [`LabelResolver`].

mod builder;
mod label;

pub use builder::graph_to_tree;
pub use label::{LabelResolver, resolve_label};

use std::fmt;

use serde::Serialize;

/// A label and its ordered, exclusively owned children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// A leaf.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Append a child subtree.
    pub fn push(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Number of levels below this node. A leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Labels in preorder.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = Vec::with_capacity(self.node_count());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            labels.push(node.label.as_str());
            stack.extend(node.children.iter().rev());
        }
        labels
    }

    fn fmt_children(&self, f: &mut fmt::Formatter<'_>, prefix: &str) -> fmt::Result {
        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            let (guide, indent) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            writeln!(f, "{prefix}{guide}{}", child.label)?;
            child.fmt_children(f, &format!("{prefix}{indent}"))?;
        }
        Ok(())
    }
}

/// Indented rendering with box-drawing guides, one node per line.
impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.label)?;
        self.fmt_children(f, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> TreeNode {
        TreeNode::with_children(
            "root",
            vec![
                TreeNode::with_children("a", vec![TreeNode::new("a1"), TreeNode::new("a2")]),
                TreeNode::with_children("b", vec![TreeNode::new("b1")]),
            ],
        )
    }

    #[test]
    fn test_counts() {
        let tree = sample();
        assert_eq!(tree.node_count(), 6);
        assert_eq!(tree.depth(), 2);
        assert!(TreeNode::new("x").is_leaf());
        assert_eq!(TreeNode::new("x").depth(), 0);
    }

    #[test]
    fn test_labels_preorder() {
        assert_eq!(sample().labels(), vec!["root", "a", "a1", "a2", "b", "b1"]);
    }

    #[test]
    fn test_display() {
        let expected = "\
root
├── a
│   ├── a1
│   └── a2
└── b
    └── b1
";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn test_serialize() {
        let mut tree = TreeNode::new("r");
        tree.push(TreeNode::new("c"));
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "label": "r",
                "children": [{ "label": "c", "children": [] }],
            })
        );
    }
}
