//! Node records stored in the graph.
//!
//! Each node carries:
//! - Its caller-chosen identifier (any hashable value)
//! - An attribute map, which may hold a nested payload under `obj`

use super::Attrs;

/// The weight stored for every node in the underlying petgraph.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord<N> {
    /// The caller's identifier for this node.
    pub id: N,
    /// Per-node attributes.
    pub attrs: Attrs,
}

impl<N> NodeRecord<N> {
    /// Create a record with no attributes.
    #[inline]
    pub fn new(id: N) -> Self {
        Self::with_attrs(id, Attrs::new())
    }

    /// Create a record with the given attributes.
    #[inline]
    pub fn with_attrs(id: N, attrs: Attrs) -> Self {
        Self { id, attrs }
    }

    /// Merge attributes into this record, overwriting existing keys.
    pub fn merge(&mut self, attrs: Attrs) {
        self.attrs.extend(attrs);
    }
}
