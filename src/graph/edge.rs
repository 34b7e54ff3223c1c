//! Edge records stored in the graph.

use super::Attrs;

/// The weight stored for every edge in the underlying petgraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeRecord {
    /// Per-edge attributes.
    pub attrs: Attrs,
}

impl EdgeRecord {
    /// Create a record with no attributes.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with the given attributes.
    #[inline]
    pub fn with_attrs(attrs: Attrs) -> Self {
        Self { attrs }
    }

    /// Merge attributes into this record, overwriting existing keys.
    pub fn merge(&mut self, attrs: Attrs) {
        self.attrs.extend(attrs);
    }
}
