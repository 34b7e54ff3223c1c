//! Graph data structures and operations.
//!
//! This module provides the graph container consumed by the geometry and
//! tree builders. Topology lives in petgraph's StableGraph; a side map keeps
//! the caller's node identifiers pointing at stable petgraph indices.

mod edge;
mod node;
mod plot_graph;

pub use edge::EdgeRecord;
pub use node::NodeRecord;
pub use plot_graph::{DiPlotGraph, PlotGraph, UnPlotGraph};

/// Attribute storage for graphs, nodes and edges.
pub type Attrs = serde_json::Map<String, serde_json::Value>;

/// Conventional name of the nested payload field in node data.
pub const PAYLOAD_FIELD: &str = "obj";
