//! Plotgraph - WASM Module
//!
//! Turns attributed graphs into two renderable forms: flat plot geometry
//! (node markers, edge polylines with break rows, arrow markers) for 2D
//! plotting backends, and labeled display trees for nested or indented
//! rendering. It is compiled to WebAssembly and exposes a JavaScript-friendly
//! API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: attributed graph container using petgraph's StableGraph
//! - `layout`: layout trait, fallback policy, tree, planar and spring layouts
//! - `geometry`: edge arrays, break rows, arrow midpoints and angles
//! - `traces`: trace selection and style merging for plotting backends
//! - `tree`: display trees and label resolution
//! - `ingest` / `filter`: record mapping and attribute predicates

use js_sys::Float64Array;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod filter;
pub mod geometry;
pub mod graph;
pub mod ingest;
pub mod layout;
pub mod traces;
pub mod tree;

pub use error::{GeometryError, IngestError, LabelError, LayoutError, PlotError, TreeError};
pub use filter::attr_filter;
pub use geometry::{PlotGeometry, Point, graph_to_edge_array, graph_to_plot_geometry, midpoints};
pub use graph::{Attrs, DiPlotGraph, PlotGraph, UnPlotGraph};
pub use ingest::RecordMapping;
pub use layout::{Layout, PositionMap};
pub use traces::{TraceRequest, Traces, graph_to_traces};
pub use tree::{LabelResolver, TreeNode, graph_to_tree, resolve_label};

use geometry::interleave;
use petgraph::{Directed, Undirected};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// A string-keyed graph of either edge type.
enum AnyGraph {
    Directed(PlotGraph<String, Directed>),
    Undirected(PlotGraph<String, Undirected>),
}

/// Run an expression against the inner graph, whatever its edge type.
macro_rules! with_graph {
    ($any:expr, $graph:ident => $body:expr) => {
        match $any {
            AnyGraph::Directed($graph) => $body,
            AnyGraph::Undirected($graph) => $body,
        }
    };
}

fn from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&e.to_string()))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

fn label_resolver(label_attrs: Vec<String>) -> LabelResolver {
    if label_attrs.is_empty() {
        LabelResolver::default()
    } else {
        LabelResolver::new(label_attrs)
    }
}

/// Main entry point for plotting and tree rendering.
///
/// Node identifiers are strings. Attributes are plain JS objects.
#[wasm_bindgen]
pub struct PlotGraphWasm {
    graph: AnyGraph,
}

#[wasm_bindgen]
impl PlotGraphWasm {
    /// Create an empty graph, directed (parents point to children) or not.
    #[wasm_bindgen(constructor)]
    pub fn new(directed: bool) -> Self {
        let graph = if directed {
            AnyGraph::Directed(PlotGraph::new())
        } else {
            AnyGraph::Undirected(PlotGraph::new())
        };
        Self { graph }
    }

    // =========================================================================
    // Building
    // =========================================================================

    /// Add a node, merging `attrs` into an existing node of the same id.
    #[wasm_bindgen(js_name = addNode)]
    pub fn add_node(&mut self, id: String, attrs: JsValue) -> Result<(), JsError> {
        let attrs: Attrs = from_js(attrs)?;
        with_graph!(&mut self.graph, g => g.add_node_with(id, attrs));
        Ok(())
    }

    /// Add an edge, creating missing endpoints.
    #[wasm_bindgen(js_name = addEdge)]
    pub fn add_edge(&mut self, source: String, target: String, attrs: JsValue) -> Result<(), JsError> {
        let attrs: Attrs = from_js(attrs)?;
        with_graph!(&mut self.graph, g => g.add_edge_with(source, target, attrs));
        Ok(())
    }

    /// Add a record as a node plus edges to its parents.
    ///
    /// `mapping` is optional; see `RecordMapping` for its fields. Returns the
    /// node id.
    #[wasm_bindgen(js_name = addRecord)]
    pub fn add_record(&mut self, record: JsValue, mapping: JsValue) -> Result<String, JsError> {
        let record: serde_json::Value =
            serde_wasm_bindgen::from_value(record).map_err(|e| JsError::new(&e.to_string()))?;
        let mapping: RecordMapping = from_js(mapping)?;
        let id = with_graph!(&mut self.graph, g => g.add_record(&record, &mapping))?;
        Ok(id)
    }

    #[wasm_bindgen(js_name = setName)]
    pub fn set_name(&mut self, name: String) {
        with_graph!(&mut self.graph, g => g.set_name(name));
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> Option<String> {
        with_graph!(&self.graph, g => g.name().map(str::to_owned))
    }

    /// Use fixed positions (`{id: {x, y}}`) instead of the default layout.
    #[wasm_bindgen(js_name = setPositions)]
    pub fn set_positions(&mut self, positions: JsValue) -> Result<(), JsError> {
        let positions: PositionMap<String> = from_js(positions)?;
        with_graph!(&mut self.graph, g => g.set_layout(layout::FixedLayout::new(positions)));
        Ok(())
    }

    /// Go back to the default layout for the graph's shape.
    #[wasm_bindgen(js_name = clearPositions)]
    pub fn clear_positions(&mut self) {
        with_graph!(&mut self.graph, g => g.clear_layout());
    }

    /// Copy of the graph keeping only nodes whose `attr` equals `value`.
    #[wasm_bindgen(js_name = filterByAttr)]
    pub fn filter_by_attr(&self, attr: String, value: JsValue) -> Result<PlotGraphWasm, JsError> {
        let value: serde_json::Value = from_js(value)?;
        let graph = match &self.graph {
            AnyGraph::Directed(g) => AnyGraph::Directed(g.subgraph(attr_filter(g, attr, value))),
            AnyGraph::Undirected(g) => {
                AnyGraph::Undirected(g.subgraph(attr_filter(g, attr, value)))
            }
        };
        Ok(Self { graph })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        with_graph!(&self.graph, g => g.node_count() as u32)
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        with_graph!(&self.graph, g => g.edge_count() as u32)
    }

    #[wasm_bindgen(js_name = isDirected)]
    pub fn is_directed(&self) -> bool {
        matches!(self.graph, AnyGraph::Directed(_))
    }

    // =========================================================================
    // Plot Geometry
    // =========================================================================

    /// Node positions, edge lines and (for directed graphs) arrows.
    #[wasm_bindgen(js_name = plotGeometry)]
    pub fn plot_geometry(&self) -> Result<JsValue, JsError> {
        to_js(&self.geometry()?)
    }

    /// Node positions as [x0, y0, x1, y1, ...] in layout order.
    ///
    /// Layout order is the key order of the position map the layout
    /// returned. The built-in layouts follow node insertion order; positions
    /// set with `setPositions` keep the order they were given in, and ids
    /// that are not nodes of the graph are still included.
    #[wasm_bindgen(js_name = nodePositions)]
    pub fn node_positions(&self) -> Result<Float64Array, JsError> {
        let plot = self.geometry()?;
        Ok(Float64Array::from(&interleave(&plot.node_positions)[..]))
    }

    /// Separated edge array as [x, y, ...]; NaN pairs separate edges.
    #[wasm_bindgen(js_name = edgeLines)]
    pub fn edge_lines(&self) -> Result<Float64Array, JsError> {
        let plot = self.geometry()?;
        Ok(Float64Array::from(&interleave(&plot.edge_lines)[..]))
    }

    /// Plot traces for the request `{traces?: [...], styles?: {...}}`.
    pub fn traces(&self, request: JsValue) -> Result<JsValue, JsError> {
        let request: TraceRequest = from_js(request)?;
        let traces = with_graph!(&self.graph, g => graph_to_traces(g, &request, None))?;
        to_js(&traces)
    }

    // =========================================================================
    // Display Trees
    // =========================================================================

    /// Display tree as nested `{label, children}` objects.
    ///
    /// Without `root`, every top-level node hangs off a synthetic root.
    /// Empty `label_attrs` labels nodes by id.
    pub fn tree(
        &self,
        root: Option<String>,
        label_attrs: Vec<String>,
        root_label: Option<String>,
    ) -> Result<JsValue, JsError> {
        to_js(&self.build_tree(root, label_attrs, root_label)?)
    }

    /// Display tree rendered as indented text.
    #[wasm_bindgen(js_name = treeText)]
    pub fn tree_text(
        &self,
        root: Option<String>,
        label_attrs: Vec<String>,
        root_label: Option<String>,
    ) -> Result<String, JsError> {
        Ok(self.build_tree(root, label_attrs, root_label)?.to_string())
    }
}

impl PlotGraphWasm {
    fn geometry(&self) -> Result<PlotGeometry, PlotError> {
        with_graph!(&self.graph, g => graph_to_plot_geometry(g, None))
    }

    fn build_tree(
        &self,
        root: Option<String>,
        label_attrs: Vec<String>,
        root_label: Option<String>,
    ) -> Result<TreeNode, TreeError> {
        let labels = label_resolver(label_attrs);
        with_graph!(&self.graph, g => graph_to_tree(g, root.as_ref(), &labels, root_label.as_deref()))
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::traces::TraceKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Todo-style records: tasks point at their project, subtasks at their task.
    fn records() -> Vec<serde_json::Value> {
        vec![
            json!({ "id": "p1", "name": "Home" }),
            json!({ "id": "t1", "content": "Paint fence", "project_id": "p1" }),
            json!({ "id": "t2", "content": "Buy paint", "parent_id": "t1", "project_id": "p1" }),
            json!({ "id": "t3", "content": "Mow lawn", "project_id": "p1" }),
        ]
    }

    fn ingest() -> DiPlotGraph<String> {
        let mut graph = PlotGraph::new();
        let mapping = RecordMapping::default();
        for record in records() {
            graph.add_record(&record, &mapping).unwrap();
        }
        graph
    }

    /// Flip child -> parent edges so parents point to children.
    fn parents_to_children(graph: &DiPlotGraph<String>) -> DiPlotGraph<String> {
        let mut flipped = PlotGraph::new();
        flipped.set_name("Projects");
        for node in graph.nodes() {
            flipped.add_node_with(node.clone(), graph.node_attrs(node).cloned().unwrap_or_default());
        }
        for (child, parent, attrs) in graph.edges_with_attrs() {
            flipped.add_edge_with(parent.clone(), child.clone(), attrs.clone());
        }
        flipped
    }

    #[test]
    fn test_records_to_tree_text() {
        let graph = parents_to_children(&ingest());
        let labels = LabelResolver::new(["name", "content"]);

        let tree = graph_to_tree(&graph, None, &labels, None).unwrap();
        let expected = "\
Projects
└── Home
    ├── Paint fence
    │   └── Buy paint
    └── Mow lawn
";
        assert_eq!(tree.to_string(), expected);
        // t2 is reachable from both p1 and t1 but appears once.
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_records_to_traces() {
        let graph = ingest();
        let traces = graph_to_traces(&graph, &TraceRequest::default(), None).unwrap();

        assert_eq!(traces.get(TraceKind::Nodes).unwrap().x.len(), 4);
        let edges = traces.get(TraceKind::Edges).unwrap();
        assert_eq!(edges.x.len(), 3 * graph.edge_count());
        let arrows = traces.get(TraceKind::Arrows).unwrap();
        assert_eq!(arrows.x.len(), graph.edge_count());

        let value = serde_json::to_value(&traces).unwrap();
        assert_eq!(value["edges"]["x"][2], serde_json::Value::Null);
        assert_eq!(value["arrows"]["marker"]["symbol"], json!("arrow-wide"));
    }

    #[test]
    fn test_filtered_subgraph_geometry() {
        let graph = ingest();
        let tasks = graph.subgraph(attr_filter(&graph, "project_id", json!("p1")));

        assert_eq!(tasks.node_count(), 3);
        assert_eq!(
            tasks.edges().collect::<Vec<_>>(),
            vec![(&"t2".to_string(), &"t1".to_string())]
        );
        let geometry = graph_to_plot_geometry(&tasks, None).unwrap();
        assert_eq!(geometry.node_positions.len(), 3);
        assert_eq!(geometry.edge_lines.len(), 3);
        assert_eq!(geometry.arrows.map(|a| a.angles.len()), Some(1));
    }

    #[test]
    fn test_wasm_wrapper_without_js_values() {
        let mut wrapper = PlotGraphWasm::new(false);
        if let AnyGraph::Undirected(g) = &mut wrapper.graph {
            g.add_edge("a".into(), "b".into());
            g.add_edge("b".into(), "c".into());
        }
        wrapper.set_name("line".into());

        assert_eq!(wrapper.node_count(), 3);
        assert_eq!(wrapper.edge_count(), 2);
        assert!(!wrapper.is_directed());
        assert_eq!(wrapper.name().as_deref(), Some("line"));
        assert_eq!(wrapper.geometry().unwrap().edge_lines.len(), 6);
        assert!(wrapper.geometry().unwrap().arrows.is_none());

        let tree = wrapper.build_tree(None, Vec::new(), None).unwrap();
        assert_eq!(tree.to_string(), "line\n└── a\n    └── b\n        └── c\n");
    }

    #[test]
    fn test_node_positions_follow_layout_order() {
        let mut wrapper = PlotGraphWasm::new(true);
        let positions: PositionMap<String> = [
            ("b".to_string(), Point::new(1.0, 0.0)),
            ("a".to_string(), Point::new(0.0, 0.0)),
            ("ghost".to_string(), Point::new(5.0, 5.0)),
        ]
        .into_iter()
        .collect();
        if let AnyGraph::Directed(g) = &mut wrapper.graph {
            g.add_edge("a".into(), "b".into());
            g.set_layout(layout::FixedLayout::new(positions));
        }

        let geometry = wrapper.geometry().unwrap();
        assert_eq!(
            interleave(&geometry.node_positions),
            vec![1.0, 0.0, 0.0, 0.0, 5.0, 5.0]
        );
        assert_eq!(geometry.edge_lines[..2], [Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
    }
}
