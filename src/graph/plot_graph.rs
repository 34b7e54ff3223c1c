//! PlotGraph - attributed graph container.
//!
//! The PlotGraph stores topology using petgraph's StableGraph and keeps a map
//! from the caller's node identifiers to stable petgraph indices. Iteration
//! over nodes, edges and successors follows insertion order, which decides
//! drawing order and which parent claims a shared child in a display tree.

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use petgraph::stable_graph::{EdgeIndex, EdgeReference, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};
use petgraph::{Directed, Direction, EdgeType, Undirected};
use serde_json::Value;

use super::{Attrs, EdgeRecord, NodeRecord};
use crate::layout::Layout;

/// A directed graph (parents point to children).
pub type DiPlotGraph<N> = PlotGraph<N, Directed>;

/// An undirected graph.
pub type UnPlotGraph<N> = PlotGraph<N, Undirected>;

/// Attributed graph keyed by caller-chosen node identifiers.
///
/// This struct manages:
/// - Graph topology via petgraph
/// - Node and edge attributes
/// - Graph-level attributes (such as `name`)
/// - An optional attached layout function
#[derive(Clone)]
pub struct PlotGraph<N, Ty = Directed> {
    /// The underlying graph structure.
    graph: StableGraph<NodeRecord<N>, EdgeRecord, Ty>,

    /// Map from caller identifier to petgraph NodeIndex
    node_id_to_index: HashMap<N, NodeIndex>,

    /// Graph-level attributes
    attrs: Attrs,

    /// Layout used when the caller does not supply one
    layout: Option<Rc<dyn Layout<N, Ty>>>,
}

impl<N, Ty> PlotGraph<N, Ty>
where
    N: Clone + Eq + Hash,
    Ty: EdgeType,
{
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::default(),
            node_id_to_index: HashMap::new(),
            attrs: Attrs::new(),
            layout: None,
        }
    }

    /// Create a graph with pre-allocated capacity.
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            graph: StableGraph::with_capacity(node_capacity, edge_capacity),
            node_id_to_index: HashMap::with_capacity(node_capacity),
            attrs: Attrs::new(),
            layout: None,
        }
    }

    /// Create a graph from `(source, target)` pairs, adding endpoints as
    /// they first appear.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut graph = Self::new();
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node, or return the index of the existing one.
    pub fn add_node(&mut self, id: N) -> NodeIndex {
        self.add_node_with(id, Attrs::new())
    }

    /// Add a node with attributes.
    ///
    /// If the node already exists its attributes are merged, with the new
    /// values winning.
    pub fn add_node_with(&mut self, id: N, attrs: Attrs) -> NodeIndex {
        if let Some(&index) = self.node_id_to_index.get(&id) {
            self.graph[index].merge(attrs);
            return index;
        }

        let index = self
            .graph
            .add_node(NodeRecord::with_attrs(id.clone(), attrs));
        self.node_id_to_index.insert(id, index);
        index
    }

    /// Check whether a node exists.
    pub fn contains_node(&self, id: &N) -> bool {
        self.node_id_to_index.contains_key(id)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Iterate node identifiers in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.graph.node_indices().map(move |index| &self.graph[index].id)
    }

    /// Get a node's attributes.
    pub fn node_attrs(&self, id: &N) -> Option<&Attrs> {
        self.index_of(id).map(|index| &self.graph[index].attrs)
    }

    /// Get a node's attributes mutably.
    pub fn node_attrs_mut(&mut self, id: &N) -> Option<&mut Attrs> {
        let index = self.index_of(id)?;
        Some(&mut self.graph[index].attrs)
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Add an edge, creating missing endpoints.
    pub fn add_edge(&mut self, source: N, target: N) -> EdgeIndex {
        self.add_edge_with(source, target, Attrs::new())
    }

    /// Add an edge with attributes, creating missing endpoints.
    ///
    /// Adding an edge that already exists merges its attributes instead of
    /// creating a parallel edge.
    pub fn add_edge_with(&mut self, source: N, target: N, attrs: Attrs) -> EdgeIndex {
        let source_index = self.add_node(source);
        let target_index = self.add_node(target);

        if let Some(index) = self.graph.find_edge(source_index, target_index) {
            self.graph[index].merge(attrs);
            return index;
        }

        self.graph
            .add_edge(source_index, target_index, EdgeRecord::with_attrs(attrs))
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate edges as (source, target) in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> + '_ {
        self.graph
            .edge_references()
            .map(move |edge| (&self.graph[edge.source()].id, &self.graph[edge.target()].id))
    }

    /// Iterate edges with their attributes in insertion order.
    pub fn edges_with_attrs(&self) -> impl Iterator<Item = (&N, &N, &Attrs)> + '_ {
        self.graph.edge_references().map(move |edge| {
            (
                &self.graph[edge.source()].id,
                &self.graph[edge.target()].id,
                &edge.weight().attrs,
            )
        })
    }

    /// Whether edges have a direction.
    pub fn is_directed(&self) -> bool {
        Ty::is_directed()
    }

    /// Get the children of a node in edge insertion order.
    ///
    /// For undirected graphs this is every neighbor.
    pub fn successors(&self, id: &N) -> Vec<&N> {
        self.index_of(id)
            .map(|index| {
                self.successor_indices(index)
                    .into_iter()
                    .map(|n| &self.graph[n].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the parents of a node in edge insertion order.
    ///
    /// For undirected graphs this is every neighbor.
    pub fn predecessors(&self, id: &N) -> Vec<&N> {
        self.index_of(id)
            .map(|index| {
                let edges = self.graph.edges_directed(index, Direction::Incoming);
                ordered_endpoints(index, edges)
                    .into_iter()
                    .map(|n| &self.graph[n].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of incoming edges. For undirected graphs this is the degree.
    pub fn in_degree(&self, id: &N) -> usize {
        self.index_of(id)
            .map(|index| self.in_degree_of(index))
            .unwrap_or(0)
    }

    // =========================================================================
    // Graph Attributes
    // =========================================================================

    /// Get the graph-level attributes.
    pub fn graph_attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Get the graph-level attributes mutably.
    pub fn graph_attrs_mut(&mut self) -> &mut Attrs {
        &mut self.attrs
    }

    /// The graph's `name` attribute, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.attrs.get("name").and_then(Value::as_str)
    }

    /// Set the graph's `name` attribute.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.attrs.insert("name".into(), Value::String(name.into()));
    }

    /// Attach a layout used whenever the caller does not pass one.
    pub fn set_layout<L>(&mut self, layout: L)
    where
        L: Layout<N, Ty> + 'static,
    {
        self.layout = Some(Rc::new(layout));
    }

    /// Remove the attached layout.
    pub fn clear_layout(&mut self) {
        self.layout = None;
    }

    /// The attached layout, if any.
    pub fn layout(&self) -> Option<&dyn Layout<N, Ty>> {
        self.layout.as_deref()
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Copy the subgraph induced by the nodes that `keep` accepts.
    ///
    /// Node and edge order, attributes, graph attributes and the attached
    /// layout carry over.
    pub fn subgraph<F>(&self, keep: F) -> Self
    where
        F: Fn(&N) -> bool,
    {
        let mut sub = Self::new();
        sub.attrs = self.attrs.clone();
        sub.layout = self.layout.clone();

        for index in self.graph.node_indices() {
            let record = &self.graph[index];
            if keep(&record.id) {
                sub.add_node_with(record.id.clone(), record.attrs.clone());
            }
        }
        for (source, target, attrs) in self.edges_with_attrs() {
            if sub.contains_node(source) && sub.contains_node(target) {
                sub.add_edge_with(source.clone(), target.clone(), attrs.clone());
            }
        }
        sub
    }

    pub(crate) fn index_of(&self, id: &N) -> Option<NodeIndex> {
        self.node_id_to_index.get(id).copied()
    }

    pub(crate) fn record(&self, index: NodeIndex) -> &NodeRecord<N> {
        &self.graph[index]
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Upper bound on node indices (max index + 1).
    pub(crate) fn node_bound(&self) -> usize {
        self.graph.node_bound()
    }

    pub(crate) fn edge_endpoints(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target()))
    }

    pub(crate) fn successor_indices(&self, index: NodeIndex) -> Vec<NodeIndex> {
        ordered_endpoints(index, self.graph.edges(index))
    }

    /// Neighbors ignoring direction, in edge insertion order.
    pub(crate) fn neighbor_indices(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let edges = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .chain(self.graph.edges_directed(index, Direction::Incoming));
        ordered_endpoints(index, edges)
    }

    pub(crate) fn in_degree_of(&self, index: NodeIndex) -> usize {
        if Ty::is_directed() {
            self.graph
                .edges_directed(index, Direction::Incoming)
                .count()
        } else {
            self.graph.edges(index).count()
        }
    }
}

impl<N, Ty> Default for PlotGraph<N, Ty>
where
    N: Clone + Eq + Hash,
    Ty: EdgeType,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Far endpoints of `edges` as seen from `index`, sorted by edge index.
///
/// petgraph walks adjacency lists newest-first; sorting restores insertion
/// order. Duplicate reports of the same edge are dropped.
fn ordered_endpoints<'a>(
    index: NodeIndex,
    edges: impl Iterator<Item = EdgeReference<'a, EdgeRecord>>,
) -> Vec<NodeIndex> {
    let mut ends: Vec<(EdgeIndex, NodeIndex)> = edges
        .map(|edge| {
            let other = if edge.source() == index {
                edge.target()
            } else {
                edge.source()
            };
            (edge.id(), other)
        })
        .collect();
    ends.sort_by_key(|&(edge, _)| edge);
    ends.dedup_by_key(|&mut (edge, _)| edge);
    ends.into_iter().map(|(_, node)| node).collect()
}
