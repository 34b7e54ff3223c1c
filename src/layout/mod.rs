//! Layout functions and the fallback policy that picks one.
//!
//! A layout maps every node of a graph to a 2D position. Callers may pass
//! their own; otherwise the graph's attached layout is used, and failing that
//! a default chosen from the graph's shape:
//!
//! - forests get a layered [`TreeLayout`]
//! - other planar graphs get a straight-line [`PlanarLayout`]
//! - everything else gets a force-directed [`SpringLayout`]
//!
//! Both of the first two draw planar graphs without edge crossings.

pub mod planar;
pub mod spring;
pub mod tree;

pub use planar::{PlanarConfig, PlanarLayout, is_planar};
pub use spring::{SpringConfig, SpringLayout};
pub use tree::{CoordinateMode, TreeLayout, TreeLayoutConfig};

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use petgraph::EdgeType;
use petgraph::stable_graph::NodeIndex;
use petgraph::unionfind::UnionFind;
use tracing::debug;

use crate::error::LayoutError;
use crate::geometry::Point;
use crate::graph::PlotGraph;

/// Node positions keyed by node identifier, in layout order.
pub type PositionMap<N> = IndexMap<N, Point>;

/// A function from a graph to node positions.
///
/// Any `Fn(&PlotGraph<N, Ty>) -> Result<PositionMap<N>, LayoutError>`
/// implements this trait.
pub trait Layout<N, Ty> {
    fn compute(&self, graph: &PlotGraph<N, Ty>) -> Result<PositionMap<N>, LayoutError>;
}

impl<N, Ty, F> Layout<N, Ty> for F
where
    F: Fn(&PlotGraph<N, Ty>) -> Result<PositionMap<N>, LayoutError>,
{
    fn compute(&self, graph: &PlotGraph<N, Ty>) -> Result<PositionMap<N>, LayoutError> {
        self(graph)
    }
}

/// Positions computed elsewhere, returned as-is for every graph.
#[derive(Debug, Clone)]
pub struct FixedLayout<N> {
    positions: PositionMap<N>,
}

impl<N> FixedLayout<N> {
    pub fn new(positions: PositionMap<N>) -> Self {
        Self { positions }
    }
}

impl<N: Clone, Ty> Layout<N, Ty> for FixedLayout<N> {
    fn compute(&self, _: &PlotGraph<N, Ty>) -> Result<PositionMap<N>, LayoutError> {
        Ok(self.positions.clone())
    }
}

/// Get node positions for `graph`.
///
/// Uses `layout` if given, then the graph's attached layout, then the default
/// for the graph's shape. Layout failures are returned unchanged.
pub fn resolve_layout<N, Ty>(
    graph: &PlotGraph<N, Ty>,
    layout: Option<&dyn Layout<N, Ty>>,
) -> Result<PositionMap<N>, LayoutError>
where
    N: Clone + Eq + Hash + fmt::Debug,
    Ty: EdgeType,
{
    if let Some(layout) = layout {
        debug!("using caller-supplied layout");
        return layout.compute(graph);
    }
    if let Some(layout) = graph.layout() {
        debug!("using graph-attached layout");
        return layout.compute(graph);
    }

    if is_forest(graph) {
        debug!(nodes = graph.node_count(), "forest graph, using tree layout");
        TreeLayout::default().compute(graph)
    } else if is_planar(graph) {
        debug!(nodes = graph.node_count(), "planar graph, using planar layout");
        PlanarLayout::default().compute(graph)
    } else {
        debug!(nodes = graph.node_count(), "non-planar graph, using spring layout");
        SpringLayout::default().compute(graph)
    }
}

/// Whether the graph, ignoring edge direction, has no cycles.
///
/// Self-loops and parallel edges count as cycles.
pub fn is_forest<N, Ty>(graph: &PlotGraph<N, Ty>) -> bool
where
    N: Clone + Eq + Hash,
    Ty: EdgeType,
{
    let mut components = UnionFind::<usize>::new(graph.node_bound());
    graph
        .edge_endpoints()
        .all(|(source, target)| components.union(source.index(), target.index()))
}

/// Live nodes in node order, and every edge as a pair of dense slots into
/// that order.
pub(crate) fn dense_edges<N, Ty>(graph: &PlotGraph<N, Ty>) -> (Vec<NodeIndex>, Vec<(usize, usize)>)
where
    N: Clone + Eq + Hash,
    Ty: EdgeType,
{
    let mut slot = vec![usize::MAX; graph.node_bound()];
    let indices: Vec<_> = graph.node_indices().collect();
    for (i, index) in indices.iter().enumerate() {
        slot[index.index()] = i;
    }
    let edges = graph
        .edge_endpoints()
        .map(|(u, v)| (slot[u.index()], slot[v.index()]))
        .collect();
    (indices, edges)
}

/// Center on the mean and scale the largest magnitude to `scale`.
pub(crate) fn rescale(pos: &mut [(f64, f64)], scale: f64) {
    if pos.is_empty() {
        return;
    }
    let n = pos.len() as f64;
    let (sx, sy) = pos
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.0, sy + p.1));
    let (cx, cy) = (sx / n, sy / n);

    let mut limit: f64 = 0.0;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        limit = limit.max(p.0.abs()).max(p.1.abs());
    }
    if limit > 0.0 {
        let factor = scale / limit;
        for p in pos.iter_mut() {
            p.0 *= factor;
            p.1 *= factor;
        }
    }
}

/// Key dense-slot coordinates by node id, rejecting non-finite ones.
pub(crate) fn collect_positions<N, Ty>(
    graph: &PlotGraph<N, Ty>,
    indices: &[NodeIndex],
    pos: Vec<(f64, f64)>,
) -> Result<PositionMap<N>, LayoutError>
where
    N: Clone + Eq + Hash + fmt::Debug,
    Ty: EdgeType,
{
    indices
        .iter()
        .zip(pos)
        .map(|(&index, (x, y))| {
            let id = &graph.record(index).id;
            let point = Point::new(x, y);
            if point.is_finite() {
                Ok((id.clone(), point))
            } else {
                Err(LayoutError::NonFinite {
                    node: format!("{id:?}"),
                })
            }
        })
        .collect()
}
