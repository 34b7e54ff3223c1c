//! Planarity testing and a crossing-free straight-line layout.
//!
//! [`is_planar`] runs the Left-Right planarity test, ignoring edge direction,
//! self-loops and repeated edges. [`PlanarLayout`] turns the embedding found
//! by that test into a grid drawing and rescales it the same way the spring
//! layout does.

mod drawing;
mod embedding;
mod lr;

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use petgraph::EdgeType;
use tracing::debug;

use super::{Layout, PositionMap, collect_positions, dense_edges, rescale};
use crate::error::LayoutError;
use crate::graph::PlotGraph;

/// Configuration for the planar layout.
#[derive(Debug, Clone)]
pub struct PlanarConfig {
    /// Largest coordinate magnitude of the output.
    pub scale: f64,
}

impl Default for PlanarConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Straight-line drawing of a planar graph with no edge crossings.
///
/// Fails with [`LayoutError::NotPlanar`] on graphs that have no planar
/// embedding.
#[derive(Debug, Clone, Default)]
pub struct PlanarLayout {
    config: PlanarConfig,
}

impl PlanarLayout {
    pub fn new(config: PlanarConfig) -> Self {
        Self { config }
    }
}

/// Simple undirected adjacency over dense slots.
fn simple_adjacency(count: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); count];
    let mut seen = HashSet::with_capacity(edges.len());
    for &(u, v) in edges {
        if u == v || !seen.insert((u.min(v), u.max(v))) {
            continue;
        }
        adjacency[u].push(v);
        adjacency[v].push(u);
    }
    adjacency
}

/// Whether the graph can be drawn in the plane without edge crossings.
pub fn is_planar<N, Ty>(graph: &PlotGraph<N, Ty>) -> bool
where
    N: Clone + Eq + Hash,
    Ty: EdgeType,
{
    let (indices, edges) = dense_edges(graph);
    lr::planar_embedding(&simple_adjacency(indices.len(), &edges)).is_some()
}

impl<N, Ty> Layout<N, Ty> for PlanarLayout
where
    N: Clone + Eq + Hash + fmt::Debug,
    Ty: EdgeType,
{
    fn compute(&self, graph: &PlotGraph<N, Ty>) -> Result<PositionMap<N>, LayoutError> {
        let (indices, edges) = dense_edges(graph);
        let adjacency = simple_adjacency(indices.len(), &edges);
        let embedding = lr::planar_embedding(&adjacency).ok_or(LayoutError::NotPlanar)?;
        let grid = drawing::grid_positions(&embedding)
            .ok_or_else(|| LayoutError::failed("planar embedding has no canonical ordering"))?;
        debug!(nodes = indices.len(), "computed planar grid drawing");

        let mut pos: Vec<(f64, f64)> = grid
            .into_iter()
            .map(|(x, y)| (x as f64, y as f64))
            .collect();
        rescale(&mut pos, self.config.scale);
        collect_positions(graph, &indices, pos)
    }
}
