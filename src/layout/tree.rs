//! Layered tree layout for forests.
//!
//! Every connected component is walked from a root (a node without incoming
//! edges when there is one) ignoring edge direction. Leaves take consecutive
//! horizontal slots in walk order and each parent is centered over its first
//! and last child, so subtrees never interleave and the drawing of a forest
//! has no crossings.
//!
//! The (slot, depth) pairs are then mapped to linear (top-down) or radial
//! coordinates. Graphs with cycles still get a position for every node, but
//! the non-tree edges may cross.

use std::collections::HashSet;
use std::f64::consts::TAU;
use std::hash::Hash;

use petgraph::EdgeType;
use petgraph::stable_graph::NodeIndex;

use super::{Layout, PositionMap};
use crate::error::LayoutError;
use crate::geometry::Point;
use crate::graph::PlotGraph;

/// Coordinate mode for the final layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateMode {
    /// Top-down layout: x = slot, y = -depth.
    Linear,
    /// Polar layout: angle from slot, radius from depth.
    Radial,
}

/// Configuration for the tree layout.
#[derive(Debug, Clone)]
pub struct TreeLayoutConfig {
    /// Horizontal distance between neighboring leaves.
    pub sibling_separation: f64,
    /// Vertical (or radial) distance between levels.
    pub level_separation: f64,
    /// Coordinate output mode.
    pub coordinate_mode: CoordinateMode,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            sibling_separation: 1.0,
            level_separation: 1.0,
            coordinate_mode: CoordinateMode::Linear,
        }
    }
}

/// Spanning forest in walk order.
struct Walk {
    /// Nodes in preorder.
    order: Vec<NodeIndex>,
    /// Children per node slot.
    children: Vec<Vec<NodeIndex>>,
    /// Depth per node slot.
    depth: Vec<u32>,
    /// Number of components.
    roots: usize,
}

/// The tree layout engine.
#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    config: TreeLayoutConfig,
}

impl TreeLayout {
    /// Create a tree layout with the given configuration.
    pub fn new(config: TreeLayoutConfig) -> Self {
        Self { config }
    }

    /// Root candidates: in-degree zero first, then everything else.
    fn root_candidates<N, Ty>(graph: &PlotGraph<N, Ty>) -> Vec<NodeIndex>
    where
        N: Clone + Eq + Hash,
        Ty: EdgeType,
    {
        let (mut sources, rest): (Vec<_>, Vec<_>) = graph
            .node_indices()
            .partition(|&index| Ty::is_directed() && graph.in_degree_of(index) == 0);
        sources.extend(rest);
        sources
    }

    /// Build a spanning forest with an explicit stack and a visited set.
    fn walk<N, Ty>(graph: &PlotGraph<N, Ty>) -> Walk
    where
        N: Clone + Eq + Hash,
        Ty: EdgeType,
    {
        let bound = graph.node_bound();
        let mut walk = Walk {
            order: Vec::with_capacity(graph.node_count()),
            children: vec![Vec::new(); bound],
            depth: vec![0; bound],
            roots: 0,
        };
        let mut visited: HashSet<NodeIndex> = HashSet::new();

        for root in Self::root_candidates(graph) {
            if !visited.insert(root) {
                continue;
            }
            walk.roots += 1;

            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                walk.order.push(node);
                let fresh: Vec<NodeIndex> = graph
                    .neighbor_indices(node)
                    .into_iter()
                    .filter(|&next| visited.insert(next))
                    .collect();
                for &child in &fresh {
                    walk.depth[child.index()] = walk.depth[node.index()] + 1;
                }
                // Reversed so the first child is popped first.
                stack.extend(fresh.iter().rev());
                walk.children[node.index()] = fresh;
            }
        }
        walk
    }

    /// Horizontal slot per node: leaves in preorder, parents centered.
    fn slots(&self, walk: &Walk) -> Vec<f64> {
        let mut x = vec![0.0; walk.children.len()];
        let mut next_leaf = 0.0;

        for &node in &walk.order {
            if walk.children[node.index()].is_empty() {
                x[node.index()] = next_leaf;
                next_leaf += self.config.sibling_separation;
            }
        }
        for &node in walk.order.iter().rev() {
            let children = &walk.children[node.index()];
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                x[node.index()] = (x[first.index()] + x[last.index()]) / 2.0;
            }
        }
        x
    }
}

impl<N, Ty> Layout<N, Ty> for TreeLayout
where
    N: Clone + Eq + Hash,
    Ty: EdgeType,
{
    fn compute(&self, graph: &PlotGraph<N, Ty>) -> Result<PositionMap<N>, LayoutError> {
        let walk = Self::walk(graph);
        let x = self.slots(&walk);
        let level = self.config.level_separation;

        let (min_x, max_x) = walk
            .order
            .iter()
            .map(|node| x[node.index()])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let x_range = max_x - min_x;

        let place = |index: NodeIndex| -> Point {
            let depth = walk.depth[index.index()] as f64;
            match self.config.coordinate_mode {
                CoordinateMode::Linear => {
                    Point::new(x[index.index()] - (min_x + x_range / 2.0), -depth * level)
                }
                CoordinateMode::Radial => {
                    // A lone root sits at the center; several roots share the first ring.
                    let ring = if walk.roots > 1 { depth + 1.0 } else { depth };
                    let divisor = x_range + self.config.sibling_separation;
                    let angle = if divisor > f64::EPSILON {
                        (x[index.index()] - min_x) * TAU / divisor
                    } else {
                        0.0
                    };
                    let radius = ring * level;
                    Point::new(radius * angle.cos(), radius * angle.sin())
                }
            }
        };

        Ok(graph
            .node_indices()
            .map(|index| (graph.record(index).id.clone(), place(index)))
            .collect())
    }
}
