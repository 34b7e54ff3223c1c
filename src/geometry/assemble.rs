//! One-call plot geometry for a graph.

use std::fmt;
use std::hash::Hash;

use petgraph::EdgeType;
use serde::Serialize;
use tracing::debug;

use super::{ArrowGeometry, Point, edge_positions, midpoints, separate, to_array};
use crate::error::PlotError;
use crate::graph::PlotGraph;
use crate::layout::{Layout, resolve_layout};

/// Everything needed to draw a graph with 2D line/marker traces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotGeometry {
    /// One position per node, in layout order.
    pub node_positions: Vec<Point>,
    /// Separated edge array: (start, end, break) per edge.
    pub edge_lines: Vec<Point>,
    /// Arrow markers, present only for directed graphs.
    pub arrows: Option<ArrowGeometry>,
}

/// Lay out a graph and build its node, edge, and arrow geometry.
pub fn graph_to_plot_geometry<N, Ty>(
    graph: &PlotGraph<N, Ty>,
    layout: Option<&dyn Layout<N, Ty>>,
) -> Result<PlotGeometry, PlotError>
where
    N: Clone + Eq + Hash + fmt::Debug,
    Ty: EdgeType,
{
    let positions = resolve_layout(graph, layout)?;
    let edge_lines = separate(&to_array(&edge_positions(graph.edges(), &positions)?));
    let arrows = graph.is_directed().then(|| midpoints(&edge_lines));

    debug!(
        nodes = positions.len(),
        edges = graph.edge_count(),
        directed = graph.is_directed(),
        "assembled plot geometry"
    );

    Ok(PlotGeometry {
        node_positions: positions.values().copied().collect(),
        edge_lines,
        arrows,
    })
}

/// Lay out a graph and return its unseparated edge array.
pub fn graph_to_edge_array<N, Ty>(
    graph: &PlotGraph<N, Ty>,
    layout: Option<&dyn Layout<N, Ty>>,
) -> Result<Vec<Point>, PlotError>
where
    N: Clone + Eq + Hash + fmt::Debug,
    Ty: EdgeType,
{
    let positions = resolve_layout(graph, layout)?;
    Ok(to_array(&edge_positions(graph.edges(), &positions)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeometryError, LayoutError};
    use crate::graph::{DiPlotGraph, UnPlotGraph};
    use crate::layout::PositionMap;

    fn fixed(_: &UnPlotGraph<&'static str>) -> Result<PositionMap<&'static str>, LayoutError> {
        Ok([
            ("A", Point::new(0.0, 0.0)),
            ("B", Point::new(1.0, 0.0)),
            ("C", Point::new(1.0, 1.0)),
        ]
        .into_iter()
        .collect())
    }

    fn path() -> UnPlotGraph<&'static str> {
        let mut graph = PlotGraph::new();
        graph.add_edge("A", "B");
        graph.add_edge("B", "C");
        graph
    }

    #[test]
    fn test_undirected_path_geometry() {
        let graph = path();
        let geometry = graph_to_plot_geometry(&graph, Some(&fixed)).unwrap();

        let rows = &geometry.edge_lines;
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], Point::new(0.0, 0.0));
        assert_eq!(rows[1], Point::new(1.0, 0.0));
        assert!(rows[2].is_break());
        assert_eq!(rows[3], Point::new(1.0, 0.0));
        assert_eq!(rows[4], Point::new(1.0, 1.0));
        assert!(rows[5].is_break());

        assert_eq!(geometry.node_positions.len(), 3);
        assert!(geometry.arrows.is_none());
    }

    #[test]
    fn test_directed_graph_has_arrows() {
        let mut graph: DiPlotGraph<&str> = PlotGraph::new();
        graph.add_edge("A", "B");
        graph.add_edge("A", "C");
        let layout = |_: &DiPlotGraph<&'static str>| -> Result<PositionMap<&'static str>, LayoutError> {
            Ok([
                ("A", Point::new(0.0, 0.0)),
                ("B", Point::new(2.0, 0.0)),
                ("C", Point::new(0.0, 2.0)),
            ]
            .into_iter()
            .collect())
        };

        let geometry = graph_to_plot_geometry(&graph, Some(&layout)).unwrap();
        let arrows = geometry.arrows.unwrap();
        assert_eq!(arrows.midpoints, vec![Point::new(1.0, 0.0), Point::new(0.0, 1.0)]);
        assert_eq!(arrows.angles.len(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let graph: DiPlotGraph<u32> = PlotGraph::new();
        let geometry = graph_to_plot_geometry(&graph, None).unwrap();

        assert!(geometry.node_positions.is_empty());
        assert!(geometry.edge_lines.is_empty());
        let arrows = geometry.arrows.unwrap();
        assert!(arrows.midpoints.is_empty());
    }

    #[test]
    fn test_missing_position_propagates() {
        let mut graph = path();
        graph.add_edge("C", "D");

        let err = graph_to_plot_geometry(&graph, Some(&fixed)).unwrap_err();
        assert!(matches!(
            err,
            PlotError::Geometry(GeometryError::MissingPosition { .. })
        ));
    }

    #[test]
    fn test_layout_failure_propagates() {
        let graph = path();
        let failing = |_: &UnPlotGraph<&'static str>| -> Result<PositionMap<&'static str>, LayoutError> {
            Err(LayoutError::failed("no convergence"))
        };

        let err = graph_to_plot_geometry(&graph, Some(&failing)).unwrap_err();
        assert_eq!(err, PlotError::Layout(LayoutError::failed("no convergence")));
    }

    #[test]
    fn test_attached_layout_is_used() {
        let mut graph = path();
        graph.set_layout(fixed);

        let rows = graph_to_edge_array(&graph, None).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3], Point::new(1.0, 1.0));
    }

    #[test]
    fn test_geometry_is_repeatable() {
        let mut graph: UnPlotGraph<u32> = PlotGraph::new();
        for (a, b) in [(0, 1), (1, 2), (2, 0), (2, 3)] {
            graph.add_edge(a, b);
        }

        let first = graph_to_plot_geometry(&graph, None).unwrap();
        let second = graph_to_plot_geometry(&graph, None).unwrap();
        assert_eq!(first.node_positions, second.node_positions);
        assert_eq!(first.edge_lines.len(), second.edge_lines.len());
        for (a, b) in first.edge_lines.iter().zip(&second.edge_lines) {
            assert!((a.is_break() && b.is_break()) || a == b);
        }
    }
}
