//! Plot geometry: edge polylines with break rows, arrow midpoints, and the
//! assembler that ties them to a layout.
//!
//! All coordinate arrays are ordered sequences of [`Point`]s. A break row is
//! a NaN pair that plotting backends treat as "lift the pen", which lets every
//! edge of a graph go out as one polyline.

mod assemble;
mod edges;
mod midpoints;

pub use assemble::{PlotGeometry, graph_to_edge_array, graph_to_plot_geometry};
pub use edges::{EdgePosition, edge_positions, separate, to_array};
pub use midpoints::{ArrowGeometry, midpoints};

use serde::{Deserialize, Serialize};

/// A 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The sentinel row separating two edges in a separated edge array.
    pub const BREAK: Point = Point {
        x: f64::NAN,
        y: f64::NAN,
    };

    /// Create a point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether this is a break row.
    #[inline]
    pub fn is_break(self) -> bool {
        self.x.is_nan() && self.y.is_nan()
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// X column of a coordinate array.
pub fn xs(points: &[Point]) -> Vec<f64> {
    points.iter().map(|p| p.x).collect()
}

/// Y column of a coordinate array.
pub fn ys(points: &[Point]) -> Vec<f64> {
    points.iter().map(|p| p.y).collect()
}

/// Interleave a coordinate array into [x0, y0, x1, y1, ...].
pub fn interleave(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}
