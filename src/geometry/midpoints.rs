//! Arrow placement for directed edges.

use std::f64::consts::PI;

use serde::Serialize;

use super::Point;

/// Arrow markers: one midpoint and one orientation angle per edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowGeometry {
    pub midpoints: Vec<Point>,
    /// Degrees, measured so that 0 points along +y and 90 along +x.
    pub angles: Vec<f64>,
}

/// Compute arrow midpoints and angles from a separated edge array.
///
/// The angle is `atan2(dx, dy)`: the horizontal component goes first, so
/// marker glyphs whose rest orientation is "up" turn to face the edge.
///
/// # Panics
///
/// Panics if `separated` does not hold whole (start, end, break) triples.
pub fn midpoints(separated: &[Point]) -> ArrowGeometry {
    assert!(
        separated.len() % 3 == 0,
        "separated edge array has {} rows, expected a multiple of 3",
        separated.len()
    );

    let (midpoints, angles) = separated
        .chunks_exact(3)
        .map(|rows| {
            let (start, end) = (rows[0], rows[1]);
            let mid = Point::new(start.x / 2.0 + end.x / 2.0, start.y / 2.0 + end.y / 2.0);
            let (dx, dy) = (end.x - start.x, end.y - start.y);
            (mid, dx.atan2(dy) * (180.0 / PI))
        })
        .unzip();

    ArrowGeometry { midpoints, angles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::separate;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_midpoint_is_average() {
        let rows = separate(&[Point::new(0.0, 0.0), Point::new(2.0, 4.0)]);
        let arrows = midpoints(&rows);

        assert_eq!(arrows.midpoints, vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_angle_zero_points_up() {
        let rows = separate(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, -3.0),
            Point::new(0.0, 0.0),
            Point::new(-2.0, 0.0),
        ]);
        let arrows = midpoints(&rows);

        assert!(approx(arrows.angles[0], 0.0));
        assert!(approx(arrows.angles[1], 90.0));
        assert!(approx(arrows.angles[2], 180.0));
        assert!(approx(arrows.angles[3], -90.0));
    }

    #[test]
    fn test_empty_input() {
        let arrows = midpoints(&[]);
        assert!(arrows.midpoints.is_empty());
        assert!(arrows.angles.is_empty());
    }

    #[test]
    #[should_panic(expected = "multiple of 3")]
    fn test_malformed_array_panics() {
        midpoints(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
    }
}
