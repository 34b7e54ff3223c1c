//! Edge endpoint lookup, flattening, and break-row separation.

use std::fmt;
use std::hash::Hash;

use super::Point;
use crate::error::GeometryError;
use crate::layout::PositionMap;

/// Endpoint coordinates of one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePosition<N> {
    pub source: N,
    pub target: N,
    pub start: Point,
    pub end: Point,
}

/// Look up both endpoints of every edge, preserving edge order.
///
/// Fails on the first endpoint missing from `positions`.
pub fn edge_positions<'a, N, I>(
    edges: I,
    positions: &PositionMap<N>,
) -> Result<Vec<EdgePosition<N>>, GeometryError>
where
    N: Clone + Eq + Hash + fmt::Debug + 'a,
    I: IntoIterator<Item = (&'a N, &'a N)>,
{
    edges
        .into_iter()
        .map(|(source, target)| {
            let lookup = |node: &N| {
                positions
                    .get(node)
                    .copied()
                    .ok_or_else(|| GeometryError::MissingPosition {
                        node: format!("{node:?}"),
                        edge: format!("({source:?}, {target:?})"),
                    })
            };
            Ok(EdgePosition {
                source: source.clone(),
                target: target.clone(),
                start: lookup(source)?,
                end: lookup(target)?,
            })
        })
        .collect()
}

/// Flatten edge positions into [start0, end0, start1, end1, ...].
pub fn to_array<N>(edge_positions: &[EdgePosition<N>]) -> Vec<Point> {
    edge_positions
        .iter()
        .flat_map(|edge| [edge.start, edge.end])
        .collect()
}

/// Insert a break row after every (start, end) pair.
///
/// The result repeats (start, end, break) and has 3 rows per edge.
///
/// # Panics
///
/// Panics if `rows` has an odd length.
pub fn separate(rows: &[Point]) -> Vec<Point> {
    assert!(
        rows.len() % 2 == 0,
        "edge array must hold row pairs, got {} rows",
        rows.len()
    );

    let mut separated = Vec::with_capacity(rows.len() / 2 * 3);
    for pair in rows.chunks(2) {
        separated.extend_from_slice(pair);
        separated.push(Point::BREAK);
    }
    separated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions() -> PositionMap<&'static str> {
        [
            ("A", Point::new(0.0, 0.0)),
            ("B", Point::new(1.0, 0.0)),
            ("C", Point::new(1.0, 1.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_edge_positions_in_edge_order() {
        let edges = [("B", "C"), ("A", "B")];
        let result = edge_positions(edges.iter().map(|(s, t)| (s, t)), &positions()).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].source, "B");
        assert_eq!(result[0].start, Point::new(1.0, 0.0));
        assert_eq!(result[0].end, Point::new(1.0, 1.0));
        assert_eq!(result[1].target, "B");
    }

    #[test]
    fn test_missing_position_fails() {
        let edges = [("A", "Z")];
        let err = edge_positions(edges.iter().map(|(s, t)| (s, t)), &positions()).unwrap_err();

        assert_eq!(
            err,
            GeometryError::MissingPosition {
                node: "\"Z\"".into(),
                edge: "(\"A\", \"Z\")".into(),
            }
        );
    }

    #[test]
    fn test_to_array_flattens_start_then_end() {
        let edges = [("A", "B"), ("B", "C")];
        let rows = to_array(&edge_positions(edges.iter().map(|(s, t)| (s, t)), &positions()).unwrap());

        assert_eq!(
            rows,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_separate_inserts_break_after_each_edge() {
        let rows = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        let separated = separate(&rows);

        assert_eq!(separated.len(), 6);
        for (i, row) in separated.iter().enumerate() {
            if i % 3 == 2 {
                assert!(row.is_break(), "row {i} should be a break");
            } else {
                assert!(row.is_finite(), "row {i} should be finite");
            }
        }
        assert_eq!(separated[3], Point::new(1.0, 0.0));
    }

    #[test]
    fn test_empty_edges() {
        let edges: [(&str, &str); 0] = [];
        let result = edge_positions(edges.iter().map(|(s, t)| (s, t)), &positions()).unwrap();
        assert!(result.is_empty());
        assert!(to_array(&result).is_empty());
        assert!(separate(&[]).is_empty());
    }

    #[test]
    #[should_panic(expected = "row pairs")]
    fn test_separate_rejects_odd_rows() {
        separate(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)]);
    }
}
