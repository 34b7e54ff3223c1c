//! Left-Right planarity test (de Fraysseix-Rosenstiehl, as formulated by
//! Brandes).
//!
//! Three depth-first passes over a simple undirected graph:
//!
//! 1. orientation: DFS heights, lowpoints and a nesting depth per edge
//! 2. testing: return edges are kept in a stack of conflict pairs and every
//!    edge is constrained to the left or right side of its parent
//! 3. embedding: sides are resolved into signs and the rotation at each node
//!    is built from nesting depths
//!
//! All three passes use explicit stacks, so long paths do not recurse.

use std::collections::HashMap;

use super::embedding::Embedding;

const UNVISITED: usize = usize::MAX;

/// Interval of return edges on one side, from `low` up to `high`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Interval {
    low: Option<usize>,
    high: Option<usize>,
}

impl Interval {
    fn edge(edge: usize) -> Self {
        Self {
            low: Some(edge),
            high: Some(edge),
        }
    }

    fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ConflictPair {
    left: Interval,
    right: Interval,
}

impl ConflictPair {
    fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}

/// One node on an explicit DFS stack.
struct Frame {
    node: usize,
    next: usize,
    /// Tree edge whose subtree is being explored, finished on return.
    pending: Option<usize>,
}

impl Frame {
    fn new(node: usize) -> Self {
        Self {
            node,
            next: 0,
            pending: None,
        }
    }
}

struct LrState<'a> {
    adjacency: &'a [Vec<usize>],
    height: Vec<usize>,
    roots: Vec<usize>,

    /// Oriented edges as `(source, target)`, indexed by edge id.
    edges: Vec<(usize, usize)>,
    edge_ids: HashMap<(usize, usize), usize>,
    /// Outgoing edge ids per node, in orientation order.
    out: Vec<Vec<usize>>,
    parent_edge: Vec<Option<usize>>,

    lowpt: Vec<usize>,
    lowpt2: Vec<usize>,
    nesting_depth: Vec<i64>,

    reference: Vec<Option<usize>>,
    side: Vec<i64>,
    stack: Vec<ConflictPair>,
    /// Conflict stack length when each edge started.
    stack_bottom: Vec<usize>,
    lowpt_edge: Vec<Option<usize>>,

    left_ref: Vec<Option<usize>>,
    right_ref: Vec<Option<usize>>,
}

/// Planar embedding of a simple undirected graph, or `None` if it has none.
///
/// `adjacency[v]` lists the neighbors of slot `v`; each edge appears in both
/// lists and there are no self-loops or repeated neighbors.
pub fn planar_embedding(adjacency: &[Vec<usize>]) -> Option<Embedding> {
    let nodes = adjacency.len();
    let edges = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
    if nodes > 2 && edges > 3 * nodes - 6 {
        return None;
    }

    let mut state = LrState::new(adjacency, edges);
    for v in 0..nodes {
        if state.height[v] == UNVISITED {
            state.height[v] = 0;
            state.roots.push(v);
            state.orient(v);
        }
    }

    state.sort_by_nesting_depth();
    for root in state.roots.clone() {
        if !state.test(root) {
            return None;
        }
    }

    Some(state.embed())
}

impl<'a> LrState<'a> {
    fn new(adjacency: &'a [Vec<usize>], edges: usize) -> Self {
        let nodes = adjacency.len();
        Self {
            adjacency,
            height: vec![UNVISITED; nodes],
            roots: Vec::new(),
            edges: Vec::with_capacity(edges),
            edge_ids: HashMap::with_capacity(edges),
            out: vec![Vec::new(); nodes],
            parent_edge: vec![None; nodes],
            lowpt: Vec::with_capacity(edges),
            lowpt2: Vec::with_capacity(edges),
            nesting_depth: Vec::with_capacity(edges),
            reference: vec![None; edges],
            side: vec![1; edges],
            stack: Vec::new(),
            stack_bottom: vec![0; edges],
            lowpt_edge: vec![None; edges],
            left_ref: vec![None; nodes],
            right_ref: vec![None; nodes],
        }
    }

    fn is_oriented(&self, v: usize, w: usize) -> bool {
        self.edge_ids.contains_key(&(v, w)) || self.edge_ids.contains_key(&(w, v))
    }

    fn add_oriented(&mut self, v: usize, w: usize) -> usize {
        let edge = self.edges.len();
        self.edges.push((v, w));
        self.edge_ids.insert((v, w), edge);
        self.out[v].push(edge);
        self.lowpt.push(self.height[v]);
        self.lowpt2.push(self.height[v]);
        self.nesting_depth.push(0);
        edge
    }

    // Orientation -----------------------------------------------------------

    fn orient(&mut self, root: usize) {
        let mut stack = vec![Frame::new(root)];
        while let Some(frame) = stack.last_mut() {
            let v = frame.node;
            if let Some(edge) = frame.pending.take() {
                self.finish_orientation(v, edge);
            }
            let Some(&w) = self.adjacency[v].get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            if self.is_oriented(v, w) {
                continue;
            }

            let edge = self.add_oriented(v, w);
            if self.height[w] == UNVISITED {
                self.parent_edge[w] = Some(edge);
                self.height[w] = self.height[v] + 1;
                frame.pending = Some(edge);
                stack.push(Frame::new(w));
            } else {
                self.lowpt[edge] = self.height[w];
                self.finish_orientation(v, edge);
            }
        }
    }

    /// Nesting depth of `edge` and lowpoints of the parent edge of `v`.
    fn finish_orientation(&mut self, v: usize, edge: usize) {
        let chordal = self.lowpt2[edge] < self.height[v];
        self.nesting_depth[edge] = 2 * self.lowpt[edge] as i64 + i64::from(chordal);

        let Some(parent) = self.parent_edge[v] else {
            return;
        };
        let (low, low2) = (self.lowpt[edge], self.lowpt2[edge]);
        if low < self.lowpt[parent] {
            self.lowpt2[parent] = self.lowpt[parent].min(low2);
            self.lowpt[parent] = low;
        } else if low > self.lowpt[parent] {
            self.lowpt2[parent] = self.lowpt2[parent].min(low);
        } else {
            self.lowpt2[parent] = self.lowpt2[parent].min(low2);
        }
    }

    fn sort_by_nesting_depth(&mut self) {
        let depth = &self.nesting_depth;
        for out in &mut self.out {
            out.sort_by_key(|&edge| depth[edge]);
        }
    }

    // Testing ---------------------------------------------------------------

    fn test(&mut self, root: usize) -> bool {
        let mut stack = vec![Frame::new(root)];
        while let Some(frame) = stack.last_mut() {
            let v = frame.node;
            if let Some(edge) = frame.pending.take() {
                if !self.integrate(v, edge) {
                    return false;
                }
            }
            let Some(&edge) = self.out[v].get(frame.next) else {
                stack.pop();
                if let Some(parent) = self.parent_edge[v] {
                    self.remove_back_edges(parent);
                }
                continue;
            };
            frame.next += 1;

            self.stack_bottom[edge] = self.stack.len();
            let w = self.edges[edge].1;
            if self.parent_edge[w] == Some(edge) {
                frame.pending = Some(edge);
                stack.push(Frame::new(w));
            } else {
                self.lowpt_edge[edge] = Some(edge);
                self.stack.push(ConflictPair {
                    left: Interval::default(),
                    right: Interval::edge(edge),
                });
                if !self.integrate(v, edge) {
                    return false;
                }
            }
        }
        true
    }

    /// Fold the return edges of `edge`, an outgoing edge of `v`, into the
    /// constraints of the parent edge of `v`.
    fn integrate(&mut self, v: usize, edge: usize) -> bool {
        if self.lowpt[edge] >= self.height[v] {
            return true;
        }
        let Some(parent) = self.parent_edge[v] else {
            return true;
        };
        if self.out[v].first() == Some(&edge) {
            self.lowpt_edge[parent] = self.lowpt_edge[edge];
            true
        } else {
            self.add_constraints(edge, parent)
        }
    }

    fn lowpt_of(&self, edge: Option<usize>) -> Option<usize> {
        edge.map(|e| self.lowpt[e])
    }

    fn conflicting(&self, interval: &Interval, edge: usize) -> bool {
        !interval.is_empty() && self.lowpt_of(interval.high) > Some(self.lowpt[edge])
    }

    fn lowest(&self, pair: &ConflictPair) -> Option<usize> {
        if pair.left.is_empty() {
            return self.lowpt_of(pair.right.low);
        }
        if pair.right.is_empty() {
            return self.lowpt_of(pair.left.low);
        }
        self.lowpt_of(pair.left.low).min(self.lowpt_of(pair.right.low))
    }

    fn set_reference(&mut self, edge: Option<usize>, target: Option<usize>) {
        if let Some(edge) = edge {
            self.reference[edge] = target;
        }
    }

    fn add_constraints(&mut self, edge: usize, parent: usize) -> bool {
        let mut merged = ConflictPair::default();

        // Return edges of `edge` all go on the right.
        while let Some(mut pair) = self.stack.pop() {
            if !pair.left.is_empty() {
                pair.swap();
            }
            if !pair.left.is_empty() {
                return false;
            }
            if self.lowpt_of(pair.right.low) > Some(self.lowpt[parent]) {
                if merged.right.is_empty() {
                    merged.right = pair.right;
                } else {
                    self.set_reference(merged.right.low, pair.right.high);
                }
                merged.right.low = pair.right.low;
            } else {
                self.set_reference(pair.right.low, self.lowpt_edge[parent]);
            }
            if self.stack.len() == self.stack_bottom[edge] {
                break;
            }
        }

        // Conflicting return edges of earlier siblings go on the left.
        while let Some(top) = self.stack.last() {
            if !(self.conflicting(&top.left, edge) || self.conflicting(&top.right, edge)) {
                break;
            }
            let Some(mut pair) = self.stack.pop() else {
                break;
            };
            if self.conflicting(&pair.right, edge) {
                pair.swap();
            }
            if self.conflicting(&pair.right, edge) {
                return false;
            }
            self.set_reference(merged.right.low, pair.right.high);
            if pair.right.low.is_some() {
                merged.right.low = pair.right.low;
            }
            if merged.left.is_empty() {
                merged.left = pair.left;
            } else {
                self.set_reference(merged.left.low, pair.left.high);
            }
            merged.left.low = pair.left.low;
        }

        if !(merged.left.is_empty() && merged.right.is_empty()) {
            self.stack.push(merged);
        }
        true
    }

    /// Drop return edges ending at the source of `edge` once its subtree is
    /// done.
    fn remove_back_edges(&mut self, edge: usize) {
        let u = self.edges[edge].0;
        let height = Some(self.height[u]);

        while self
            .stack
            .last()
            .is_some_and(|pair| self.lowest(pair) == height)
        {
            if let Some(pair) = self.stack.pop() {
                if let Some(low) = pair.left.low {
                    self.side[low] = -1;
                }
            }
        }

        if let Some(mut pair) = self.stack.pop() {
            while let Some(high) = pair.left.high.filter(|&h| self.edges[h].1 == u) {
                pair.left.high = self.reference[high];
            }
            if pair.left.high.is_none() {
                if let Some(low) = pair.left.low {
                    self.reference[low] = pair.right.low;
                    self.side[low] = -1;
                    pair.left.low = None;
                }
            }

            while let Some(high) = pair.right.high.filter(|&h| self.edges[h].1 == u) {
                pair.right.high = self.reference[high];
            }
            if pair.right.high.is_none() {
                if let Some(low) = pair.right.low {
                    self.reference[low] = pair.left.low;
                    self.side[low] = -1;
                    pair.right.low = None;
                }
            }
            self.stack.push(pair);
        }

        // The side of `edge` follows its highest return edge.
        if self.lowpt[edge] < self.height[u] {
            if let Some(top) = self.stack.last() {
                let (left, right) = (top.left.high, top.right.high);
                self.reference[edge] = match (left, right) {
                    (Some(l), Some(r)) if self.lowpt[l] > self.lowpt[r] => left,
                    (Some(_), None) => left,
                    _ => right,
                };
            }
        }
    }

    // Embedding -------------------------------------------------------------

    /// Resolve the final side of `edge` through its chain of references.
    fn sign(&mut self, edge: usize) -> i64 {
        let mut chain = Vec::new();
        let mut current = edge;
        while let Some(next) = self.reference[current] {
            chain.push(current);
            current = next;
        }
        let mut sign = self.side[current];
        for &e in chain.iter().rev() {
            self.side[e] *= sign;
            self.reference[e] = None;
            sign = self.side[e];
        }
        self.side[edge]
    }

    fn embed(mut self) -> Embedding {
        for edge in 0..self.edges.len() {
            self.nesting_depth[edge] *= self.sign(edge);
        }
        self.sort_by_nesting_depth();

        let mut embedding = Embedding::new(self.adjacency.len());
        for v in 0..self.out.len() {
            let mut previous = None;
            for &edge in &self.out[v] {
                let w = self.edges[edge].1;
                embedding.add_half_edge_cw(v, w, previous);
                previous = Some(w);
            }
        }

        for root in self.roots.clone() {
            self.embed_from(root, &mut embedding);
        }
        embedding
    }

    fn embed_from(&mut self, root: usize, embedding: &mut Embedding) {
        let mut stack = vec![Frame::new(root)];
        while let Some(frame) = stack.last_mut() {
            let v = frame.node;
            let Some(&edge) = self.out[v].get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;

            let w = self.edges[edge].1;
            if self.parent_edge[w] == Some(edge) {
                embedding.add_half_edge_first(w, v);
                self.left_ref[v] = Some(w);
                self.right_ref[v] = Some(w);
                stack.push(Frame::new(w));
            } else if self.side[edge] == 1 {
                embedding.add_half_edge_cw(w, v, self.right_ref[w]);
            } else {
                embedding.add_half_edge_ccw(w, v, self.left_ref[w]);
                self.left_ref[w] = Some(v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Adjacency lists for `count` nodes from an edge list.
    fn adjacency(count: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); count];
        for &(u, v) in edges {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
        adjacency
    }

    fn complete(count: usize) -> Vec<Vec<usize>> {
        let edges: Vec<_> = (0..count)
            .flat_map(|u| ((u + 1)..count).map(move |v| (u, v)))
            .collect();
        adjacency(count, &edges)
    }

    fn grid(width: usize, height: usize) -> Vec<Vec<usize>> {
        let mut edges = Vec::new();
        for row in 0..height {
            for col in 0..width {
                let v = row * width + col;
                if col + 1 < width {
                    edges.push((v, v + 1));
                }
                if row + 1 < height {
                    edges.push((v, v + width));
                }
            }
        }
        adjacency(width * height, &edges)
    }

    fn assert_planar(adjacency: &[Vec<usize>]) {
        let embedding = planar_embedding(adjacency).expect("graph should be planar");
        assert_eq!(embedding.node_count(), adjacency.len());
        for (v, neighbors) in adjacency.iter().enumerate() {
            let mut embedded = embedding.neighbors_cw(v);
            let mut expected = neighbors.clone();
            embedded.sort_unstable();
            expected.sort_unstable();
            assert_eq!(embedded, expected, "rotation at {v}");
        }
        assert!(embedding.satisfies_euler());
    }

    #[test]
    fn test_small_graphs_are_planar() {
        assert_planar(&adjacency(0, &[]));
        assert_planar(&adjacency(1, &[]));
        assert_planar(&adjacency(3, &[(0, 1)]));
        assert_planar(&complete(3));
        assert_planar(&complete(4));
    }

    #[test]
    fn test_cycles_and_diamond() {
        assert_planar(&adjacency(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]));
        assert_planar(&adjacency(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]));
        assert_planar(&adjacency(4, &[(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)]));
    }

    #[test]
    fn test_grid_and_wheel() {
        assert_planar(&grid(5, 4));

        let mut wheel: Vec<_> = (1..=8).map(|v| (0, v)).collect();
        wheel.extend((1..=8).map(|v| (v, v % 8 + 1)));
        assert_planar(&adjacency(9, &wheel));
    }

    #[test]
    fn test_disconnected_planar() {
        let edges = [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 6), (6, 3), (3, 5)];
        assert_planar(&adjacency(8, &edges));
    }

    #[test]
    fn test_complete_five_is_not_planar() {
        assert!(planar_embedding(&complete(5)).is_none());
        // K5 minus an edge passes.
        let edges: Vec<_> = (0..5)
            .flat_map(|u| ((u + 1)..5).map(move |v| (u, v)))
            .filter(|&e| e != (0, 1))
            .collect();
        assert_planar(&adjacency(5, &edges));
    }

    #[test]
    fn test_utility_graph_is_not_planar() {
        let edges: Vec<_> = (0..3)
            .flat_map(|u| (3..6).map(move |v| (u, v)))
            .collect();
        // Passes the edge-count bound, so the DFS test has to reject it.
        assert!(edges.len() <= 3 * 6 - 6);
        assert!(planar_embedding(&adjacency(6, &edges)).is_none());
    }

    #[test]
    fn test_petersen_is_not_planar() {
        let mut edges = Vec::new();
        for i in 0..5 {
            edges.push((i, (i + 1) % 5));
            edges.push((i, i + 5));
            edges.push((i + 5, (i + 2) % 5 + 5));
        }
        assert!(planar_embedding(&adjacency(10, &edges)).is_none());
    }

    #[test]
    fn test_subdivided_utility_graph_is_not_planar() {
        // K3,3 with every edge split by an extra node.
        let mut edges = Vec::new();
        let mut next = 6;
        for u in 0..3 {
            for v in 3..6 {
                edges.push((u, next));
                edges.push((next, v));
                next += 1;
            }
        }
        assert!(planar_embedding(&adjacency(next, &edges)).is_none());
    }

    #[test]
    fn test_long_cycle_does_not_recurse() {
        let count = 50_000;
        let edges: Vec<_> = (0..count).map(|v| (v, (v + 1) % count)).collect();
        let embedding = planar_embedding(&adjacency(count, &edges)).unwrap();
        assert_eq!(embedding.face_count(), 2);
    }
}
