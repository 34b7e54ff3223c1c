//! Combinatorial planar embeddings.
//!
//! An embedding stores, for every node, the clockwise cyclic order of its
//! neighbors. Each half-edge `(v, w)` knows the neighbors of `v` directly
//! clockwise and counterclockwise of `w`, so insertions next to a known
//! neighbor are constant time.

use std::collections::HashMap;
#[cfg(test)]
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ring {
    cw: usize,
    ccw: usize,
}

/// Rotation system over dense node slots `0..node_count`.
#[derive(Debug, Clone, Default)]
pub struct Embedding {
    rings: Vec<HashMap<usize, Ring>>,
    first: Vec<Option<usize>>,
}

impl Embedding {
    /// An embedding of `count` nodes and no edges.
    pub fn new(count: usize) -> Self {
        Self {
            rings: vec![HashMap::new(); count],
            first: vec![None; count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.rings.len()
    }

    pub fn has_edge(&self, v: usize, w: usize) -> bool {
        self.rings[v].contains_key(&w)
    }

    /// Neighbor of `v` directly clockwise of `w`.
    pub fn cw(&self, v: usize, w: usize) -> usize {
        self.rings[v][&w].cw
    }

    /// Neighbor of `v` directly counterclockwise of `w`.
    pub fn ccw(&self, v: usize, w: usize) -> usize {
        self.rings[v][&w].ccw
    }

    /// Neighbors of `v` in clockwise order, starting at its first neighbor.
    pub fn neighbors_cw(&self, v: usize) -> Vec<usize> {
        let Some(start) = self.first[v] else {
            return Vec::new();
        };
        let mut order = vec![start];
        let mut current = self.cw(v, start);
        while current != start {
            order.push(current);
            current = self.cw(v, current);
        }
        order
    }

    /// Insert half-edge `(start, end)` directly clockwise of `reference`.
    ///
    /// Without a reference, `end` becomes the only neighbor of `start`.
    pub fn add_half_edge_cw(&mut self, start: usize, end: usize, reference: Option<usize>) {
        let ring = &mut self.rings[start];
        let Some(reference) = reference else {
            ring.insert(end, Ring { cw: end, ccw: end });
            self.first[start] = Some(end);
            return;
        };
        let after = ring[&reference].cw;
        if let Some(r) = ring.get_mut(&reference) {
            r.cw = end;
        }
        ring.insert(
            end,
            Ring {
                cw: after,
                ccw: reference,
            },
        );
        if let Some(r) = ring.get_mut(&after) {
            r.ccw = end;
        }
    }

    /// Insert half-edge `(start, end)` directly counterclockwise of
    /// `reference`, taking over as first neighbor if `reference` was first.
    pub fn add_half_edge_ccw(&mut self, start: usize, end: usize, reference: Option<usize>) {
        let Some(reference) = reference else {
            self.add_half_edge_cw(start, end, None);
            return;
        };
        let before = self.ccw(start, reference);
        self.add_half_edge_cw(start, end, Some(before));
        if self.first[start] == Some(reference) {
            self.first[start] = Some(end);
        }
    }

    /// Insert half-edge `(start, end)` as the first neighbor of `start`.
    pub fn add_half_edge_first(&mut self, start: usize, end: usize) {
        let reference = self.first[start];
        self.add_half_edge_ccw(start, end, reference);
    }

    /// Join two nodes from different components.
    pub fn connect_components(&mut self, v: usize, w: usize) {
        self.add_half_edge_first(v, w);
        self.add_half_edge_first(w, v);
    }

    /// The half-edge following `(v, w)` around the face on its right.
    pub fn next_face_half_edge(&self, v: usize, w: usize) -> (usize, usize) {
        (w, self.ccw(w, v))
    }

    /// Connected components, each as its smallest slot, in slot order.
    pub fn component_representatives(&self) -> Vec<usize> {
        let mut seen = vec![false; self.node_count()];
        let mut representatives = Vec::new();
        for start in 0..self.node_count() {
            if seen[start] {
                continue;
            }
            representatives.push(start);
            seen[start] = true;
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                for &w in self.rings[v].keys() {
                    if !seen[w] {
                        seen[w] = true;
                        stack.push(w);
                    }
                }
            }
        }
        representatives
    }
}

#[cfg(test)]
impl Embedding {
    /// Number of undirected edges, assuming both halves of each are present.
    pub fn edge_count(&self) -> usize {
        self.rings.iter().map(HashMap::len).sum::<usize>() / 2
    }

    /// Nodes around the face that has half-edge `(v, w)` on its boundary.
    pub fn traverse_face(&self, v: usize, w: usize) -> Vec<usize> {
        let mut face = vec![v];
        let (mut a, mut b) = self.next_face_half_edge(v, w);
        while (a, b) != (v, w) {
            face.push(a);
            (a, b) = self.next_face_half_edge(a, b);
        }
        face
    }

    /// Number of faces, counting every half-edge exactly once.
    pub fn face_count(&self) -> usize {
        let mut seen = HashSet::new();
        let mut faces = 0;
        for v in 0..self.node_count() {
            for w in self.neighbors_cw(v) {
                if seen.contains(&(v, w)) {
                    continue;
                }
                faces += 1;
                let (mut a, mut b) = (v, w);
                while seen.insert((a, b)) {
                    (a, b) = self.next_face_half_edge(a, b);
                }
            }
        }
        faces
    }

    /// Whether the rotation system is a planar embedding, by Euler's formula
    /// `V - E + F = 2C`.
    ///
    /// Faces are traced per component, so every component contributes its own
    /// outer face. An isolated node has no half-edges and counts as one face.
    pub fn satisfies_euler(&self) -> bool {
        let components = self.component_representatives().len();
        let isolated = (0..self.node_count())
            .filter(|&v| self.rings[v].is_empty())
            .count();
        let faces = self.face_count() + isolated;
        self.node_count() + faces == self.edge_count() + 2 * components
    }
}
