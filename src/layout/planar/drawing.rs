//! Straight-line grid drawing of a planar embedding.
//!
//! The embedding is made connected and biconnected, its inner faces are
//! triangulated, and the shift method of Chrobak and Payne places nodes one
//! at a time along a canonical ordering. Every node lands on an integer grid
//! point and no two edges cross.

use std::collections::{BTreeSet, HashSet};

use super::embedding::Embedding;

/// Grid coordinates per node slot, or `None` if the embedding is not planar.
pub fn grid_positions(embedding: &Embedding) -> Option<Vec<(i64, i64)>> {
    let count = embedding.node_count();
    if count < 4 {
        return Some([(0, 0), (2, 0), (1, 1)].into_iter().take(count).collect());
    }

    let (embedding, outer_face) = triangulate(embedding.clone());
    let ordering = canonical_ordering(&embedding, &outer_face)?;
    Some(shift(count, &ordering))
}

/// Triangulate every face but the largest, which becomes the outer face.
fn triangulate(mut embedding: Embedding) -> (Embedding, Vec<usize>) {
    let representatives = embedding.component_representatives();
    for pair in representatives.windows(2) {
        embedding.connect_components(pair[0], pair[1]);
    }

    let mut visited = HashSet::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();
    let mut outer = 0;
    for v in 0..embedding.node_count() {
        for w in embedding.neighbors_cw(v) {
            let face = make_biconnected(&mut embedding, v, w, &mut visited);
            if face.is_empty() {
                continue;
            }
            if face.len() > faces.get(outer).map_or(0, Vec::len) {
                outer = faces.len();
            }
            faces.push(face);
        }
    }

    for (i, face) in faces.iter().enumerate() {
        if i != outer {
            triangulate_face(&mut embedding, face[0], face[1]);
        }
    }
    if faces.is_empty() {
        return (embedding, Vec::new());
    }
    let outer_face = faces.swap_remove(outer);
    (embedding, outer_face)
}

/// Walk the face right of `(start, out)`, adding an edge wherever a node
/// repeats so the face boundary becomes a simple cycle.
///
/// Returns the face's nodes, or nothing if the face was already walked.
fn make_biconnected(
    embedding: &mut Embedding,
    start: usize,
    out: usize,
    visited: &mut HashSet<(usize, usize)>,
) -> Vec<usize> {
    if !visited.insert((start, out)) {
        return Vec::new();
    }

    let mut face = vec![start];
    let mut on_face = HashSet::from([start]);
    let (mut v1, mut v2) = (start, out);
    let (_, mut v3) = embedding.next_face_half_edge(v1, v2);

    while v2 != start || v3 != out {
        if on_face.contains(&v2) {
            embedding.add_half_edge_cw(v1, v3, Some(v2));
            embedding.add_half_edge_ccw(v3, v1, Some(v2));
            visited.insert((v2, v3));
            visited.insert((v3, v1));
            v2 = v1;
        } else {
            on_face.insert(v2);
            face.push(v2);
        }

        v1 = v2;
        (v2, v3) = embedding.next_face_half_edge(v2, v3);
        visited.insert((v1, v2));
    }
    face
}

/// Fan out a face from `v1` with chords, skipping chords that already exist.
fn triangulate_face(embedding: &mut Embedding, v1: usize, v2: usize) {
    let (_, mut v3) = embedding.next_face_half_edge(v1, v2);
    let (_, mut v4) = embedding.next_face_half_edge(v2, v3);
    if v1 == v2 || v1 == v3 {
        return;
    }

    let (mut v1, mut v2) = (v1, v2);
    while v1 != v4 {
        if embedding.has_edge(v1, v3) {
            (v1, v2, v3) = (v2, v3, v4);
        } else {
            embedding.add_half_edge_cw(v1, v3, Some(v2));
            embedding.add_half_edge_ccw(v3, v1, Some(v2));
            (v2, v3) = (v3, v4);
        }
        (_, v4) = embedding.next_face_half_edge(v2, v3);
    }
}

/// One step of a canonical ordering: the node and its neighbors on the
/// contour at the moment it is added, from left to right.
type Step = (usize, Vec<usize>);

/// Outer-face neighbor links used while peeling nodes off the outer face.
struct Contour {
    first: usize,
    /// Counterclockwise neighbor on the outer face; unset for `first`.
    ccw: Vec<Option<usize>>,
    /// Clockwise neighbor on the outer face; unset for the second node.
    cw: Vec<Option<usize>>,
    removed: Vec<bool>,
}

impl Contour {
    fn new(count: usize, face: &[usize]) -> Self {
        let mut ccw = vec![None; count];
        let mut cw = vec![None; count];
        for pair in face[1..].windows(2) {
            ccw[pair[0]] = Some(pair[1]);
            cw[pair[1]] = Some(pair[0]);
        }
        if let Some(&last) = face.last() {
            ccw[last] = Some(face[0]);
            cw[face[0]] = Some(last);
        }
        Self {
            first: face[0],
            ccw,
            cw,
            removed: vec![false; count],
        }
    }

    fn contains(&self, v: usize) -> bool {
        !self.removed[v] && (self.ccw[v].is_some() || v == self.first)
    }

    fn adjacent(&self, v: usize, w: usize) -> bool {
        self.ccw[v] == Some(w) || self.cw[v] == Some(w)
    }

    /// Whether `v` has an outer-face chord to `w`.
    fn is_chord(&self, v: usize, w: usize) -> bool {
        self.contains(w) && !self.adjacent(v, w)
    }
}

/// Order nodes so each one, from the third on, sits above a contiguous
/// stretch of the contour formed by the nodes before it.
fn canonical_ordering(embedding: &Embedding, outer_face: &[usize]) -> Option<Vec<Step>> {
    let count = embedding.node_count();
    let (&v1, &v2) = (outer_face.first()?, outer_face.get(1)?);
    let mut contour = Contour::new(count, outer_face);
    let mut chords = vec![0i64; count];
    let mut ready: BTreeSet<usize> = outer_face.iter().copied().collect();

    for &v in outer_face {
        for w in embedding.neighbors_cw(v) {
            if contour.is_chord(v, w) {
                chords[v] += 1;
                ready.remove(&v);
            }
        }
    }
    ready.remove(&v1);
    ready.remove(&v2);

    let mut picked = Vec::with_capacity(count.saturating_sub(2));
    for _ in 2..count {
        let v = ready.pop_first()?;
        contour.removed[v] = true;

        let (mut wp, mut wq) = (None, None);
        for w in embedding.neighbors_cw(v) {
            if contour.removed[w] || !contour.contains(w) {
                continue;
            }
            if w == v1 {
                wp = Some(v1);
            } else if w == v2 {
                wq = Some(v2);
            } else if contour.cw[w] == Some(v) {
                wp = Some(w);
            } else {
                wq = Some(w);
            }
            if wp.is_some() && wq.is_some() {
                break;
            }
        }
        let (wp, wq) = (wp?, wq?);

        // The new stretch of outer face runs from wp to wq around v.
        let mut stretch = vec![wp];
        let mut w = wp;
        while w != wq {
            let next = embedding.ccw(v, w);
            stretch.push(next);
            contour.cw[w] = Some(next);
            contour.ccw[next] = Some(w);
            w = next;
        }

        if stretch.len() == 2 {
            for end in [wp, wq] {
                chords[end] -= 1;
                if chords[end] == 0 {
                    ready.insert(end);
                }
            }
        } else {
            let inner = &stretch[1..stretch.len() - 1];
            for &w in inner {
                ready.insert(w);
                for x in embedding.neighbors_cw(w) {
                    if contour.is_chord(w, x) {
                        chords[w] += 1;
                        ready.remove(&w);
                        if !inner.contains(&x) {
                            chords[x] += 1;
                            ready.remove(&x);
                        }
                    }
                }
            }
        }
        picked.push((v, stretch));
    }

    let mut ordering = vec![(v1, Vec::new()), (v2, Vec::new())];
    ordering.extend(picked.into_iter().rev());
    Some(ordering)
}

/// Chrobak-Payne shift method over a canonical ordering.
///
/// Offsets are stored relative to a parent in a binary tree, so shifting a
/// whole stretch of the contour only touches its two ends.
fn shift(count: usize, ordering: &[Step]) -> Vec<(i64, i64)> {
    let mut left: Vec<Option<usize>> = vec![None; count];
    let mut right: Vec<Option<usize>> = vec![None; count];
    let mut dx = vec![0i64; count];
    let mut y = vec![0i64; count];

    let (v1, v2, v3) = (ordering[0].0, ordering[1].0, ordering[2].0);
    dx[v2] = 1;
    dx[v3] = 1;
    y[v3] = 1;
    right[v1] = Some(v3);
    right[v3] = Some(v2);

    for (vk, contour) in &ordering[3..] {
        let vk = *vk;
        let (wp, wp1) = (contour[0], contour[1]);
        let (wq, wq1) = (contour[contour.len() - 1], contour[contour.len() - 2]);
        let covers_inner = contour.len() > 2;

        // Stretch gaps.
        dx[wp1] += 1;
        dx[wq] += 1;
        let span: i64 = contour[1..].iter().map(|&w| dx[w]).sum();

        dx[vk] = (-y[wp] + span + y[wq]).div_euclid(2);
        y[vk] = (y[wp] + span + y[wq]).div_euclid(2);
        dx[wq] = span - dx[vk];
        if covers_inner {
            dx[wp1] -= dx[vk];
        }

        right[wp] = Some(vk);
        right[vk] = Some(wq);
        if covers_inner {
            left[vk] = Some(wp1);
            right[wq1] = None;
        } else {
            left[vk] = None;
        }
    }

    // Accumulate offsets down the tree.
    let mut pos = vec![(0i64, 0i64); count];
    pos[v1] = (0, y[v1]);
    let mut stack = vec![v1];
    while let Some(parent) = stack.pop() {
        for child in [left[parent], right[parent]].into_iter().flatten() {
            pos[child] = (pos[parent].0 + dx[child], y[child]);
            stack.push(child);
        }
    }
    pos
}
