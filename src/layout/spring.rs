//! Fruchterman-Reingold force-directed layout.
//!
//! Nodes start evenly spaced on the unit circle (in node order), so the
//! result is deterministic for a given graph. Each iteration applies pairwise
//! repulsion `k² / d` and edge attraction `d² / k`, then moves every node by
//! at most the current temperature, which cools linearly to zero. The final
//! positions are centered and scaled so the largest coordinate magnitude
//! equals `scale`.

use std::f64::consts::TAU;
use std::fmt;
use std::hash::Hash;

use petgraph::EdgeType;

use super::{Layout, PositionMap, collect_positions, dense_edges, rescale};
use crate::error::LayoutError;
use crate::graph::PlotGraph;

/// Smallest distance used in force terms, so coincident nodes still separate.
const MIN_DISTANCE: f64 = 0.01;

/// Configuration for the spring layout.
#[derive(Debug, Clone)]
pub struct SpringConfig {
    /// Number of cooling iterations.
    pub iterations: u32,
    /// Optimal distance between nodes. Defaults to `1 / sqrt(n)`.
    pub k: Option<f64>,
    /// Starting temperature (maximum step per iteration).
    pub initial_temperature: f64,
    /// Largest coordinate magnitude of the output.
    pub scale: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            k: None,
            initial_temperature: 0.1,
            scale: 1.0,
        }
    }
}

/// The spring layout engine.
#[derive(Debug, Clone, Default)]
pub struct SpringLayout {
    config: SpringConfig,
}

impl SpringLayout {
    /// Create a spring layout with the given configuration.
    pub fn new(config: SpringConfig) -> Self {
        Self { config }
    }

    /// Run the simulation over dense node slots.
    fn simulate(&self, count: usize, edges: &[(usize, usize)]) -> Vec<(f64, f64)> {
        let mut pos: Vec<(f64, f64)> = (0..count)
            .map(|i| {
                let angle = TAU * i as f64 / count as f64;
                (angle.cos(), angle.sin())
            })
            .collect();

        let k = self.config.k.unwrap_or(1.0 / (count as f64).sqrt());
        let mut temperature = self.config.initial_temperature;
        let cooling = temperature / (self.config.iterations as f64 + 1.0);

        for _ in 0..self.config.iterations {
            let mut disp = vec![(0.0, 0.0); count];

            for i in 0..count {
                for j in (i + 1)..count {
                    let dx = pos[i].0 - pos[j].0;
                    let dy = pos[i].1 - pos[j].1;
                    let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let force = k * k / dist;
                    let (fx, fy) = (dx / dist * force, dy / dist * force);
                    disp[i].0 += fx;
                    disp[i].1 += fy;
                    disp[j].0 -= fx;
                    disp[j].1 -= fy;
                }
            }

            for &(u, v) in edges {
                let dx = pos[u].0 - pos[v].0;
                let dy = pos[u].1 - pos[v].1;
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = dist * dist / k;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[u].0 -= fx;
                disp[u].1 -= fy;
                disp[v].0 += fx;
                disp[v].1 += fy;
            }

            for (p, d) in pos.iter_mut().zip(&disp) {
                let length = (d.0 * d.0 + d.1 * d.1).sqrt().max(MIN_DISTANCE);
                let step = length.min(temperature);
                p.0 += d.0 / length * step;
                p.1 += d.1 / length * step;
            }
            temperature -= cooling;
        }

        rescale(&mut pos, self.config.scale);
        pos
    }
}

impl<N, Ty> Layout<N, Ty> for SpringLayout
where
    N: Clone + Eq + Hash + fmt::Debug,
    Ty: EdgeType,
{
    fn compute(&self, graph: &PlotGraph<N, Ty>) -> Result<PositionMap<N>, LayoutError> {
        let (indices, edges) = dense_edges(graph);
        let edges: Vec<(usize, usize)> = edges.into_iter().filter(|(u, v)| u != v).collect();

        let pos = self.simulate(indices.len(), &edges);
        collect_positions(graph, &indices, pos)
    }
}
