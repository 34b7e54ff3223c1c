//! Plot traces: geometry packaged for a 2D plotting backend.
//!
//! A trace is one batched drawing call: a name, a drawing mode, x/y columns,
//! and backend style keys. Edges go out as a single `lines` trace whose NaN
//! rows break the polyline between edges; arrows are `markers` whose glyphs
//! are rotated per edge.
//!
//! Styles are merged, never mutated: each trace starts from its default style
//! and the caller's overrides are layered on with [`merge_style`].

use std::fmt;
use std::hash::Hash;

use petgraph::EdgeType;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::PlotError;
use crate::geometry::{Point, graph_to_plot_geometry, xs, ys};
use crate::graph::{Attrs, PlotGraph};
use crate::layout::Layout;

/// Backend style keys for one trace.
pub type TraceStyle = Attrs;

/// The traces a graph can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Nodes,
    Edges,
    Arrows,
}

impl TraceKind {
    /// The trace's name as shown in a legend.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Edges => "edges",
            Self::Arrows => "arrows",
        }
    }

    /// Style applied before caller overrides.
    pub fn default_style(self) -> TraceStyle {
        let style = match self {
            Self::Nodes | Self::Edges => json!({ "type": "scatter" }),
            Self::Arrows => json!({
                "type": "scattergl",
                "marker": { "size": 12, "symbol": "arrow-wide", "color": "green" },
            }),
        };
        match style {
            Value::Object(map) => map,
            _ => TraceStyle::new(),
        }
    }
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a trace's points are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Markers,
    Lines,
}

/// Caller style overrides, one map per trace kind.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TraceStyles {
    pub nodes: TraceStyle,
    pub edges: TraceStyle,
    pub arrows: TraceStyle,
}

impl TraceStyles {
    /// Overrides for one trace kind.
    pub fn get(&self, kind: TraceKind) -> &TraceStyle {
        match kind {
            TraceKind::Nodes => &self.nodes,
            TraceKind::Edges => &self.edges,
            TraceKind::Arrows => &self.arrows,
        }
    }
}

/// Which traces to build and how to style them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TraceRequest {
    /// Traces to build. `None` means edges and nodes, plus arrows for
    /// directed graphs.
    pub traces: Option<Vec<TraceKind>>,
    /// Per-trace style overrides.
    pub styles: TraceStyles,
}

impl TraceRequest {
    /// Request exactly these traces.
    pub fn only(kinds: impl IntoIterator<Item = TraceKind>) -> Self {
        Self {
            traces: Some(kinds.into_iter().collect()),
            ..Default::default()
        }
    }

    /// The trace kinds to build for a graph.
    ///
    /// Fails if arrows are requested for an undirected graph.
    pub fn kinds(&self, directed: bool) -> Result<Vec<TraceKind>, PlotError> {
        match &self.traces {
            Some(kinds) if !directed && kinds.contains(&TraceKind::Arrows) => {
                Err(PlotError::InvalidTraceRequest)
            }
            Some(kinds) => Ok(kinds.clone()),
            None if directed => Ok(vec![TraceKind::Edges, TraceKind::Nodes, TraceKind::Arrows]),
            None => Ok(vec![TraceKind::Edges, TraceKind::Nodes]),
        }
    }
}

/// One batched drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: TraceKind,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(flatten)]
    pub style: TraceStyle,
}

impl Trace {
    fn new(name: TraceKind, mode: TraceMode, points: &[Point], style: TraceStyle) -> Self {
        Self {
            name,
            mode,
            x: xs(points),
            y: ys(points),
            style,
        }
    }
}

/// The traces built for a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Traces {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Trace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Trace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrows: Option<Trace>,
}

impl Traces {
    /// The trace of one kind, if it was built.
    pub fn get(&self, kind: TraceKind) -> Option<&Trace> {
        match kind {
            TraceKind::Nodes => self.nodes.as_ref(),
            TraceKind::Edges => self.edges.as_ref(),
            TraceKind::Arrows => self.arrows.as_ref(),
        }
    }

    /// Built traces in drawing order: edges, nodes, arrows.
    pub fn iter(&self) -> impl Iterator<Item = &Trace> {
        [&self.edges, &self.nodes, &self.arrows]
            .into_iter()
            .filter_map(Option::as_ref)
    }
}

/// Layer `overrides` on top of `defaults` into a new style.
///
/// Nested objects merge key by key; any other override value replaces the
/// default.
pub fn merge_style(defaults: &TraceStyle, overrides: &TraceStyle) -> TraceStyle {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        match (merged.get_mut(key), value) {
            (Some(Value::Object(base)), Value::Object(extra)) => {
                let nested = merge_style(base, extra);
                *base = nested;
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

/// Build the requested plot traces for a graph.
///
/// The request is validated before any layout work happens.
pub fn graph_to_traces<N, Ty>(
    graph: &PlotGraph<N, Ty>,
    request: &TraceRequest,
    layout: Option<&dyn Layout<N, Ty>>,
) -> Result<Traces, PlotError>
where
    N: Clone + Eq + Hash + fmt::Debug,
    Ty: EdgeType,
{
    let kinds = request.kinds(graph.is_directed())?;
    let geometry = graph_to_plot_geometry(graph, layout)?;

    let mut traces = Traces::default();
    for kind in kinds {
        let mut style = merge_style(&kind.default_style(), request.styles.get(kind));
        match kind {
            TraceKind::Nodes => {
                traces.nodes = Some(Trace::new(
                    kind,
                    TraceMode::Markers,
                    &geometry.node_positions,
                    style,
                ));
            }
            TraceKind::Edges => {
                traces.edges = Some(Trace::new(
                    kind,
                    TraceMode::Lines,
                    &geometry.edge_lines,
                    style,
                ));
            }
            TraceKind::Arrows => {
                let arrows = geometry
                    .arrows
                    .as_ref()
                    .ok_or(PlotError::InvalidTraceRequest)?;
                let marker = style
                    .entry("marker")
                    .or_insert_with(|| Value::Object(TraceStyle::new()));
                if !marker.is_object() {
                    *marker = Value::Object(TraceStyle::new());
                }
                if let Value::Object(marker) = marker {
                    marker.insert("angle".into(), Value::from(arrows.angles.clone()));
                }
                traces.arrows = Some(Trace::new(
                    kind,
                    TraceMode::Markers,
                    &arrows.midpoints,
                    style,
                ));
            }
        }
    }
    Ok(traces)
}
