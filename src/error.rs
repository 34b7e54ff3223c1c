//! Error types.
//!
//! Every failure here is deterministic: nothing is retried, and each error
//! propagates unchanged to the caller. A malformed separated edge array is not
//! represented; `geometry::midpoints` panics on it instead.

/// Failures while turning edges and positions into coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("edge {edge} references node {node} which has no position")]
    MissingPosition { node: String, edge: String },
}

/// Failures raised by a layout function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout produced a non-finite coordinate for node {node}")]
    NonFinite { node: String },

    #[error("graph is not planar")]
    NotPlanar,

    #[error("layout failed: {message}")]
    Failed { message: String },
}

impl LayoutError {
    /// Build a failure for custom layout functions.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Failures of the plot-facing entry points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlotError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(
        "cannot plot directed arrows for an undirected graph; remove `arrows` from the requested traces"
    )]
    InvalidTraceRequest,
}

/// No candidate attribute produced a label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no label attribute found (tried: {})", attempted.join(", "))]
pub struct LabelError {
    pub attempted: Vec<String>,
}

/// Failures while building a display tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("cannot label node {node}: no attribute found (tried: {})", attempted.join(", "))]
    LabelResolution {
        node: String,
        attempted: Vec<String>,
    },

    #[error("root node {node} is not in the graph")]
    UnknownRoot { node: String },
}

/// Failures while mapping records onto nodes and edges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no usable node attribute `{attr}`")]
    MissingNodeAttr { attr: String },

    #[error("record has no field `{field}` for edge attribute `{name}`")]
    MissingEdgeField { name: String, field: String },
}
