//! Node predicates built from attribute equality.

use std::hash::Hash;

use petgraph::EdgeType;
use serde_json::Value;

use crate::graph::{PAYLOAD_FIELD, PlotGraph};

/// Build a predicate that accepts nodes whose `attr` equals `value`.
///
/// The attribute is read from the node's data, or from its `obj` payload when
/// the data has no such key. Unknown nodes and missing attributes are
/// rejected. Pair with [`PlotGraph::subgraph`] to cut a graph down.
pub fn attr_filter<N, Ty>(
    graph: &PlotGraph<N, Ty>,
    attr: impl Into<String>,
    value: Value,
) -> impl Fn(&N) -> bool + '_
where
    N: Clone + Eq + Hash,
    Ty: EdgeType,
{
    let attr = attr.into();
    move |node: &N| {
        let Some(attrs) = graph.node_attrs(node) else {
            return false;
        };
        let found = attrs.get(&attr).or_else(|| {
            attrs
                .get(PAYLOAD_FIELD)
                .and_then(Value::as_object)
                .and_then(|payload| payload.get(&attr))
        });
        found == Some(&value)
    }
}
