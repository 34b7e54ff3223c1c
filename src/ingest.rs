//! Record ingestion: map JSON records onto nodes and parent edges.
//!
//! A record such as `{"id": 7, "parent_id": 3, "content": "..."}` becomes
//! node `"7"` carrying `{obj: <record>}` and an edge `("7", "3")` for every
//! parent attribute that is present and non-null.

use std::fmt;
use std::rc::Rc;

use petgraph::EdgeType;
use serde::Deserialize;
use serde_json::Value;

use crate::error::IngestError;
use crate::graph::{Attrs, PAYLOAD_FIELD, PlotGraph};

/// Computes extra edge data from a record.
pub type EdgeAttrFn = Rc<dyn Fn(&Attrs) -> Attrs>;

/// How a record maps onto a node and its edges.
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordMapping {
    /// Field holding the node id. `None` uses the record's JSON text.
    pub node_attr: Option<String>,
    /// Fields naming parents; each present, non-null one adds an edge.
    pub parent_attrs: Vec<String>,
    /// Edge data copied from the record as `(edge_name, record_field)`.
    pub edge_attrs: Option<Vec<(String, String)>>,
    /// When false, edges carry no data at all and `edge_attr_fn` is ignored.
    pub include_edge_data: bool,
    /// Extra edge data, merged after `edge_attrs`.
    #[serde(skip)]
    pub edge_attr_fn: Option<EdgeAttrFn>,
}

impl Default for RecordMapping {
    fn default() -> Self {
        Self {
            node_attr: Some("id".into()),
            parent_attrs: ["parent_id", "project_id", "section_id"]
                .into_iter()
                .map(String::from)
                .collect(),
            edge_attrs: None,
            include_edge_data: true,
            edge_attr_fn: None,
        }
    }
}

impl fmt::Debug for RecordMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordMapping")
            .field("node_attr", &self.node_attr)
            .field("parent_attrs", &self.parent_attrs)
            .field("edge_attrs", &self.edge_attrs)
            .field("include_edge_data", &self.include_edge_data)
            .field("edge_attr_fn", &self.edge_attr_fn.is_some())
            .finish()
    }
}

/// A record mapped to graph elements, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecord {
    pub node: String,
    pub data: Attrs,
    /// `(node, parent, data)` in `parent_attrs` order.
    pub edges: Vec<(String, String, Attrs)>,
}

/// Node identifiers are strings; JSON strings are taken verbatim.
fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn non_null<'a>(record: &'a Attrs, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|v| !v.is_null())
}

impl RecordMapping {
    /// Map a record without touching any graph.
    pub fn map(&self, record: &Value) -> Result<MappedRecord, IngestError> {
        let fields = record.as_object().ok_or(IngestError::NotAnObject)?;

        let node = match &self.node_attr {
            Some(attr) => non_null(fields, attr)
                .map(id_text)
                .ok_or_else(|| IngestError::MissingNodeAttr { attr: attr.clone() })?,
            None => record.to_string(),
        };

        let mut edges = Vec::new();
        for parent_attr in &self.parent_attrs {
            let Some(parent) = non_null(fields, parent_attr) else {
                continue;
            };
            let data = if self.include_edge_data {
                self.edge_data(fields)?
            } else {
                Attrs::new()
            };
            edges.push((node.clone(), id_text(parent), data));
        }

        let mut data = Attrs::new();
        data.insert(PAYLOAD_FIELD.into(), record.clone());
        Ok(MappedRecord { node, data, edges })
    }

    fn edge_data(&self, fields: &Attrs) -> Result<Attrs, IngestError> {
        let mut data = Attrs::new();
        for (name, field) in self.edge_attrs.iter().flatten() {
            let value = fields.get(field).ok_or_else(|| IngestError::MissingEdgeField {
                name: name.clone(),
                field: field.clone(),
            })?;
            if !value.is_null() {
                data.insert(name.clone(), value.clone());
            }
        }
        if let Some(extra) = &self.edge_attr_fn {
            data.extend(extra(fields));
        }
        Ok(data)
    }
}

impl<Ty: EdgeType> PlotGraph<String, Ty> {
    /// Insert a record as a node plus its parent edges.
    ///
    /// Parents that are not in the graph yet are created without data and
    /// pick up their payload when their own record arrives. Returns the
    /// node id.
    pub fn add_record(
        &mut self,
        record: &Value,
        mapping: &RecordMapping,
    ) -> Result<String, IngestError> {
        let MappedRecord { node, data, edges } = mapping.map(record)?;
        self.add_node_with(node.clone(), data);
        for (source, target, attrs) in edges {
            self.add_edge_with(source, target, attrs);
        }
        Ok(node)
    }
}
