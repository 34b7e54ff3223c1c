//! Label resolution from node attributes.

use std::fmt::Display;

use serde_json::Value;

use crate::error::LabelError;
use crate::graph::{Attrs, PAYLOAD_FIELD};

/// Resolve a display label from node attributes.
///
/// Each candidate is tried in order, first directly on `attrs` and then on
/// the object stored under the `obj` payload field. Null values count as
/// missing. Strings are returned as-is; other values use their JSON text.
pub fn resolve_label<S: AsRef<str>>(attrs: &Attrs, candidates: &[S]) -> Result<String, LabelError> {
    lookup(attrs, PAYLOAD_FIELD, candidates).ok_or_else(|| LabelError {
        attempted: candidates.iter().map(|c| c.as_ref().to_owned()).collect(),
    })
}

fn lookup<S: AsRef<str>>(attrs: &Attrs, payload_field: &str, candidates: &[S]) -> Option<String> {
    let payload = attrs.get(payload_field).and_then(Value::as_object);
    candidates.iter().find_map(|candidate| {
        let name = candidate.as_ref();
        present(attrs.get(name))
            .or_else(|| present(payload.and_then(|p| p.get(name))))
            .map(stringify)
    })
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// How tree nodes get their labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelResolver {
    /// Candidate attribute names, in priority order.
    pub attrs: Vec<String>,
    /// Name of the nested payload object searched after the node's own data.
    pub payload_field: String,
    /// Fall back to the node identifier when no attribute resolves.
    pub fallback_to_id: bool,
}

impl Default for LabelResolver {
    /// Label every node by its identifier.
    fn default() -> Self {
        Self {
            attrs: Vec::new(),
            payload_field: PAYLOAD_FIELD.to_owned(),
            fallback_to_id: true,
        }
    }
}

impl LabelResolver {
    /// Strict resolver: a node without any of `attrs` is an error.
    pub fn new<I, S>(attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attrs: attrs.into_iter().map(Into::into).collect(),
            fallback_to_id: false,
            ..Default::default()
        }
    }

    pub fn with_id_fallback(mut self, fallback: bool) -> Self {
        self.fallback_to_id = fallback;
        self
    }

    pub fn with_payload_field(mut self, field: impl Into<String>) -> Self {
        self.payload_field = field.into();
        self
    }

    /// Resolve the label of node `id` with data `attrs`.
    pub fn resolve<N: Display>(&self, id: &N, attrs: &Attrs) -> Result<String, LabelError> {
        if let Some(label) = lookup(attrs, &self.payload_field, &self.attrs) {
            return Ok(label);
        }
        if self.fallback_to_id {
            return Ok(id.to_string());
        }
        Err(LabelError {
            attempted: self.attrs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attrs {
        match value {
            Value::Object(map) => map,
            _ => panic!("attrs must be an object"),
        }
    }

    #[test]
    fn test_direct_attribute_wins() {
        let data = attrs(json!({ "name": "direct", "obj": { "name": "nested" } }));
        assert_eq!(resolve_label(&data, &["name"]).unwrap(), "direct");
    }

    #[test]
    fn test_payload_fallback() {
        let data = attrs(json!({ "obj": { "title": "Write report", "id": 7 } }));
        assert_eq!(resolve_label(&data, &["name", "title"]).unwrap(), "Write report");
        assert_eq!(resolve_label(&data, &["id"]).unwrap(), "7");
    }

    #[test]
    fn test_priority_order() {
        let data = attrs(json!({ "title": "t", "obj": { "name": "n" } }));
        // `name` is found in the payload before `title` is tried.
        assert_eq!(resolve_label(&data, &["name", "title"]).unwrap(), "n");
    }

    #[test]
    fn test_null_is_missing() {
        let data = attrs(json!({ "name": null, "obj": { "name": "from payload" } }));
        assert_eq!(resolve_label(&data, &["name"]).unwrap(), "from payload");
    }

    #[test]
    fn test_failure_reports_attempts() {
        let data = attrs(json!({ "obj": "not an object" }));
        let err = resolve_label(&data, &["name", "title"]).unwrap_err();
        assert_eq!(err.attempted, vec!["name", "title"]);
        assert_eq!(err.to_string(), "no label attribute found (tried: name, title)");
    }

    #[test]
    fn test_resolver_fallback_to_id() {
        let data = Attrs::new();
        assert_eq!(LabelResolver::default().resolve(&42, &data).unwrap(), "42");

        let strict = LabelResolver::new(["name"]);
        assert!(strict.resolve(&42, &data).is_err());
        assert_eq!(strict.with_id_fallback(true).resolve(&42, &data).unwrap(), "42");
    }

    #[test]
    fn test_custom_payload_field() {
        let data = attrs(json!({ "item": { "name": "custom" } }));
        let resolver = LabelResolver::new(["name"]).with_payload_field("item");
        assert_eq!(resolver.resolve(&"n", &data).unwrap(), "custom");
    }
}
