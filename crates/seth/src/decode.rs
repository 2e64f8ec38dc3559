//! Graph decoder: splits a wire document into a reference table and a root
//!
//! # Wire format
//!
//! ```text
//! {
//!   "dict": { "<id>": { "type": "<tag>", "value": <payload> }, ... },
//!   "type": "<tag>",
//!   "value": <payload>
//! }
//! ```
//!
//! Everything except the table field makes up the raw root node. Tags that
//! start with the reference marker carry a string identifier as payload.
//! The short spellings `t`/`v` are accepted for `type`/`value`, and an
//! untagged envelope of the form `{"root": "<id>", "dict": {...}}` (or
//! `"r"`) makes the root a reference to that identifier.
//!
//! A tagged node with no payload key at all is one the producer stopped
//! serializing at its depth limit; it decodes to [`Node::Omitted`]. An
//! explicit `null` payload is a nil value and decodes normally.

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::config::DecodeConfig;
use crate::error::DecodeError;
use crate::node::{Node, ScalarKind};
use crate::table::{RefId, ReferenceTable};

const TYPE_FIELD: &str = "type";
const TYPE_FIELD_SHORT: &str = "t";
const VALUE_FIELD: &str = "value";
const VALUE_FIELD_SHORT: &str = "v";
const ROOT_FIELD: &str = "root";
const ROOT_FIELD_SHORT: &str = "r";

/// A decoded graph: the shared reference table plus the entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Identifier to node mapping
    pub table: ReferenceTable,

    /// The node rendering starts from
    pub root: Node,
}

/// Decode JSON text into a [`Document`].
pub fn decode_str(text: &str, config: &DecodeConfig) -> Result<Document, DecodeError> {
    let json: Json = serde_json::from_str(text)?;
    decode(&json, config)
}

/// Decode a parsed JSON document into a [`Document`].
///
/// Fails with [`DecodeError::MalformedDocument`] when the document is not an
/// object or its reference table field is missing or not a mapping. Nodes
/// that lack a recognizable kind are kept as [`Node::Malformed`] unless
/// `config.strict` is set, in which case the first one fails the decode.
pub fn decode(document: &Json, config: &DecodeConfig) -> Result<Document, DecodeError> {
    let object = document.as_object().ok_or_else(|| {
        DecodeError::MalformedDocument(format!(
            "expected a top-level object, found {}",
            json_type(document)
        ))
    })?;

    let raw_table = match object.get(&config.table_field) {
        Some(Json::Object(map)) => map,
        Some(other) => {
            return Err(DecodeError::MalformedDocument(format!(
                "reference table '{}' is not a mapping (found {})",
                config.table_field,
                json_type(other)
            )))
        }
        None => {
            return Err(DecodeError::MalformedDocument(format!(
                "missing reference table '{}'",
                config.table_field
            )))
        }
    };

    let decoder = Decoder { config };

    let mut table = ReferenceTable::new();
    for (id, raw) in raw_table {
        let node = decoder.node(raw);
        if config.strict {
            check_well_formed(&node, &format!("{}[{}]", config.table_field, id))?;
        }
        table.insert(RefId::from(id.as_str()), node);
    }

    let root = decoder.root(object);
    if config.strict {
        check_well_formed(&root, ROOT_FIELD)?;
    }

    debug!(entries = table.len(), root = %root.kind(), "decoded document");
    Ok(Document { table, root })
}

struct Decoder<'a> {
    config: &'a DecodeConfig,
}

impl Decoder<'_> {
    fn root(&self, object: &Map<String, Json>) -> Node {
        if tag_of(object).is_none() {
            let root_id = object
                .get(ROOT_FIELD)
                .or_else(|| object.get(ROOT_FIELD_SHORT));
            if let Some(Json::String(id)) = root_id {
                return self.reference_to(id);
            }
        }
        self.node_from_object(object)
    }

    fn node(&self, raw: &Json) -> Node {
        match raw {
            Json::Object(object) => self.node_from_object(object),
            other => Node::malformed(format!("expected a node object, found {}", json_type(other))),
        }
    }

    /// Composite fields may be written as a bare identifier.
    fn field(&self, raw: &Json) -> Node {
        match raw {
            Json::String(id) => self.reference_to(id),
            other => self.node(other),
        }
    }

    fn reference_to(&self, id: &str) -> Node {
        Node::reference(self.config.reference_marker.to_string(), id)
    }

    fn node_from_object(&self, object: &Map<String, Json>) -> Node {
        let tag = match tag_of(object) {
            Some(Json::String(tag)) if !tag.is_empty() => tag,
            Some(Json::String(_)) => return Node::malformed("empty type tag"),
            Some(other) => {
                return Node::malformed(format!(
                    "type tag must be a string, found {}",
                    json_type(other)
                ))
            }
            None => return Node::malformed("node lacks a type tag"),
        };
        let payload = object
            .get(VALUE_FIELD)
            .or_else(|| object.get(VALUE_FIELD_SHORT));

        if payload.is_none() && !tag.starts_with(self.config.reference_marker) {
            return Node::omitted(tag.as_str());
        }

        if tag.starts_with(self.config.reference_marker) {
            return match payload {
                Some(Json::String(id)) => Node::reference(tag.as_str(), id.as_str()),
                _ => Node::malformed(format!("reference '{}' lacks a string identifier", tag)),
            };
        }

        if let Some(kind) = ScalarKind::from_tag(tag) {
            return match payload.and_then(|raw| kind.coerce(raw)) {
                Some(value) => Node::scalar(kind, value),
                None => Node::malformed(format!(
                    "payload {} is not a valid {}",
                    payload.map(json_type).unwrap_or("(missing)"),
                    tag
                )),
            };
        }

        let fields = match payload {
            None | Some(Json::Null) => IndexMap::new(),
            Some(Json::Object(raw_fields)) => raw_fields
                .iter()
                .map(|(name, raw)| (name.clone(), self.field(raw)))
                .collect(),
            Some(Json::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, raw)| (i.to_string(), self.field(raw)))
                .collect(),
            Some(other) => {
                return Node::malformed(format!(
                    "composite '{}' has a {} payload",
                    tag,
                    json_type(other)
                ))
            }
        };
        Node::composite(tag.as_str(), fields)
    }
}

fn tag_of(object: &Map<String, Json>) -> Option<&Json> {
    object
        .get(TYPE_FIELD)
        .or_else(|| object.get(TYPE_FIELD_SHORT))
}

fn check_well_formed(node: &Node, location: &str) -> Result<(), DecodeError> {
    match node {
        Node::Malformed(m) => Err(DecodeError::MalformedNode {
            location: location.to_string(),
            reason: m.reason.clone(),
        }),
        Node::Composite(c) => {
            for (name, child) in &c.fields {
                check_well_formed(child, &format!("{}.{}", location, name))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Scalar;
    use serde_json::json;

    fn lenient(doc: Json) -> Document {
        decode(&doc, &DecodeConfig::default()).unwrap()
    }

    #[test]
    fn test_table_field_is_stripped_from_root() {
        let doc = lenient(json!({
            "dict": {"r1": {"type": "int", "value": 7}},
            "type": "*",
            "value": "r1"
        }));
        assert_eq!(doc.table.len(), 1);
        assert_eq!(doc.root, Node::reference("*", "r1"));
    }

    #[test]
    fn test_short_field_aliases() {
        let doc = lenient(json!({
            "dict": {"1@main.c": {"t": "uint64", "v": 12, "k": 11}},
            "t": "*main.c",
            "v": "1@main.c"
        }));
        assert_eq!(
            doc.table.get("1@main.c"),
            Some(&Node::scalar(ScalarKind::Uint64, Scalar::Uint(12)))
        );
    }

    #[test]
    fn test_root_envelope_becomes_reference() {
        let doc = lenient(json!({"root": "1@main.c", "dict": {}}));
        assert_eq!(doc.root, Node::reference("*", "1@main.c"));
    }

    #[test]
    fn test_short_root_envelope_becomes_reference() {
        let doc = lenient(json!({"r": "0", "dict": {"0": {"k": 2, "t": "int", "v": 1}}}));
        assert_eq!(doc.root, Node::reference("*", "0"));
    }

    #[test]
    fn test_missing_payload_is_omitted() {
        let doc = lenient(json!({"dict": {"3": {"k": 2, "t": "int"}}, "r": "3"}));
        assert_eq!(doc.table.get("3"), Some(&Node::omitted("int")));
    }

    #[test]
    fn test_bare_string_field_is_reference() {
        let doc = lenient(json!({
            "dict": {},
            "type": "main.pair",
            "value": {"left": "7@int"}
        }));
        let root = doc.root.as_composite().unwrap();
        assert_eq!(root.get("left"), Some(&Node::reference("*", "7@int")));
    }

    #[test]
    fn test_array_payload_fields_are_indexed() {
        let doc = lenient(json!({
            "dict": {},
            "type": "[]int",
            "value": [{"type": "int", "value": 1}, {"type": "int", "value": 2}]
        }));
        let names: Vec<&str> = doc.root.as_composite().unwrap().field_names().collect();
        assert_eq!(names, vec!["0", "1"]);
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type(&json!(null)), "null");
        assert_eq!(json_type(&json!([1])), "array");
        assert_eq!(json_type(&json!({})), "object");
    }
}
