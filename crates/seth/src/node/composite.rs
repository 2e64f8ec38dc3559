//! Composite nodes: ordered named children

use indexmap::IndexMap;

use super::Node;

/// A composite value with named fields.
///
/// Uses IndexMap so field order is exactly the order the document listed
/// them in. Slices decode to fields named `0`, `1`, `2`, etc.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeNode {
    /// The wire tag, e.g. `main.counter` or `[]int`
    pub kind: String,

    /// Children in document order
    pub fields: IndexMap<String, Node>,
}

impl CompositeNode {
    /// Create a composite with no fields
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: IndexMap::new(),
        }
    }

    /// Create a composite from ordered fields
    pub fn with_fields(kind: impl Into<String>, fields: IndexMap<String, Node>) -> Self {
        Self {
            kind: kind.into(),
            fields,
        }
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, node: Node) -> Self {
        self.fields.insert(name.into(), node);
        self
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.fields.get(name)
    }

    /// Field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
