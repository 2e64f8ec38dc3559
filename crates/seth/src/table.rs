//! The reference table: identifier to node side-mapping

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::node::Node;

/// An opaque reference identifier, e.g. `824633787520@main.counter`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RefId(String);

impl RefId {
    /// Create an identifier
    pub fn new(id: impl Into<String>) -> Self {
        RefId(id.into())
    }

    /// The identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RefId {
    fn from(id: &str) -> Self {
        RefId(id.to_string())
    }
}

impl From<String> for RefId {
    fn from(id: String) -> Self {
        RefId(id)
    }
}

impl Borrow<str> for RefId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Mapping from reference identifier to node.
///
/// Built once per document and read-only afterwards. Entries keep the
/// order in which the document listed them. The table is not owned by any
/// node; the renderer borrows it whenever it meets a reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    entries: IndexMap<RefId, Node>,
}

impl ReferenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: RefId, node: Node) -> Option<Node> {
        self.entries.insert(id, node)
    }

    /// Resolve an identifier.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.entries.get(id)
    }

    /// Check whether an identifier is present.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&RefId, &Node)> {
        self.entries.iter()
    }

    /// Iterate over identifiers in document order.
    pub fn ids(&self) -> impl Iterator<Item = &RefId> {
        self.entries.keys()
    }
}

impl FromIterator<(RefId, Node)> for ReferenceTable {
    fn from_iter<I: IntoIterator<Item = (RefId, Node)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
