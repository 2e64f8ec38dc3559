//! Node model for decoded object graphs

mod composite;
mod display;
mod scalar;

pub use composite::CompositeNode;
pub use scalar::{Scalar, ScalarKind, ScalarNode};

use std::sync::Arc;

use indexmap::IndexMap;

use crate::table::RefId;

/// One typed value in a serialized object graph.
///
/// The variant is decided once, when the decoder reads the wire tag, so
/// nothing downstream inspects tag strings again:
/// - Scalars carry their literal payload
/// - Composites share their ordered fields behind an `Arc`, so a clone is
///   cheap enough to park inside an unexpanded stub
/// - References are aliases resolved through the reference table
/// - Malformed nodes carry the reason they could not be classified
/// - Omitted nodes were cut off by the producer before their payload
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Terminal value: number, bool or text
    Scalar(ScalarNode),

    /// Ordered set of named children
    Composite(Arc<CompositeNode>),

    /// Alias for a reference table entry
    Reference(ReferenceNode),

    /// A node the decoder could not classify
    Malformed(MalformedNode),

    /// A tagged node whose payload was never serialized
    Omitted(OmittedNode),
}

/// A node whose payload is a reference identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceNode {
    /// Full wire tag including the marker, e.g. `*main.counter`
    pub kind: String,

    /// Identifier to look up in the reference table
    pub target: RefId,
}

impl ReferenceNode {
    /// The tag with the leading indirection marker removed.
    pub fn pointee_kind(&self) -> &str {
        let mut chars = self.kind.chars();
        chars.next();
        chars.as_str()
    }
}

/// A node lacking a recognizable kind or carrying an unusable payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedNode {
    /// Human-readable description of the problem
    pub reason: String,
}

/// A node the producer tagged but did not serialize, typically because it
/// sits past the producer's depth limit.
#[derive(Debug, Clone, PartialEq)]
pub struct OmittedNode {
    /// The wire tag that was written
    pub kind: String,
}

impl Node {
    /// Create a scalar node
    pub fn scalar(kind: ScalarKind, value: Scalar) -> Self {
        Node::Scalar(ScalarNode { kind, value })
    }

    /// Create an `int` scalar node
    pub fn int(value: i64) -> Self {
        Node::scalar(ScalarKind::Int, Scalar::Int(value))
    }

    /// Create a `string` scalar node
    pub fn text(value: impl Into<String>) -> Self {
        Node::scalar(ScalarKind::String, Scalar::Text(value.into()))
    }

    /// Create a composite node from ordered fields
    pub fn composite(kind: impl Into<String>, fields: IndexMap<String, Node>) -> Self {
        Node::Composite(Arc::new(CompositeNode::with_fields(kind, fields)))
    }

    /// Create a reference node
    pub fn reference(kind: impl Into<String>, target: impl Into<RefId>) -> Self {
        Node::Reference(ReferenceNode {
            kind: kind.into(),
            target: target.into(),
        })
    }

    /// Create a malformed node
    pub fn malformed(reason: impl Into<String>) -> Self {
        Node::Malformed(MalformedNode {
            reason: reason.into(),
        })
    }

    /// Create an omitted node
    pub fn omitted(kind: impl Into<String>) -> Self {
        Node::Omitted(OmittedNode { kind: kind.into() })
    }

    /// The node's tag text; malformed nodes report `?`.
    pub fn kind(&self) -> &str {
        match self {
            Node::Scalar(s) => s.kind.as_tag(),
            Node::Composite(c) => &c.kind,
            Node::Reference(r) => &r.kind,
            Node::Malformed(_) => "?",
            Node::Omitted(o) => &o.kind,
        }
    }

    /// Check if this is a scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    /// Check if this is a composite
    pub fn is_composite(&self) -> bool {
        matches!(self, Node::Composite(_))
    }

    /// Check if this is a reference
    pub fn is_reference(&self) -> bool {
        matches!(self, Node::Reference(_))
    }

    /// Check if this is malformed
    pub fn is_malformed(&self) -> bool {
        matches!(self, Node::Malformed(_))
    }

    /// Check if the payload was never serialized
    pub fn is_omitted(&self) -> bool {
        matches!(self, Node::Omitted(_))
    }

    /// The reference target, if this is a reference
    pub fn target(&self) -> Option<&RefId> {
        match self {
            Node::Reference(r) => Some(&r.target),
            _ => None,
        }
    }

    /// The composite payload, if this is a composite
    pub fn as_composite(&self) -> Option<&CompositeNode> {
        match self {
            Node::Composite(c) => Some(c),
            _ => None,
        }
    }
}
