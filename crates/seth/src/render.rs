//! Lazy renderer: turns a node into a slot whose children are stubs
//!
//! Rendering materialises exactly one level. A composite's own shell is
//! built immediately, but each field becomes an unexpanded [`Stub`] that
//! holds the field's node until someone expands it. Reference nodes are
//! transparent: the renderer follows them through the table and renders
//! whatever they point at.

use indexmap::IndexSet;
use serde::Serialize;
use tracing::warn;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::node::{Node, Scalar};
use crate::table::{RefId, ReferenceTable};

/// Materialisation state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Waiting for an expand action
    Unexpanded,
    /// Content is materialised; never reverts
    Expanded,
}

/// One rendered position in the displayed tree.
///
/// `via` is presentation metadata: rendering a reference yields the same
/// `kind` and `content` as rendering its target directly, and only `via`
/// tells them apart. Derived equality compares `via` too; use
/// [`RenderSlot::same_content`] to compare what is displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSlot {
    /// Tag of the rendered (dereferenced) node
    pub kind: String,

    /// Reference identifiers followed to reach this content, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<RefId>,

    /// What the slot shows
    pub content: SlotContent,
}

/// The visible content of a rendered slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotContent {
    /// A literal scalar; nothing more to reveal
    Leaf(Scalar),

    /// One stub per field, in field order
    Composite(Vec<Stub>),

    /// Inline error marker in place of content
    Error(RenderError),

    /// The producer stopped before serializing this value
    Omitted,
}

/// A child position under a composite slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stub {
    pub(crate) name: String,

    #[serde(skip)]
    pub(crate) node: Node,

    pub(crate) state: StubState,
}

/// Whether a stub has been materialised yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StubState {
    /// Deferred; the field's node has not been rendered
    Unexpanded,
    /// Rendered content installed by the expansion controller
    Expanded(Box<RenderSlot>),
}

impl Stub {
    /// Create an unexpanded stub for a field.
    pub fn new(name: impl Into<String>, node: Node) -> Self {
        Self {
            name: name.into(),
            node,
            state: StubState::Unexpanded,
        }
    }

    /// The field name shown for this stub
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The deferred node
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The stub's materialisation state
    pub fn state(&self) -> SlotState {
        match self.state {
            StubState::Unexpanded => SlotState::Unexpanded,
            StubState::Expanded(_) => SlotState::Expanded,
        }
    }

    /// Check if the stub has been expanded
    pub fn is_expanded(&self) -> bool {
        matches!(self.state, StubState::Expanded(_))
    }

    /// The materialised slot, once expanded
    pub fn slot(&self) -> Option<&RenderSlot> {
        match &self.state {
            StubState::Expanded(slot) => Some(slot),
            StubState::Unexpanded => None,
        }
    }

    /// Mutable access to the materialised slot
    pub fn slot_mut(&mut self) -> Option<&mut RenderSlot> {
        match &mut self.state {
            StubState::Expanded(slot) => Some(slot),
            StubState::Unexpanded => None,
        }
    }
}

impl RenderSlot {
    fn error(kind: impl Into<String>, via: Vec<RefId>, error: RenderError) -> Self {
        Self {
            kind: kind.into(),
            via,
            content: SlotContent::Error(error),
        }
    }

    /// A rendered slot's own shell is always materialised.
    pub fn state(&self) -> SlotState {
        SlotState::Expanded
    }

    /// Compare kind and content, ignoring which references led here.
    pub fn same_content(&self, other: &RenderSlot) -> bool {
        self.kind == other.kind && self.content == other.content
    }

    /// Check if the producer never serialized this value
    pub fn is_omitted(&self) -> bool {
        matches!(self.content, SlotContent::Omitted)
    }

    /// Child stubs; empty for leaves and error markers
    pub fn children(&self) -> &[Stub] {
        match &self.content {
            SlotContent::Composite(stubs) => stubs,
            _ => &[],
        }
    }

    /// Find a child stub by field name
    pub fn child(&self, name: &str) -> Option<&Stub> {
        self.children().iter().find(|stub| stub.name == name)
    }

    /// Find a child stub by field name, mutably
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Stub> {
        match &mut self.content {
            SlotContent::Composite(stubs) => stubs.iter_mut().find(|stub| stub.name == name),
            _ => None,
        }
    }

    /// The literal, if this is a leaf
    pub fn leaf(&self) -> Option<&Scalar> {
        match &self.content {
            SlotContent::Leaf(value) => Some(value),
            _ => None,
        }
    }

    /// The error marker, if rendering failed
    pub fn error_marker(&self) -> Option<&RenderError> {
        match &self.content {
            SlotContent::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Check if this slot is a composite
    pub fn is_composite(&self) -> bool {
        matches!(self.content, SlotContent::Composite(_))
    }
}

/// Renders nodes against one shared, read-only reference table.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    table: &'a ReferenceTable,
    config: &'a RenderConfig,
}

impl<'a> Renderer<'a> {
    /// Create a renderer over a reference table.
    pub fn new(table: &'a ReferenceTable, config: &'a RenderConfig) -> Self {
        Self { table, config }
    }

    /// The reference table being resolved against
    pub fn table(&self) -> &'a ReferenceTable {
        self.table
    }

    /// The render configuration
    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    /// Render one node into a slot.
    ///
    /// References are followed until a non-reference node is reached. A
    /// missing identifier or a chain that revisits an identifier becomes an
    /// error marker in the returned slot; this never fails outright.
    pub fn render(&self, node: &Node) -> RenderSlot {
        let mut followed: IndexSet<RefId> = IndexSet::new();
        let mut current = node;

        loop {
            match current {
                Node::Reference(reference) => {
                    let id = &reference.target;
                    if !followed.insert(id.clone()) {
                        let mut chain: Vec<RefId> = followed.into_iter().collect();
                        chain.push(id.clone());
                        warn!(id = %id, "cyclic reference chain");
                        let via = chain.clone();
                        return RenderSlot::error(
                            reference.kind.as_str(),
                            via,
                            RenderError::CyclicReference { chain },
                        );
                    }
                    match self.table.get(id.as_str()) {
                        Some(next) => current = next,
                        None => {
                            warn!(id = %id, "dangling reference");
                            return RenderSlot::error(
                                reference.kind.as_str(),
                                followed.into_iter().collect(),
                                RenderError::DanglingReference { id: id.clone() },
                            );
                        }
                    }
                }
                Node::Scalar(scalar) => {
                    return RenderSlot {
                        kind: scalar.kind.as_tag().to_string(),
                        via: followed.into_iter().collect(),
                        content: SlotContent::Leaf(scalar.value.clone()),
                    };
                }
                Node::Composite(composite) => {
                    let stubs = composite
                        .fields
                        .iter()
                        .map(|(name, child)| Stub::new(name.as_str(), child.clone()))
                        .collect();
                    return RenderSlot {
                        kind: composite.kind.clone(),
                        via: followed.into_iter().collect(),
                        content: SlotContent::Composite(stubs),
                    };
                }
                Node::Omitted(omitted) => {
                    return RenderSlot {
                        kind: omitted.kind.clone(),
                        via: followed.into_iter().collect(),
                        content: SlotContent::Omitted,
                    };
                }
                Node::Malformed(malformed) => {
                    warn!(reason = %malformed.reason, "malformed node");
                    return RenderSlot::error(
                        current.kind(),
                        followed.into_iter().collect(),
                        RenderError::MalformedNode {
                            reason: malformed.reason.clone(),
                        },
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CompositeNode;
    use std::sync::Arc;

    fn table(entries: Vec<(&str, Node)>) -> ReferenceTable {
        entries
            .into_iter()
            .map(|(id, node)| (RefId::from(id), node))
            .collect()
    }

    #[test]
    fn test_scalar_renders_expanded_leaf() {
        let table = ReferenceTable::new();
        let config = RenderConfig::default();
        let slot = Renderer::new(&table, &config).render(&Node::int(7));

        assert_eq!(slot.leaf(), Some(&Scalar::Int(7)));
        assert_eq!(slot.state(), SlotState::Expanded);
        assert!(slot.children().is_empty());
        assert!(slot.via.is_empty());
    }

    #[test]
    fn test_reference_chain_records_via() {
        let table = table(vec![
            ("a", Node::reference("*T", "b")),
            ("b", Node::int(3)),
        ]);
        let config = RenderConfig::default();
        let slot = Renderer::new(&table, &config).render(&Node::reference("*T", "a"));

        assert_eq!(slot.leaf(), Some(&Scalar::Int(3)));
        assert_eq!(slot.via, vec![RefId::from("a"), RefId::from("b")]);
    }

    #[test]
    fn test_self_reference_is_cycle_marker() {
        let table = table(vec![("a", Node::reference("*T", "a"))]);
        let config = RenderConfig::default();
        let slot = Renderer::new(&table, &config).render(&Node::reference("*T", "a"));

        assert_eq!(
            slot.error_marker(),
            Some(&RenderError::CyclicReference {
                chain: vec![RefId::from("a"), RefId::from("a")],
            })
        );
    }

    #[test]
    fn test_same_content_ignores_via() {
        let table = table(vec![("a", Node::int(3))]);
        let config = RenderConfig::default();
        let renderer = Renderer::new(&table, &config);

        let through_ref = renderer.render(&Node::reference("*int", "a"));
        let direct = renderer.render(&Node::int(3));

        assert_ne!(through_ref, direct);
        assert!(through_ref.same_content(&direct));
        assert!(!through_ref.same_content(&renderer.render(&Node::int(4))));
    }

    #[test]
    fn test_omitted_node_renders_omitted_marker() {
        let table = table(vec![("cut", Node::omitted("int"))]);
        let config = RenderConfig::default();
        let slot = Renderer::new(&table, &config).render(&Node::reference("*int", "cut"));

        assert!(slot.is_omitted());
        assert_eq!(slot.kind, "int");
        assert!(slot.error_marker().is_none());
    }

    #[test]
    fn test_composite_children_are_unexpanded() {
        let table = ReferenceTable::new();
        let config = RenderConfig::default();
        let node = Node::Composite(Arc::new(
            CompositeNode::new("S")
                .with_field("inner", Node::composite("S", Default::default()))
                .with_field("n", Node::int(1)),
        ));
        let slot = Renderer::new(&table, &config).render(&node);

        assert!(slot.is_composite());
        assert!(slot.children().iter().all(|stub| !stub.is_expanded()));
        assert_eq!(slot.child("n").map(Stub::state), Some(SlotState::Unexpanded));
    }
}
