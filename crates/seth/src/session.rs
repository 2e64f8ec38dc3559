//! Rendering session: owns one decoded graph and its displayed tree

use serde_json::Value as Json;
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::decode::{decode, decode_str, Document};
use crate::error::SessionError;
use crate::expand::{self, ExpandOutcome};
use crate::node::Node;
use crate::path::{Segment, SlotPath};
use crate::render::{RenderSlot, Renderer, SlotContent, Stub, StubState};
use crate::table::ReferenceTable;

/// A single rendering session.
///
/// Owns the reference table and root node for its lifetime and passes them
/// explicitly to the renderer and the expansion controller. The root is
/// rendered once on creation; everything below it waits for an expand
/// request.
///
/// # Example
///
/// ```
/// use seth::{Scalar, Session, SlotPath, ViewerConfig};
///
/// let doc = r#"{"dict": {}, "type": "struct", "value": {
///     "a": {"type": "int", "value": 1},
///     "b": {"type": "int", "value": 2}
/// }}"#;
/// let mut session = Session::from_json_str(doc, ViewerConfig::default()).unwrap();
///
/// let a: SlotPath = "a".parse().unwrap();
/// session.expand(&a).unwrap();
///
/// assert_eq!(session.slot(&a).unwrap().leaf(), Some(&Scalar::Int(1)));
/// assert!(!session.root().child("b").unwrap().is_expanded());
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    table: ReferenceTable,
    root: Node,
    root_slot: RenderSlot,
    config: ViewerConfig,
}

impl Session {
    /// Start a session over a decoded document.
    pub fn new(document: Document, config: ViewerConfig) -> Self {
        let Document { table, root } = document;
        let root_slot = Renderer::new(&table, &config.render).render(&root);
        info!(
            entries = table.len(),
            kind = %root_slot.kind,
            children = root_slot.children().len(),
            "rendered root"
        );
        Self {
            table,
            root,
            root_slot,
            config,
        }
    }

    /// Decode JSON text and start a session.
    pub fn from_json_str(text: &str, config: ViewerConfig) -> Result<Self, SessionError> {
        let document = decode_str(text, &config.decode)?;
        Ok(Self::new(document, config))
    }

    /// Decode a parsed JSON document and start a session.
    pub fn from_json(document: &Json, config: ViewerConfig) -> Result<Self, SessionError> {
        let document = decode(document, &config.decode)?;
        Ok(Self::new(document, config))
    }

    /// The rendered root slot
    pub fn root(&self) -> &RenderSlot {
        &self.root_slot
    }

    /// The undecorated root node
    pub fn root_node(&self) -> &Node {
        &self.root
    }

    /// The shared reference table
    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// The session configuration
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// A renderer bound to this session's table.
    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.table, &self.config.render)
    }

    /// Look up the stub at `path`.
    pub fn stub(&self, path: &SlotPath) -> Result<&Stub, SessionError> {
        let (last, parents) = path.segments().split_last().ok_or_else(|| {
            SessionError::NoSuchSlot {
                path: path.to_string(),
            }
        })?;

        let mut slot = &self.root_slot;
        for (depth, segment) in parents.iter().enumerate() {
            let stub = find_child(slot, segment, path, depth)?;
            slot = stub.slot().ok_or_else(|| SessionError::NotExpanded {
                path: path.prefix(depth + 1).to_string(),
            })?;
        }
        find_child(slot, last, path, parents.len())
    }

    /// Look up the materialised slot at `path`.
    pub fn slot(&self, path: &SlotPath) -> Result<&RenderSlot, SessionError> {
        if path.is_root() {
            return Ok(&self.root_slot);
        }
        self.stub(path)?
            .slot()
            .ok_or_else(|| SessionError::NotExpanded {
                path: path.to_string(),
            })
    }

    /// Expand the stub at `path`.
    ///
    /// Every stub along the way must already be expanded. Expanding an
    /// expanded stub, or the root, returns [`ExpandOutcome::AlreadyExpanded`]
    /// and changes nothing.
    pub fn expand(&mut self, path: &SlotPath) -> Result<ExpandOutcome, SessionError> {
        if path.is_root() {
            return Ok(ExpandOutcome::AlreadyExpanded);
        }
        let renderer = Renderer::new(&self.table, &self.config.render);
        let stub = stub_mut(&mut self.root_slot, path)?;
        let outcome = expand::expand(stub, &renderer);
        debug!(path = %path, ?outcome, "expand request");
        Ok(outcome)
    }

    /// Expand the slot at `path` and everything below it, `depth` levels
    /// down. The depth is capped by the render config's `max_depth`.
    ///
    /// Returns the number of stubs newly expanded.
    pub fn expand_to_depth(
        &mut self,
        path: &SlotPath,
        depth: usize,
    ) -> Result<usize, SessionError> {
        let depth = depth.min(self.config.render.max_depth);
        let renderer = Renderer::new(&self.table, &self.config.render);

        let mut expanded = 0;
        let slot = if path.is_root() {
            &mut self.root_slot
        } else {
            let stub = stub_mut(&mut self.root_slot, path)?;
            if expand::expand(stub, &renderer) == ExpandOutcome::Expanded {
                expanded += 1;
            }
            stub.slot_mut().ok_or_else(|| SessionError::NotExpanded {
                path: path.to_string(),
            })?
        };
        expanded += expand::expand_to_depth(slot, &renderer, depth);
        debug!(path = %path, depth, expanded, "depth expansion");
        Ok(expanded)
    }

    /// Total number of stubs currently in the tree.
    pub fn stub_count(&self) -> usize {
        count_stubs(&self.root_slot).0
    }

    /// Number of stubs that have been expanded.
    pub fn expanded_count(&self) -> usize {
        count_stubs(&self.root_slot).1
    }
}

fn find_child<'s>(
    slot: &'s RenderSlot,
    segment: &Segment,
    path: &SlotPath,
    depth: usize,
) -> Result<&'s Stub, SessionError> {
    if !slot.is_composite() {
        return Err(SessionError::NotComposite {
            path: path.prefix(depth).to_string(),
        });
    }
    let stubs = slot.children();
    segment
        .position(stubs)
        .map(|i| &stubs[i])
        .ok_or_else(|| SessionError::NoSuchSlot {
            path: path.prefix(depth + 1).to_string(),
        })
}

fn stub_mut<'s>(root: &'s mut RenderSlot, path: &SlotPath) -> Result<&'s mut Stub, SessionError> {
    let mut slot = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        let SlotContent::Composite(stubs) = &mut slot.content else {
            return Err(SessionError::NotComposite {
                path: path.prefix(depth).to_string(),
            });
        };
        let index = segment
            .position(stubs)
            .ok_or_else(|| SessionError::NoSuchSlot {
                path: path.prefix(depth + 1).to_string(),
            })?;
        let stub = &mut stubs[index];
        if depth + 1 == path.len() {
            return Ok(stub);
        }
        slot = match &mut stub.state {
            StubState::Expanded(child) => child.as_mut(),
            StubState::Unexpanded => {
                return Err(SessionError::NotExpanded {
                    path: path.prefix(depth + 1).to_string(),
                })
            }
        };
    }
    Err(SessionError::NoSuchSlot {
        path: path.to_string(),
    })
}

/// (total stubs, expanded stubs)
fn count_stubs(slot: &RenderSlot) -> (usize, usize) {
    slot.children()
        .iter()
        .fold((0, 0), |(total, expanded), stub| match stub.slot() {
            Some(child) => {
                let (t, e) = count_stubs(child);
                (total + 1 + t, expanded + 1 + e)
            }
            None => (total + 1, expanded),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Scalar;
    use serde_json::json;

    fn session(doc: Json) -> Session {
        Session::from_json(&doc, ViewerConfig::default()).unwrap()
    }

    #[test]
    fn test_expand_root_is_noop() {
        let mut s = session(json!({"dict": {}, "type": "int", "value": 1}));
        assert_eq!(
            s.expand(&SlotPath::root()).unwrap(),
            ExpandOutcome::AlreadyExpanded
        );
    }

    #[test]
    fn test_path_through_unexpanded_stub() {
        let mut s = session(json!({
            "dict": {},
            "type": "S",
            "value": {"inner": {"type": "S", "value": {"x": {"type": "int", "value": 1}}}}
        }));
        let path: SlotPath = "inner/x".parse().unwrap();
        assert!(matches!(
            s.expand(&path),
            Err(SessionError::NotExpanded { path }) if path == "inner"
        ));

        s.expand(&"inner".parse().unwrap()).unwrap();
        assert_eq!(s.expand(&path).unwrap(), ExpandOutcome::Expanded);
    }

    #[test]
    fn test_path_through_leaf() {
        let mut s = session(json!({
            "dict": {},
            "type": "S",
            "value": {"n": {"type": "int", "value": 1}}
        }));
        s.expand(&"n".parse().unwrap()).unwrap();
        assert!(matches!(
            s.expand(&"n/deeper".parse().unwrap()),
            Err(SessionError::NotComposite { path }) if path == "n"
        ));
    }

    #[test]
    fn test_counts() {
        let mut s = session(json!({
            "dict": {},
            "type": "S",
            "value": {"a": {"type": "int", "value": 1}, "b": {"type": "int", "value": 2}}
        }));
        assert_eq!(s.stub_count(), 2);
        assert_eq!(s.expanded_count(), 0);
        s.expand(&"b".parse().unwrap()).unwrap();
        assert_eq!(s.expanded_count(), 1);
    }

    #[test]
    fn test_field_names_with_separator_and_empty_names() {
        let mut s = session(json!({
            "dict": {},
            "type": "map[string]int",
            "value": {
                "a/b": {"type": "int", "value": 1},
                "": {"type": "int", "value": 2}
            }
        }));

        let slash: SlotPath = "a~1b".parse().unwrap();
        assert_eq!(s.expand(&slash).unwrap(), ExpandOutcome::Expanded);
        assert_eq!(s.slot(&slash).unwrap().leaf(), Some(&Scalar::Int(1)));
        assert_eq!(s.stub(&slash).unwrap().name(), "a/b");

        let empty: SlotPath = "#1".parse().unwrap();
        assert_eq!(s.expand(&empty).unwrap(), ExpandOutcome::Expanded);
        assert_eq!(s.slot(&empty).unwrap().leaf(), Some(&Scalar::Int(2)));
        assert_eq!(
            s.slot(&"~e".parse().unwrap()).unwrap().leaf(),
            Some(&Scalar::Int(2))
        );

        assert!(matches!(
            s.expand(&"#2".parse().unwrap()),
            Err(SessionError::NoSuchSlot { path }) if path == "#2"
        ));
    }
}
