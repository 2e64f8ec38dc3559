//! Expansion controller: materialises stubs on request
//!
//! Each call is one run-to-completion unit of work. Expanding renders the
//! stub's deferred node with the session's shared reference table and
//! installs the result; expanding again is a no-op.

use tracing::{debug, trace};

use crate::render::{RenderSlot, Renderer, SlotContent, Stub, StubState};

/// What an expand request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// The stub was rendered and its content installed
    Expanded,
    /// The stub already had content; nothing changed
    AlreadyExpanded,
}

/// Expand one stub.
///
/// Rendering failures (dangling references, malformed nodes, reference
/// cycles) end up as an error marker inside the installed slot rather than
/// being returned.
pub fn expand(stub: &mut Stub, renderer: &Renderer<'_>) -> ExpandOutcome {
    if stub.is_expanded() {
        trace!(field = %stub.name, "stub already expanded");
        return ExpandOutcome::AlreadyExpanded;
    }

    let slot = renderer.render(&stub.node);
    debug!(field = %stub.name, kind = %slot.kind, "expanded stub");
    stub.state = StubState::Expanded(Box::new(slot));
    ExpandOutcome::Expanded
}

/// Expand every stub under `slot` down to `depth` levels.
///
/// Already-expanded stubs are descended into but not re-rendered. Returns
/// the number of stubs newly expanded. The depth bound makes this
/// terminate on cyclic graphs.
pub fn expand_to_depth(slot: &mut RenderSlot, renderer: &Renderer<'_>, depth: usize) -> usize {
    if depth == 0 {
        return 0;
    }
    let SlotContent::Composite(stubs) = &mut slot.content else {
        return 0;
    };

    let mut expanded = 0;
    for stub in stubs.iter_mut() {
        if expand(stub, renderer) == ExpandOutcome::Expanded {
            expanded += 1;
        }
        if let StubState::Expanded(child) = &mut stub.state {
            expanded += expand_to_depth(child, renderer, depth - 1);
        }
    }
    expanded
}
