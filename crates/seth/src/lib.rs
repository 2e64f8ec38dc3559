//! # Seth
//!
//! Lazily expanded tree views over serialized object graphs.
//!
//! Seth takes a serialized snapshot of a runtime's in-memory structures
//! (values, containers and the references between them) and turns it into
//! a tree that is revealed one level at a time. Graphs may be cyclic;
//! nothing below the root is rendered until it is asked for.
//!
//! ## Architecture
//!
//! - **Node Model** ([`node`]): typed values decoded from the wire format
//! - **Reference Table** ([`table`]): identifier to node side-mapping
//! - **Graph Decoder** ([`decode`]): document to table plus root node
//! - **Lazy Renderer** ([`render`]): node to slot with unexpanded stubs
//! - **Expansion Controller** ([`expand`]): materialises one stub per request
//! - **Session** ([`session`]): owns one graph and its displayed tree
//!
//! ```text
//! JSON → decode → (ReferenceTable, root) → render(root) → stubs
//!                                   expand(stub) → render(child) ─┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod decode;
pub mod error;
pub mod expand;
pub mod node;
pub mod path;
pub mod render;
pub mod session;
pub mod table;
pub mod view;

// Re-export main types
pub use config::{DecodeConfig, RenderConfig, ViewConfig, ViewerConfig};
pub use decode::{decode, decode_str, Document};
pub use error::{DecodeError, RenderError, Result, SessionError, SethError};
pub use expand::{expand, expand_to_depth, ExpandOutcome};
pub use node::{
    CompositeNode, MalformedNode, Node, OmittedNode, ReferenceNode, Scalar, ScalarKind, ScalarNode,
};
pub use path::{Segment, SlotPath};
pub use render::{RenderSlot, Renderer, SlotContent, SlotState, Stub, StubState};
pub use session::Session;
pub use table::{RefId, ReferenceTable};
pub use view::to_tree_string;

/// Seth version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
