//! Error types for decoding, rendering and expansion

use serde::Serialize;
use thiserror::Error;

use crate::table::RefId;

/// Structural failures found while decoding a wire document.
///
/// Any of these aborts the initial render: nothing can be displayed
/// without a reference table and a root node.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The top-level document has no usable reference table
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A node lacks a recognizable kind (strict decoding only)
    #[error("Malformed node at {location}: {reason}")]
    MalformedNode {
        /// Where the node sits, e.g. `dict[824@main.counter].v`
        location: String,
        /// What was wrong with it
        reason: String,
    },

    /// The document is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-node failures produced by the renderer.
///
/// These are data, not control flow: the renderer places them in the
/// slot that failed and keeps rendering its siblings.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum RenderError {
    /// A reference names an identifier missing from the reference table
    #[error("Dangling reference: '{id}' is not in the reference table")]
    DanglingReference {
        /// The unresolved identifier
        id: RefId,
    },

    /// The node could not be classified at decode time
    #[error("Malformed node: {reason}")]
    MalformedNode {
        /// Decoder's description of the problem
        reason: String,
    },

    /// A chain of references loops back on itself
    #[error("Cyclic reference chain: {}", format_chain(.chain))]
    CyclicReference {
        /// Identifiers in the order they were followed; the last one repeats
        chain: Vec<RefId>,
    },
}

fn format_chain(chain: &[RefId]) -> String {
    chain
        .iter()
        .map(RefId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors raised when driving a rendering session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The document failed to decode
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A slot path could not be parsed
    #[error("Invalid slot path '{0}'")]
    InvalidPath(String),

    /// No stub with that name exists under the addressed slot
    #[error("No slot at '{path}'")]
    NoSuchSlot {
        /// The path up to and including the missing segment
        path: String,
    },

    /// The path walks through a stub that has not been expanded
    #[error("Slot '{path}' has not been expanded yet")]
    NotExpanded {
        /// The unexpanded prefix
        path: String,
    },

    /// The path walks through a leaf or an error marker
    #[error("Slot '{path}' has no children")]
    NotComposite {
        /// The childless prefix
        path: String,
    },
}

/// Main error type for Seth operations
#[derive(Error, Debug)]
pub enum SethError {
    /// Decoding failed
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Session navigation failed
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result type alias for Seth operations
pub type Result<T> = std::result::Result<T, SethError>;
