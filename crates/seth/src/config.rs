//! Viewer configuration

/// Default name of the top-level field holding the reference table.
pub const DEFAULT_TABLE_FIELD: &str = "dict";

/// Default indirection marker at the start of reference tags.
pub const DEFAULT_REFERENCE_MARKER: char = '*';

/// Configuration for the graph decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeConfig {
    /// Top-level field holding the reference table
    pub table_field: String,

    /// Tag prefix marking a reference node
    pub reference_marker: char,

    /// Fail the whole decode on the first malformed node instead of
    /// keeping it as an inline marker
    pub strict: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            table_field: DEFAULT_TABLE_FIELD.to_string(),
            reference_marker: DEFAULT_REFERENCE_MARKER,
            strict: false,
        }
    }
}

impl DecodeConfig {
    /// Create a decode config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference table field name.
    pub fn with_table_field(mut self, field: impl Into<String>) -> Self {
        self.table_field = field.into();
        self
    }

    /// Set the reference marker character.
    pub fn with_reference_marker(mut self, marker: char) -> Self {
        self.reference_marker = marker;
        self
    }

    /// Set strict decoding.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Configuration for the renderer and expansion controller.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Upper bound on levels expanded by a single depth-expansion request
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

impl RenderConfig {
    /// Set the maximum depth for depth expansion.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Configuration for the text view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Literals longer than this many characters are truncated
    pub max_literal_width: usize,

    /// Show which reference a slot was reached through
    pub show_references: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_literal_width: 60,
            show_references: true,
        }
    }
}

impl ViewConfig {
    /// Set the literal truncation width.
    pub fn with_max_literal_width(mut self, width: usize) -> Self {
        self.max_literal_width = width;
        self
    }

    /// Set whether reference ids are shown.
    pub fn with_show_references(mut self, show: bool) -> Self {
        self.show_references = show;
        self
    }
}

/// Everything a rendering session needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewerConfig {
    /// Decoder settings
    pub decode: DecodeConfig,

    /// Renderer settings
    pub render: RenderConfig,

    /// Text view settings
    pub view: ViewConfig,
}

impl ViewerConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the decoder settings.
    pub fn with_decode(mut self, decode: DecodeConfig) -> Self {
        self.decode = decode;
        self
    }

    /// Replace the renderer settings.
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    /// Replace the view settings.
    pub fn with_view(mut self, view: ViewConfig) -> Self {
        self.view = view;
        self
    }
}
