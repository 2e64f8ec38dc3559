//! Slot paths: addressing stubs from the root, e.g. `next/value/0`
//!
//! Segments name a field. Field names containing the separator or other
//! reserved characters are escaped:
//!
//! | Written | Means                         |
//! |---------|-------------------------------|
//! | `~0`    | a literal `~`                 |
//! | `~1`    | a literal `/`                 |
//! | `~2`    | a literal `#`                 |
//! | `~e`    | the empty field name (whole segment) |
//! | `#3`    | the fourth child, by position |

use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;
use crate::render::Stub;

/// One step of a [`SlotPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Select the child with this field name
    Name(String),
    /// Select the child at this position
    Index(usize),
}

impl Segment {
    /// Position of the selected stub among `stubs`.
    pub fn position(&self, stubs: &[Stub]) -> Option<usize> {
        match self {
            Segment::Name(name) => stubs.iter().position(|stub| stub.name() == name),
            Segment::Index(i) => (*i < stubs.len()).then_some(*i),
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        if raw == "~e" {
            return Some(Segment::Name(String::new()));
        }
        if let Some(index) = raw.strip_prefix('#') {
            return index.parse().ok().map(Segment::Index);
        }
        if raw.is_empty() {
            return None;
        }
        let mut name = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c != '~' {
                name.push(c);
                continue;
            }
            match chars.next()? {
                '0' => name.push('~'),
                '1' => name.push('/'),
                '2' => name.push('#'),
                _ => return None,
            }
        }
        Some(Segment::Name(name))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "#{}", i),
            Segment::Name(name) if name.is_empty() => f.write_str("~e"),
            Segment::Name(name) => {
                for c in name.chars() {
                    match c {
                        '~' => f.write_str("~0")?,
                        '/' => f.write_str("~1")?,
                        '#' => f.write_str("~2")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Name(name.to_string())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::Name(name)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// A `/`-separated sequence of segments leading from the root slot.
///
/// The empty path (written `` or `/`) addresses the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SlotPath(Vec<Segment>);

impl SlotPath {
    /// The root path
    pub fn root() -> Self {
        Self::default()
    }

    /// Path segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Whether this addresses the root
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no segments (same as [`SlotPath::is_root`])
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend the path by one segment (a field name or a position).
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        SlotPath(segments)
    }

    /// The path without its last segment; `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(SlotPath(rest.to_vec()))
    }

    /// The first `len` segments.
    pub fn prefix(&self, len: usize) -> Self {
        SlotPath(self.0[..len.min(self.0.len())].to_vec())
    }
}

impl FromStr for SlotPath {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(SlotPath::root());
        }
        trimmed
            .split('/')
            .map(Segment::parse)
            .collect::<Option<Vec<_>>>()
            .map(SlotPath)
            .ok_or_else(|| SessionError::InvalidPath(s.to_string()))
    }
}

impl fmt::Display for SlotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl<S: Into<Segment>> FromIterator<S> for SlotPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SlotPath(iter.into_iter().map(Into::into).collect())
    }
}
