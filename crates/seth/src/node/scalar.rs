//! Terminal scalar kinds and their literal payloads

use serde::Serialize;
use serde_json::Value as Json;

/// The recognised terminal tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `int`
    Int,
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `uint`
    Uint,
    /// `uint8`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `float32`
    Float32,
    /// `float64`
    Float64,
    /// `bool`
    Bool,
    /// `string`
    String,
}

impl ScalarKind {
    /// Every scalar kind, in tag-table order
    pub const ALL: [ScalarKind; 14] = [
        ScalarKind::Int,
        ScalarKind::Int8,
        ScalarKind::Int16,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::Uint,
        ScalarKind::Uint8,
        ScalarKind::Uint16,
        ScalarKind::Uint32,
        ScalarKind::Uint64,
        ScalarKind::Float32,
        ScalarKind::Float64,
        ScalarKind::Bool,
        ScalarKind::String,
    ];

    /// Classify a wire tag. Anything unrecognised is not a scalar.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_tag() == tag)
    }

    /// The wire tag for this kind
    pub fn as_tag(self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Int8 => "int8",
            ScalarKind::Int16 => "int16",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint => "uint",
            ScalarKind::Uint8 => "uint8",
            ScalarKind::Uint16 => "uint16",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Float32 => "float32",
            ScalarKind::Float64 => "float64",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
        }
    }

    fn bits(self) -> u32 {
        match self {
            ScalarKind::Int8 | ScalarKind::Uint8 => 8,
            ScalarKind::Int16 | ScalarKind::Uint16 => 16,
            ScalarKind::Int32 | ScalarKind::Uint32 | ScalarKind::Float32 => 32,
            _ => 64,
        }
    }

    /// Signed integer kinds
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            ScalarKind::Int
                | ScalarKind::Int8
                | ScalarKind::Int16
                | ScalarKind::Int32
                | ScalarKind::Int64
        )
    }

    /// Unsigned integer kinds
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            ScalarKind::Uint
                | ScalarKind::Uint8
                | ScalarKind::Uint16
                | ScalarKind::Uint32
                | ScalarKind::Uint64
        )
    }

    /// Floating point kinds
    pub fn is_float(self) -> bool {
        matches!(self, ScalarKind::Float32 | ScalarKind::Float64)
    }

    /// Convert a raw payload into this kind's literal, or `None` if the
    /// payload has the wrong shape or does not fit.
    pub fn coerce(self, raw: &Json) -> Option<Scalar> {
        if self.is_signed() {
            let n = raw.as_i64()?;
            let bits = self.bits();
            if bits < 64 {
                let bound = 1i64 << (bits - 1);
                if n < -bound || n >= bound {
                    return None;
                }
            }
            return Some(Scalar::Int(n));
        }
        if self.is_unsigned() {
            let n = raw.as_u64()?;
            let bits = self.bits();
            if bits < 64 && n >= 1u64 << bits {
                return None;
            }
            return Some(Scalar::Uint(n));
        }
        if self.is_float() {
            return raw.as_f64().map(Scalar::Float);
        }
        match (self, raw) {
            (ScalarKind::Bool, Json::Bool(b)) => Some(Scalar::Bool(*b)),
            (ScalarKind::String, Json::String(s)) => Some(Scalar::Text(s.clone())),
            _ => None,
        }
    }
}

/// A literal scalar payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Text
    Text(String),
}

/// A terminal node: kind plus literal payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarNode {
    /// The scalar's tag
    pub kind: ScalarKind,

    /// The literal payload
    pub value: Scalar,
}
