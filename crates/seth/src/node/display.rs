//! Display implementations for nodes and scalars

use std::fmt;

use super::*;

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The literal payload, unquoted
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Uint(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(s) => write!(f, "{} {}", s.kind, s.value),
            Node::Composite(c) => {
                write!(f, "{} {{", c.kind)?;
                for (i, name) in c.field_names().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}", name)?;
                }
                if !c.is_empty() {
                    write!(f, " ")?;
                }
                write!(f, "}}")
            }
            Node::Reference(r) => write!(f, "{} -> {}", r.kind, r.target),
            Node::Malformed(m) => write!(f, "<malformed: {}>", m.reason),
            Node::Omitted(o) => write!(f, "{} <not serialized>", o.kind),
        }
    }
}
