//! Text view of a slot tree
//!
//! One line per slot, two spaces of indentation per level:
//!
//! ```text
//! main.list → 1@main.list
//!   ▾ head: main.node → 2@main.node
//!     value: int = 1
//!     ▸ next (cycle)
//!   len: int = 1
//!   ▸ owner
//!   broken: ✗ Dangling reference: 'gone' is not in the reference table
//! ```
//!
//! `▸` marks a stub waiting to be expanded, `▾` an expanded composite.
//! Values the producer cut off show as `kind (not serialized)`.
//! A stub whose reference target already appears above it is tagged
//! `(cycle)`: expanding it walks back into an ancestor.

use crate::config::ViewConfig;
use crate::render::{RenderSlot, SlotContent};
use crate::table::RefId;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn via_suffix(slot: &RenderSlot, config: &ViewConfig) -> String {
    match slot.via.last() {
        Some(id) if config.show_references => format!(" → {}", id),
        _ => String::new(),
    }
}

fn describe(slot: &RenderSlot, config: &ViewConfig) -> String {
    match &slot.content {
        SlotContent::Leaf(value) => format!(
            "{} = {}{}",
            slot.kind,
            truncate(&value.to_string(), config.max_literal_width),
            via_suffix(slot, config)
        ),
        SlotContent::Composite(_) => format!("{}{}", slot.kind, via_suffix(slot, config)),
        SlotContent::Error(err) => format!("✗ {}", err),
        SlotContent::Omitted => format!("{} (not serialized){}", slot.kind, via_suffix(slot, config)),
    }
}

/// Render a slot tree as indented text.
pub fn to_tree_string(root: &RenderSlot, config: &ViewConfig) -> String {
    let mut result = describe(root, config);
    result.push('\n');

    let mut ancestors: Vec<&RefId> = root.via.iter().collect();
    write_children(&mut result, root, 1, &mut ancestors, config);
    result
}

fn write_children<'a>(
    out: &mut String,
    slot: &'a RenderSlot,
    depth: usize,
    ancestors: &mut Vec<&'a RefId>,
    config: &ViewConfig,
) {
    let indent = "  ".repeat(depth);
    for stub in slot.children() {
        out.push_str(&indent);
        match stub.slot() {
            None => {
                out.push_str("▸ ");
                out.push_str(stub.name());
                if let Some(target) = stub.node().target() {
                    if ancestors.contains(&target) {
                        out.push_str(" (cycle)");
                    }
                }
                out.push('\n');
            }
            Some(child) if child.is_composite() => {
                out.push_str(&format!("▾ {}: {}\n", stub.name(), describe(child, config)));
                let mark = ancestors.len();
                ancestors.extend(child.via.iter());
                write_children(out, child, depth + 1, ancestors, config);
                ancestors.truncate(mark);
            }
            Some(child) => {
                out.push_str(&format!("{}: {}\n", stub.name(), describe(child, config)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
