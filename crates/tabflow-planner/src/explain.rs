//! Human-readable rendering of a built operator tree.

use std::fmt::Write as _;

use tabflow_operators::Node;

/// One line per node, children indented under their parent:
///
/// ```text
/// Sequence [infrastructure]
///   drop_na
///   Compose [infrastructure]
///     Noop
///     Print (observers: 1)
/// ```
pub fn explain(root: &Node) -> String {
    let mut out = String::new();
    render(root, 0, &mut out);
    out
}

fn render(node: &Node, depth: usize, out: &mut String) {
    let _ = write!(out, "{:indent$}{}", "", node.name(), indent = depth * 2);
    if !node.is_functional() {
        out.push_str(" [infrastructure]");
    }
    if node.has_observers() {
        let _ = write!(out, " (observers: {})", node.observers().len());
    }
    out.push('\n');
    for child in node.children() {
        render(&child, depth + 1, out);
    }
}
