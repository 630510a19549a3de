//! Plain-text flattening.

use crate::node::Node;

/// Concatenate every leaf value under `node`, in document order.
///
/// Value-bearing leaves contribute their value; other nodes contribute
/// their children's text. Nodes with neither (breaks, images) contribute
/// nothing. Used for section keys, titles, and slug derivation.
pub fn flatten_text(node: &Node) -> String {
    let mut out = String::new();
    collect(node, &mut out);
    out
}

fn collect(node: &Node, out: &mut String) {
    if let Some(value) = node.value() {
        out.push_str(value);
    } else if let Some(children) = node.children() {
        for child in children {
            collect(child, out);
        }
    }
}
