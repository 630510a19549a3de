//! Depth-first tree traversal.

use crate::node::Node;

/// Visit `node` and every descendant in preorder.
pub fn visit(node: &Node, f: &mut impl FnMut(&Node)) {
    f(node);
    if let Some(children) = node.children() {
        for child in children {
            visit(child, f);
        }
    }
}

/// Visit `node` and every descendant in preorder, with mutable access.
///
/// The callback runs before descending, so a callback that replaces the
/// node wholesale still gets its (carried-over) children visited.
pub fn visit_mut(node: &mut Node, f: &mut impl FnMut(&mut Node)) {
    f(node);
    if let Some(children) = node.children_mut() {
        for child in children {
            visit_mut(child, f);
        }
    }
}

/// Visit every node of a sibling sequence and their descendants.
pub fn visit_each(nodes: &[Node], f: &mut impl FnMut(&Node)) {
    for node in nodes {
        visit(node, f);
    }
}

/// Mutable variant of [`visit_each`].
pub fn visit_each_mut(nodes: &mut [Node], f: &mut impl FnMut(&mut Node)) {
    for node in nodes {
        visit_mut(node, f);
    }
}
