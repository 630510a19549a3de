//! Directive-to-admonition rewriting.

use qspec_tree::{Attribute, Node, visit_mut};

/// Directive names rendered as admonitions. Matching is exact and
/// case-sensitive; any other name stays a raw directive because the
/// directive syntax is shared with unrelated extensions.
const ADMONITION_TYPES: [&str; 5] = ["tip", "info", "note", "caution", "danger"];

/// Rewrite every recognized admonition directive in the tree into an
/// `Admonition` element, in place.
///
/// The directive name becomes the `type` attribute. A label that is
/// non-empty after trimming becomes the `title` attribute; otherwise the
/// title is omitted and the renderer falls back to its per-type default.
/// Children are carried over unchanged. This pass never fails.
pub fn rewrite_admonitions(root: &mut Node) {
    visit_mut(root, &mut |node| {
        let Node::ContainerDirective {
            name,
            label,
            children,
        } = node
        else {
            return;
        };
        if !ADMONITION_TYPES.contains(&name.as_str()) {
            return;
        }

        let mut attributes = vec![Attribute::string("type", name.as_str())];
        if let Some(title) = label.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            attributes.push(Attribute::string("title", title));
        }
        let children = std::mem::take(children);
        *node = Node::jsx_element("Admonition", attributes, children);
    });
}
