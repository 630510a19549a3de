//! Fill-in-blank marker substitution.

use qspec_tree::{Node, visit_each_mut};

/// Rewrite cloze markers in every text-bearing leaf under `nodes`.
///
/// Applies to `text`, `code`, and `inlineCode` values. Each string is
/// rewritten in one left-to-right scan over a three-token grammar:
/// `\{{` emits the literal `{{` (the backslash is dropped and the braces
/// lose their blank meaning), `{{inner}}` with a non-empty inner free of
/// `}` emits `${inner}`, and everything else is copied through.
pub(crate) fn substitute_blanks(nodes: &mut [Node]) {
    visit_each_mut(nodes, &mut |node| match node {
        Node::Text { value } | Node::Code { value, .. } | Node::InlineCode { value } => {
            *value = rewrite(value);
        }
        _ => {}
    });
}

fn rewrite(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    loop {
        let Some(start) = rest.find(['\\', '{']) else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        if let Some(after) = rest.strip_prefix("\\{{") {
            out.push_str("{{");
            rest = after;
        } else if let Some(after) = rest.strip_prefix("{{") {
            if let Some((inner, remaining)) = split_blank(after) {
                out.push_str("${");
                out.push_str(inner);
                out.push('}');
                rest = remaining;
            } else {
                // No terminating braces; emit one character and rescan
                // from the next, so `{{{x}}` still finds its blank.
                out.push('{');
                rest = &rest[1..];
            }
        } else {
            // Lone backslash or single brace.
            out.push_str(&rest[..1]);
            rest = &rest[1..];
        }
    }
}

/// Split `inner}}rest` directly after an opening `{{`.
///
/// The inner part ends at the first `}` and must be non-empty; the
/// terminator must be exactly two braces.
fn split_blank(after: &str) -> Option<(&str, &str)> {
    let close = after.find('}')?;
    if close == 0 {
        return None;
    }
    after[close..]
        .strip_prefix("}}")
        .map(|remaining| (&after[..close], remaining))
}
