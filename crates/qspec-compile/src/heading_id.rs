//! Heading anchor-id derivation.

use std::collections::HashMap;

use qspec_tree::{Node, flatten_text, visit_each_mut};

/// Assign anchor ids to every heading of depth 3 or deeper under `nodes`.
///
/// The id is `<prefix>-<slug>`. Duplicates within one call are suffixed
/// `-1`, `-2`, ... in order of appearance; every call counts occurrences
/// from scratch. The id is stored on the heading as renderer metadata
/// and never changes the visible text.
pub(crate) fn assign_heading_ids(nodes: &mut [Node], prefix: &str) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    visit_each_mut(nodes, &mut |node| {
        if node.heading_depth().is_none_or(|depth| depth < 3) {
            return;
        }
        let base = format!("{prefix}-{}", slugify(&flatten_text(node)));
        let count = counts.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base.clone()
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        if let Node::Heading { id: slot, .. } = node {
            *slot = Some(id);
        }
    });
}

/// Slug rule: trim, collapse whitespace runs to single hyphens, then
/// keep only Unicode letters, Unicode digits, `_`, and `-`. An empty
/// result falls back to `section`.
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_gap = false;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            pending_gap = true;
            continue;
        }
        if pending_gap {
            slug.push('-');
            pending_gap = false;
        }
        if c.is_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
        }
    }
    if slug.is_empty() {
        "section".to_owned()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn heading_ids(nodes: &[Node]) -> Vec<Option<String>> {
        nodes
            .iter()
            .map(|node| match node {
                Node::Heading { id, .. } => id.clone(),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify("解説"), "解説");
        assert_eq!(slugify("手順 1: 実行"), "手順-1-実行");
        assert_eq!(slugify("  Setup  steps  "), "Setup-steps");
    }

    #[test]
    fn test_slugify_strips_punctuation_after_hyphenation() {
        // Whitespace collapses before stripping, so a dropped character
        // between gaps leaves both hyphens.
        assert_eq!(slugify("a ! b"), "a--b");
        assert_eq!(slugify("a !"), "a-");
    }

    #[test]
    fn test_slugify_empty_falls_back_to_section() {
        assert_eq!(slugify("!!!"), "section");
        assert_eq!(slugify("   "), "section");
    }

    #[test]
    fn test_duplicate_headings_get_numbered_suffixes() {
        let mut nodes = vec![
            Node::heading(3, vec![Node::text("解説")]),
            Node::paragraph(vec![Node::text("x")]),
            Node::heading(3, vec![Node::text("解説")]),
            Node::heading(3, vec![Node::text("解説")]),
        ];
        assign_heading_ids(&mut nodes, "q1");
        assert_eq!(
            heading_ids(&nodes),
            vec![
                Some("q1-解説".to_owned()),
                None,
                Some("q1-解説-1".to_owned()),
                Some("q1-解説-2".to_owned()),
            ]
        );
    }

    #[test]
    fn test_shallow_headings_are_skipped() {
        let mut nodes = vec![
            Node::heading(2, vec![Node::text("Prompt")]),
            Node::heading(4, vec![Node::text("Deep")]),
        ];
        assign_heading_ids(&mut nodes, "q1");
        assert_eq!(
            heading_ids(&nodes),
            vec![None, Some("q1-Deep".to_owned())]
        );
    }

    #[test]
    fn test_counter_resets_between_calls() {
        let mut first = vec![Node::heading(3, vec![Node::text("解説")])];
        let mut second = vec![Node::heading(3, vec![Node::text("解説")])];
        assign_heading_ids(&mut first, "q1");
        assign_heading_ids(&mut second, "q1");
        assert_eq!(heading_ids(&first), heading_ids(&second));
    }

    #[test]
    fn test_nested_headings_are_reached() {
        let mut nodes = vec![Node::Blockquote {
            children: vec![Node::heading(3, vec![Node::text("Note")])],
        }];
        assign_heading_ids(&mut nodes, "q2");
        let Node::Blockquote { children } = &nodes[0] else {
            panic!("expected blockquote");
        };
        assert_eq!(heading_ids(children), vec![Some("q2-Note".to_owned())]);
    }
}
