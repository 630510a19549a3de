//! Body partitioning into named sections.

use qspec_tree::{Node, flatten_text};

/// Ordered map from level-2 heading text to the nodes following it.
///
/// Keys are the flattened heading text, trimmed, compared
/// case-sensitively. A recurring heading re-opens its entry in place and
/// discards previously collected content, so the later occurrence wins.
#[derive(Debug, Default)]
pub(crate) struct SectionMap {
    entries: Vec<(String, Vec<Node>)>,
}

impl SectionMap {
    /// Partition the document body (everything after the title heading).
    ///
    /// Nodes before the first level-2 heading belong to no section and
    /// are dropped.
    pub(crate) fn partition(body: impl IntoIterator<Item = Node>) -> Self {
        let mut map = Self::default();
        let mut current: Option<usize> = None;
        for node in body {
            if node.is_heading(2) {
                let name = flatten_text(&node).trim().to_owned();
                current = Some(map.open(name));
            } else if let Some(index) = current {
                map.entries[index].1.push(node);
            }
        }
        map
    }

    /// Open (or re-open, clearing) the entry for `name`.
    fn open(&mut self, name: String) -> usize {
        if let Some(index) = self.entries.iter().position(|(key, _)| *key == name) {
            self.entries[index].1.clear();
            index
        } else {
            self.entries.push((name, Vec::new()));
            self.entries.len() - 1
        }
    }

    /// Borrow a section's content, if the heading was seen.
    pub(crate) fn get(&self, name: &str) -> Option<&[Node]> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, nodes)| nodes.as_slice())
    }

    /// Move a section's content out; absent sections yield nothing.
    pub(crate) fn take(&mut self, name: &str) -> Vec<Node> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, nodes)| std::mem::take(nodes))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn section_heading(name: &str) -> Node {
        Node::heading(2, vec![Node::text(name)])
    }

    #[test]
    fn test_partitions_by_level_2_headings() {
        let body = vec![
            section_heading("Type"),
            Node::paragraph(vec![Node::text("cloze")]),
            section_heading("Prompt"),
            Node::paragraph(vec![Node::text("a")]),
            Node::paragraph(vec![Node::text("b")]),
        ];
        let map = SectionMap::partition(body);

        assert_eq!(map.get("Type").map(<[Node]>::len), Some(1));
        assert_eq!(map.get("Prompt").map(<[Node]>::len), Some(2));
        assert_eq!(map.get("Scoring"), None);
    }

    #[test]
    fn test_nodes_before_first_heading_are_dropped() {
        let body = vec![
            Node::paragraph(vec![Node::text("stray")]),
            section_heading("Prompt"),
            Node::paragraph(vec![Node::text("kept")]),
        ];
        let map = SectionMap::partition(body);
        assert_eq!(map.get("Prompt").map(<[Node]>::len), Some(1));
    }

    #[test]
    fn test_recurring_heading_discards_earlier_content() {
        let body = vec![
            section_heading("Prompt"),
            Node::paragraph(vec![Node::text("old")]),
            section_heading("Options"),
            Node::paragraph(vec![Node::text("opts")]),
            section_heading("Prompt"),
            Node::paragraph(vec![Node::text("new")]),
        ];
        let mut map = SectionMap::partition(body);

        let prompt = map.take("Prompt");
        assert_eq!(prompt, vec![Node::paragraph(vec![Node::text("new")])]);
        assert_eq!(map.get("Options").map(<[Node]>::len), Some(1));
    }

    #[test]
    fn test_keys_are_case_sensitive_and_trimmed() {
        let body = vec![
            Node::heading(2, vec![Node::text("  Type  ")]),
            Node::paragraph(vec![Node::text("cloze")]),
        ];
        let map = SectionMap::partition(body);
        assert!(map.get("Type").is_some());
        assert!(map.get("type").is_none());
    }

    #[test]
    fn test_heading_seen_without_content_is_present_and_empty() {
        let body = vec![section_heading("Options")];
        let mut map = SectionMap::partition(body);
        assert_eq!(map.get("Options"), Some(&[][..]));
        assert_eq!(map.take("Options"), Vec::<Node>::new());
        assert_eq!(map.take("Explanation"), Vec::<Node>::new());
    }
}
