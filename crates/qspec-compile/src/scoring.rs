//! Scoring-section parsing.

use qspec_tree::{Node, flatten_text};

/// One scoring entry: how many points a criterion is worth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoringItem {
    pub(crate) points: u32,
    pub(crate) description: String,
}

/// Parse scoring items from a section's nodes.
///
/// The section is flattened to newline-joined text; every trimmed,
/// non-blank line of the form `<digits> : <description>` yields one
/// item. Anything else is skipped without error, including point values
/// too large to represent.
pub(crate) fn parse_scoring(nodes: &[Node]) -> Vec<ScoringItem> {
    let text = nodes
        .iter()
        .map(flatten_text)
        .collect::<Vec<_>>()
        .join("\n");
    text.split('\n')
        .filter_map(|line| parse_line(line.trim()))
        .collect()
}

fn parse_line(line: &str) -> Option<ScoringItem> {
    let (points, rest) = line.split_once(':')?;
    let points = points.trim_end();
    if points.is_empty() || !points.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let description = rest.trim();
    if description.is_empty() {
        return None;
    }
    Some(ScoringItem {
        points: points.parse().ok()?,
        description: description.to_owned(),
    })
}
