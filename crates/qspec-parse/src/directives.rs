//! Container directive segmentation.
//!
//! Splits a document into plain-markdown chunks and `:::name[label]`
//! containers before any chunk reaches the markdown parser. Markers are
//! recognized line-by-line; marker lines inside code fences stay
//! literal, and an unrecognized marker line is ordinary text. Containers
//! nest, a bare `:::` closes the innermost open one.

use qspec_tree::Node;

use crate::builder::parse_chunk;
use crate::fence::FenceTracker;

/// Directive marker found on a line.
#[derive(Debug, PartialEq, Eq)]
enum Marker {
    Open {
        name: String,
        label: Option<String>,
    },
    Close,
}

/// Split a document into block nodes, resolving directive containers.
pub(crate) fn split_blocks(source: &str) -> (Vec<Node>, Vec<String>) {
    let mut scanner = BlockScanner::new();
    for (idx, line) in source.lines().enumerate() {
        scanner.line(idx + 1, line);
    }
    scanner.finish()
}

/// One open container (or the document itself at the bottom).
struct Frame {
    directive: Option<OpenDirective>,
    children: Vec<Node>,
    /// Plain lines queued for the markdown parser.
    pending: String,
}

struct OpenDirective {
    name: String,
    label: Option<String>,
    line: usize,
}

impl Frame {
    fn new(directive: Option<OpenDirective>) -> Self {
        Self {
            directive,
            children: Vec::new(),
            pending: String::new(),
        }
    }
}

struct BlockScanner {
    fence: FenceTracker,
    frames: Vec<Frame>,
    warnings: Vec<String>,
    /// Frontmatter is only valid in the chunk that opens the document.
    document_start: bool,
}

impl BlockScanner {
    fn new() -> Self {
        Self {
            fence: FenceTracker::new(),
            frames: vec![Frame::new(None)],
            warnings: Vec::new(),
            document_start: true,
        }
    }

    fn line(&mut self, number: usize, line: &str) {
        self.fence.update(line);
        if self.fence.in_fence() {
            self.buffer(line);
            return;
        }

        match directive_marker(line) {
            Some(Marker::Open { name, label }) => {
                self.flush();
                self.frames.push(Frame::new(Some(OpenDirective {
                    name,
                    label,
                    line: number,
                })));
            }
            Some(Marker::Close) => {
                if self.frames.len() > 1 {
                    self.close_top();
                } else {
                    self.warnings
                        .push(format!("line {number}: stray ::: with no open directive"));
                    self.buffer(line);
                }
            }
            None => self.buffer(line),
        }
    }

    fn finish(mut self) -> (Vec<Node>, Vec<String>) {
        while self.frames.len() > 1 {
            if let Some(open) = self.frames.last().and_then(|frame| frame.directive.as_ref()) {
                self.warnings.push(format!(
                    "line {}: unclosed :::{} (missing closing :::)",
                    open.line, open.name
                ));
            }
            self.close_top();
        }
        self.flush();
        let children = self
            .frames
            .pop()
            .map(|frame| frame.children)
            .unwrap_or_default();
        (children, self.warnings)
    }

    fn buffer(&mut self, line: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pending.push_str(line);
            frame.pending.push('\n');
        }
    }

    /// Parse the queued plain lines of the innermost frame and append
    /// the resulting nodes to its children.
    fn flush(&mut self) {
        let allow_frontmatter = std::mem::take(&mut self.document_start);
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        if frame.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut frame.pending);
        frame
            .children
            .extend(parse_chunk(&pending, allow_frontmatter));
    }

    fn close_top(&mut self) {
        self.flush();
        if let Some(Frame {
            directive: Some(open),
            children,
            ..
        }) = self.frames.pop()
        {
            let node = Node::directive(open.name, open.label, children);
            if let Some(parent) = self.frames.last_mut() {
                parent.children.push(node);
            }
        }
    }
}

/// Recognize a directive marker line.
///
/// An opening marker is a run of three or more colons followed
/// immediately by a name, an optional `[label]`, an optional `{..}`
/// attribute group (accepted and dropped) and nothing else. A closing
/// marker is a colon run alone on the line.
fn directive_marker(line: &str) -> Option<Marker> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with(":::") {
        return None;
    }
    let colons = trimmed.chars().take_while(|&c| c == ':').count();
    let rest = &trimmed[colons..];

    if rest.trim().is_empty() {
        return Some(Marker::Close);
    }

    let name_end = rest.find(|c| !is_name_char(c)).unwrap_or(rest.len());
    if name_end == 0 {
        return None;
    }
    let name = &rest[..name_end];
    let mut after = &rest[name_end..];

    let mut label = None;
    if after.starts_with('[') {
        let (content, consumed) = enclosed(after, '[', ']')?;
        label = Some(content);
        after = &after[consumed..];
    }
    if after.starts_with('{') {
        let (_, consumed) = enclosed(after, '{', '}')?;
        after = &after[consumed..];
    }
    if !after.trim().is_empty() {
        return None;
    }

    Some(Marker::Open {
        name: name.to_owned(),
        label,
    })
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Content of a balanced `open..close` group at the start of `s`, plus
/// the bytes consumed. `None` when the group never closes.
fn enclosed(s: &str, open: char, close: char) -> Option<(String, usize)> {
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth <= 0 {
                return Some((s[1..i].to_owned(), i + 1));
            }
        }
    }
    None
}
