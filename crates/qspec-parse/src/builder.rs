//! Event stream to tree conversion.
//!
//! Consumes pulldown-cmark events for one plain-markdown chunk and
//! builds the corresponding [`Node`] children. Container events push a
//! frame onto a stack; the matching end event pops the frame and
//! attaches the finished node to its parent.

use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, MetadataBlockKind, Options, Parser, Tag, TagEnd,
};
use qspec_tree::{Align, Node};

/// Parse one segment of plain markdown into tree children.
///
/// Frontmatter blocks are only recognized when `allow_frontmatter` is
/// set, which the caller does for the chunk at the start of the
/// document.
pub(crate) fn parse_chunk(markdown: &str, allow_frontmatter: bool) -> Vec<Node> {
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, chunk_options(allow_frontmatter)) {
        builder.handle(event);
    }
    builder.finish()
}

fn chunk_options(allow_frontmatter: bool) -> Options {
    let mut options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    if allow_frontmatter {
        options |= Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
            | Options::ENABLE_PLUSES_DELIMITED_METADATA_BLOCKS;
    }
    options
}

/// Open container on the build stack.
struct Frame {
    node: Node,
    /// Paragraph synthesized around bare inline content in a tight list
    /// item. Closed implicitly when block content or the item end
    /// arrives.
    synthetic: bool,
    /// For list item frames: whether the parser emitted a real paragraph
    /// inside, which marks the surrounding list as loose.
    explicit_paragraph: bool,
}

impl Frame {
    fn new(node: Node, synthetic: bool) -> Self {
        Self {
            node,
            synthetic,
            explicit_paragraph: false,
        }
    }
}

/// Verbatim text collected between a start and end event.
enum Capture {
    Code { lang: Option<String>, text: String },
    Metadata { style: MetadataBlockKind, text: String },
    HtmlBlock { text: String },
}

impl Capture {
    fn text_mut(&mut self) -> &mut String {
        match self {
            Capture::Code { text, .. }
            | Capture::Metadata { text, .. }
            | Capture::HtmlBlock { text } => text,
        }
    }
}

/// Pending image whose alt text is being collected from inline events.
struct ImageFrame {
    url: String,
    title: Option<String>,
    alt: String,
}

struct TreeBuilder {
    stack: Vec<Frame>,
    capture: Option<Capture>,
    images: Vec<ImageFrame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(Node::root(Vec::new()), false)],
            capture: None,
            images: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.pop_frame();
        }
        match self.stack.pop().map(|frame| frame.node) {
            Some(Node::Root { children }) => children,
            _ => Vec::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.block_html(&html),
            Event::InlineHtml(html) => self.inline_html(&html),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.hard_break(),
            Event::Rule => self.push_block(Node::ThematicBreak),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled in chunk_options
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: Tag<'_>) {
        // Inside an image label only a nested image changes state; all
        // other markup is flattened into the alt text.
        if !self.images.is_empty() {
            if let Tag::Image {
                dest_url, title, ..
            } = tag
            {
                self.images.push(ImageFrame {
                    url: dest_url.into_string(),
                    title: optional(title.into_string()),
                    alt: String::new(),
                });
            }
            return;
        }

        match tag {
            Tag::Paragraph => {
                if let Some(frame) = self.stack.last_mut() {
                    if matches!(frame.node, Node::ListItem { .. }) {
                        frame.explicit_paragraph = true;
                    }
                }
                self.push_frame(Node::paragraph(Vec::new()));
            }
            Tag::Heading { level, .. } => {
                self.close_synthetic();
                self.push_frame(Node::heading(heading_depth(level), Vec::new()));
            }
            Tag::BlockQuote(_) => {
                self.close_synthetic();
                self.push_frame(Node::Blockquote {
                    children: Vec::new(),
                });
            }
            Tag::CodeBlock(kind) => {
                self.close_synthetic();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => fence_lang(&info),
                    CodeBlockKind::Indented => None,
                };
                self.capture = Some(Capture::Code {
                    lang,
                    text: String::new(),
                });
            }
            Tag::HtmlBlock => {
                self.close_synthetic();
                self.capture = Some(Capture::HtmlBlock {
                    text: String::new(),
                });
            }
            Tag::MetadataBlock(style) => {
                self.capture = Some(Capture::Metadata {
                    style,
                    text: String::new(),
                });
            }
            Tag::List(start) => {
                self.close_synthetic();
                self.push_frame(Node::List {
                    ordered: start.is_some(),
                    start: start.and_then(|n| u32::try_from(n).ok()),
                    spread: false,
                    children: Vec::new(),
                });
            }
            Tag::Item => {
                self.push_frame(Node::ListItem {
                    spread: false,
                    checked: None,
                    children: Vec::new(),
                });
            }
            Tag::Table(alignments) => {
                self.close_synthetic();
                self.push_frame(Node::Table {
                    align: alignments.into_iter().map(column_align).collect(),
                    children: Vec::new(),
                });
            }
            // The header row has no dedicated node kind; it is simply the
            // table's first row.
            Tag::TableHead | Tag::TableRow => {
                self.push_frame(Node::TableRow {
                    children: Vec::new(),
                });
            }
            Tag::TableCell => {
                self.push_frame(Node::TableCell {
                    children: Vec::new(),
                });
            }
            Tag::Emphasis => self.push_inline_frame(Node::Emphasis {
                children: Vec::new(),
            }),
            Tag::Strong => self.push_inline_frame(Node::Strong {
                children: Vec::new(),
            }),
            Tag::Strikethrough => self.push_inline_frame(Node::Delete {
                children: Vec::new(),
            }),
            Tag::Link {
                dest_url, title, ..
            } => {
                self.push_inline_frame(Node::Link {
                    url: dest_url.into_string(),
                    title: optional(title.into_string()),
                    children: Vec::new(),
                });
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.images.push(ImageFrame {
                    url: dest_url.into_string(),
                    title: optional(title.into_string()),
                    alt: String::new(),
                });
            }
            Tag::FootnoteDefinition(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {
                // Not enabled in chunk_options
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if !self.images.is_empty() {
            if tag == TagEnd::Image {
                self.finish_image();
            }
            return;
        }

        match tag {
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::Table
            | TagEnd::TableHead
            | TagEnd::TableRow
            | TagEnd::TableCell
            | TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link => self.pop_frame(),
            TagEnd::Item => {
                self.close_synthetic();
                if let Some(mut frame) = self.stack.pop() {
                    if let Node::ListItem { spread, .. } = &mut frame.node {
                        *spread = frame.explicit_paragraph;
                    }
                    self.attach(frame.node);
                }
            }
            TagEnd::List(_) => {
                if let Some(mut frame) = self.stack.pop() {
                    if let Node::List {
                        spread, children, ..
                    } = &mut frame.node
                    {
                        *spread = children
                            .iter()
                            .any(|item| matches!(item, Node::ListItem { spread: true, .. }));
                    }
                    self.attach(frame.node);
                }
            }
            TagEnd::CodeBlock => {
                if let Some(Capture::Code { lang, mut text }) = self.capture.take() {
                    trim_final_newline(&mut text);
                    self.attach(Node::code(lang, text));
                }
            }
            TagEnd::MetadataBlock(_) => {
                if let Some(Capture::Metadata { style, mut text }) = self.capture.take() {
                    trim_final_newline(&mut text);
                    self.attach(match style {
                        MetadataBlockKind::YamlStyle => Node::Yaml { value: text },
                        MetadataBlockKind::PlusesStyle => Node::Toml { value: text },
                    });
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(Capture::HtmlBlock { mut text }) = self.capture.take() {
                    trim_final_newline(&mut text);
                    if !text.is_empty() {
                        self.attach(Node::Html { value: text });
                    }
                }
            }
            TagEnd::Image
            | TagEnd::FootnoteDefinition
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::Superscript
            | TagEnd::Subscript => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text_mut().push_str(text);
        } else if let Some(image) = self.images.last_mut() {
            image.alt.push_str(text);
        } else {
            self.push_text(text);
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(image) = self.images.last_mut() {
            image.alt.push_str(code);
        } else {
            self.push_inline(Node::inline_code(code));
        }
    }

    fn block_html(&mut self, html: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text_mut().push_str(html);
        } else {
            self.push_block(Node::Html {
                value: html.to_owned(),
            });
        }
    }

    fn inline_html(&mut self, html: &str) {
        if let Some(image) = self.images.last_mut() {
            image.alt.push_str(html);
        } else {
            self.push_inline(Node::Html {
                value: html.to_owned(),
            });
        }
    }

    fn hard_break(&mut self) {
        if self.images.is_empty() {
            self.push_inline(Node::Break);
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        for frame in self.stack.iter_mut().rev() {
            if let Node::ListItem { checked: slot, .. } = &mut frame.node {
                *slot = Some(checked);
                return;
            }
        }
    }

    fn finish_image(&mut self) {
        let Some(image) = self.images.pop() else {
            return;
        };
        if let Some(outer) = self.images.last_mut() {
            // Nested image inside a label flattens into the outer alt.
            outer.alt.push_str(&image.alt);
        } else {
            self.push_inline(Node::Image {
                url: image.url,
                title: image.title,
                alt: image.alt,
            });
        }
    }

    fn push_frame(&mut self, node: Node) {
        self.stack.push(Frame::new(node, false));
    }

    /// Start an inline container, wrapping it in a paragraph first when
    /// it appears bare inside a tight list item.
    fn push_inline_frame(&mut self, node: Node) {
        self.ensure_paragraph();
        self.push_frame(node);
    }

    fn pop_frame(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.attach(frame.node);
        }
    }

    fn attach(&mut self, node: Node) {
        if let Some(children) = self
            .stack
            .last_mut()
            .and_then(|frame| frame.node.children_mut())
        {
            children.push(node);
        }
    }

    /// Append inline text, merging with a preceding text sibling.
    fn push_text(&mut self, text: &str) {
        self.ensure_paragraph();
        if let Some(Node::Text { value }) = self
            .stack
            .last_mut()
            .and_then(|frame| frame.node.children_mut())
            .and_then(|children| children.last_mut())
        {
            value.push_str(text);
        } else {
            self.attach(Node::text(text));
        }
    }

    fn push_inline(&mut self, node: Node) {
        self.ensure_paragraph();
        self.attach(node);
    }

    fn push_block(&mut self, node: Node) {
        self.close_synthetic();
        self.attach(node);
    }

    /// Tight list items carry bare inline content; give it the paragraph
    /// wrapper the tree shape expects.
    fn ensure_paragraph(&mut self) {
        if matches!(
            self.stack.last(),
            Some(frame) if matches!(frame.node, Node::ListItem { .. })
        ) {
            self.stack
                .push(Frame::new(Node::paragraph(Vec::new()), true));
        }
    }

    fn close_synthetic(&mut self) {
        if matches!(self.stack.last(), Some(frame) if frame.synthetic) {
            self.pop_frame();
        }
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn column_align(alignment: Alignment) -> Option<Align> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some(Align::Left),
        Alignment::Center => Some(Align::Center),
        Alignment::Right => Some(Align::Right),
    }
}

/// Language token of a fence info string, `None` when absent.
fn fence_lang(info: &str) -> Option<String> {
    let lang = info.split_whitespace().next().unwrap_or_default();
    (!lang.is_empty()).then(|| lang.to_owned())
}

fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Drop the line ending that terminates a verbatim block; the value
/// keeps interior newlines only.
fn trim_final_newline(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(markdown: &str) -> Vec<Node> {
        parse_chunk(markdown, false)
    }

    fn p(children: Vec<Node>) -> Node {
        Node::paragraph(children)
    }

    fn item(spread: bool, children: Vec<Node>) -> Node {
        Node::ListItem {
            spread,
            checked: None,
            children,
        }
    }

    #[test]
    fn test_soft_break_becomes_newline_in_text() {
        let nodes = parse("line one\nline two");
        assert_eq!(nodes, vec![p(vec![Node::text("line one\nline two")])]);
    }

    #[test]
    fn test_heading_depths() {
        let nodes = parse("# A\n\n### B");
        assert_eq!(
            nodes,
            vec![
                Node::heading(1, vec![Node::text("A")]),
                Node::heading(3, vec![Node::text("B")]),
            ]
        );
    }

    #[test]
    fn test_inline_markup() {
        let nodes = parse("*em* and **strong** and ~~gone~~ and `code`");
        assert_eq!(
            nodes,
            vec![p(vec![
                Node::Emphasis {
                    children: vec![Node::text("em")],
                },
                Node::text(" and "),
                Node::Strong {
                    children: vec![Node::text("strong")],
                },
                Node::text(" and "),
                Node::Delete {
                    children: vec![Node::text("gone")],
                },
                Node::text(" and "),
                Node::inline_code("code"),
            ])]
        );
    }

    #[test]
    fn test_hard_break() {
        let nodes = parse("first  \nsecond");
        assert_eq!(
            nodes,
            vec![p(vec![
                Node::text("first"),
                Node::Break,
                Node::text("second"),
            ])]
        );
    }

    #[test]
    fn test_fenced_code_drops_final_newline() {
        let nodes = parse("```js\nconst x = 1;\n```\n");
        assert_eq!(
            nodes,
            vec![Node::code(Some("js".to_owned()), "const x = 1;")]
        );
    }

    #[test]
    fn test_fence_info_keeps_language_token_only() {
        let nodes = parse("```rust ignore\nlet x = 1;\n```\n");
        assert_eq!(
            nodes,
            vec![Node::code(Some("rust".to_owned()), "let x = 1;")]
        );
    }

    #[test]
    fn test_bare_fence_has_no_language() {
        let nodes = parse("```\nplain\n```\n");
        assert_eq!(nodes, vec![Node::code(None, "plain")]);
    }

    #[test]
    fn test_indented_code_block() {
        let nodes = parse("    indented line\n");
        assert_eq!(nodes, vec![Node::code(None, "indented line")]);
    }

    #[test]
    fn test_tight_list_wraps_bare_text_in_paragraphs() {
        let nodes = parse("- a\n- b");
        assert_eq!(
            nodes,
            vec![Node::List {
                ordered: false,
                start: None,
                spread: false,
                children: vec![
                    item(false, vec![p(vec![Node::text("a")])]),
                    item(false, vec![p(vec![Node::text("b")])]),
                ],
            }]
        );
    }

    #[test]
    fn test_loose_list_sets_spread() {
        let nodes = parse("- a\n\n- b");
        assert_eq!(
            nodes,
            vec![Node::List {
                ordered: false,
                start: None,
                spread: true,
                children: vec![
                    item(true, vec![p(vec![Node::text("a")])]),
                    item(true, vec![p(vec![Node::text("b")])]),
                ],
            }]
        );
    }

    #[test]
    fn test_ordered_list_start() {
        let nodes = parse("3. x");
        match &nodes[0] {
            Node::List { ordered, start, .. } => {
                assert!(*ordered);
                assert_eq!(*start, Some(3));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_task_list_markers() {
        let nodes = parse("- [x] done\n- [ ] todo");
        let Node::List { children, .. } = &nodes[0] else {
            panic!("expected list");
        };
        assert_eq!(
            children[0],
            Node::ListItem {
                spread: false,
                checked: Some(true),
                children: vec![p(vec![Node::text("done")])],
            }
        );
        assert_eq!(
            children[1],
            Node::ListItem {
                spread: false,
                checked: Some(false),
                children: vec![p(vec![Node::text("todo")])],
            }
        );
    }

    #[test]
    fn test_nested_list_in_tight_item() {
        let nodes = parse("- a\n  - b");
        let Node::List { children, .. } = &nodes[0] else {
            panic!("expected list");
        };
        assert_eq!(
            children[0],
            item(
                false,
                vec![
                    p(vec![Node::text("a")]),
                    Node::List {
                        ordered: false,
                        start: None,
                        spread: false,
                        children: vec![item(false, vec![p(vec![Node::text("b")])])],
                    },
                ],
            )
        );
    }

    #[test]
    fn test_link_title() {
        let nodes = parse("[t](https://example.com/ \"Title\") and [u](/plain)");
        assert_eq!(
            nodes,
            vec![p(vec![
                Node::Link {
                    url: "https://example.com/".to_owned(),
                    title: Some("Title".to_owned()),
                    children: vec![Node::text("t")],
                },
                Node::text(" and "),
                Node::Link {
                    url: "/plain".to_owned(),
                    title: None,
                    children: vec![Node::text("u")],
                },
            ])]
        );
    }

    #[test]
    fn test_image_alt_flattens_label_markup() {
        let nodes = parse("![*alt* text](img.png \"T\")");
        assert_eq!(
            nodes,
            vec![p(vec![Node::Image {
                url: "img.png".to_owned(),
                title: Some("T".to_owned()),
                alt: "alt text".to_owned(),
            }])]
        );
    }

    #[test]
    fn test_table_alignment_and_rows() {
        let nodes = parse("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            nodes,
            vec![Node::Table {
                align: vec![Some(Align::Left), Some(Align::Right)],
                children: vec![
                    Node::TableRow {
                        children: vec![
                            Node::TableCell {
                                children: vec![Node::text("A")],
                            },
                            Node::TableCell {
                                children: vec![Node::text("B")],
                            },
                        ],
                    },
                    Node::TableRow {
                        children: vec![
                            Node::TableCell {
                                children: vec![Node::text("1")],
                            },
                            Node::TableCell {
                                children: vec![Node::text("2")],
                            },
                        ],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_blockquote() {
        let nodes = parse("> quoted");
        assert_eq!(
            nodes,
            vec![Node::Blockquote {
                children: vec![p(vec![Node::text("quoted")])],
            }]
        );
    }

    #[test]
    fn test_thematic_break() {
        let nodes = parse("a\n\n---\n\nb");
        assert_eq!(
            nodes,
            vec![
                p(vec![Node::text("a")]),
                Node::ThematicBreak,
                p(vec![Node::text("b")]),
            ]
        );
    }

    #[test]
    fn test_yaml_frontmatter_at_document_start() {
        let nodes = parse_chunk("---\ntitle: x\n---\n\nbody\n", true);
        assert_eq!(
            nodes,
            vec![
                Node::Yaml {
                    value: "title: x".to_owned(),
                },
                p(vec![Node::text("body")]),
            ]
        );
    }

    #[test]
    fn test_toml_frontmatter_at_document_start() {
        let nodes = parse_chunk("+++\nkey = 1\n+++\n\nbody\n", true);
        assert_eq!(
            nodes[0],
            Node::Toml {
                value: "key = 1".to_owned(),
            }
        );
    }

    #[test]
    fn test_frontmatter_ignored_when_disallowed() {
        let nodes = parse_chunk("---\ntitle: x\n---\n", false);
        assert!(
            !nodes
                .iter()
                .any(|node| matches!(node, Node::Yaml { .. } | Node::Toml { .. }))
        );
        assert_eq!(nodes[0], Node::ThematicBreak);
    }

    #[test]
    fn test_block_and_inline_html() {
        let nodes = parse("<div>\nhi\n</div>\n\npara <span>x</span> tail");
        assert_eq!(
            nodes,
            vec![
                Node::Html {
                    value: "<div>\nhi\n</div>".to_owned(),
                },
                p(vec![
                    Node::text("para "),
                    Node::Html {
                        value: "<span>".to_owned(),
                    },
                    Node::text("x"),
                    Node::Html {
                        value: "</span>".to_owned(),
                    },
                    Node::text(" tail"),
                ]),
            ]
        );
    }

    #[test]
    fn test_japanese_text_survives() {
        let nodes = parse("## 採点基準\n\n3: 期待通り動作する\n2: 異常系");
        assert_eq!(
            nodes,
            vec![
                Node::heading(2, vec![Node::text("採点基準")]),
                p(vec![Node::text("3: 期待通り動作する\n2: 異常系")]),
            ]
        );
    }
}
