//! Markdown front end for question-spec documents.
//!
//! [`parse_document`] turns source text into a [`Node`] tree in two
//! stages: a line scanner resolves `:::name[label]` container
//! directives (fenced code always wins over markers), then each plain
//! chunk runs through pulldown-cmark and its events become tree nodes.
//!
//! Parsing never fails. Tolerated syntax problems, such as a stray or
//! unclosed directive marker, surface as warnings on the returned
//! [`ParsedDocument`].
//!
//! # Example
//!
//! ```
//! use qspec_parse::parse_document;
//! use qspec_tree::Node;
//!
//! let doc = parse_document("# Title\n\n:::tip[Note]\nBe careful.\n:::\n");
//! assert!(doc.warnings.is_empty());
//!
//! let children = doc.root.children().unwrap();
//! assert!(children[0].is_heading(1));
//! assert!(matches!(
//!     &children[1],
//!     Node::ContainerDirective { name, .. } if name == "tip"
//! ));
//! ```

mod builder;
mod directives;
mod fence;

use qspec_tree::Node;

/// Parse result: the document tree plus scanner warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Document tree rooted at a `Root` node.
    pub root: Node,
    /// Notes about tolerated syntax problems, with line numbers.
    pub warnings: Vec<String>,
}

/// Parse markdown source into a document tree.
pub fn parse_document(source: &str) -> ParsedDocument {
    let (children, warnings) = directives::split_blocks(source);
    ParsedDocument {
        root: Node::root(children),
        warnings,
    }
}
