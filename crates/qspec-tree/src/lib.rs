//! mdast-shaped document tree shared by the question-spec pipeline.
//!
//! The tree is a closed set of node kinds covering the Markdown constructs
//! the pipeline produces and consumes, plus the two synthesized kinds the
//! transform passes emit (`containerDirective` before rewriting,
//! `mdxJsxFlowElement` after). Nodes own their children exclusively;
//! traversal is depth-first and order-preserving.
//!
//! Serialization follows the mdast JSON convention: every node carries a
//! `type` tag in camelCase, optional fields are omitted when absent, and
//! presence-only element attributes serialize with a `null` value.

pub mod node;
pub mod text;
pub mod visit;

pub use node::{Align, Attribute, Node};
pub use text::flatten_text;
pub use visit::{visit, visit_each, visit_each_mut, visit_mut};
