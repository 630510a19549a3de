//! Tree-rewrite passes that turn authored exam-content Markdown into
//! renderer-ready trees.
//!
//! # Architecture
//!
//! Two passes run in sequence over each parsed document:
//!
//! 1. [`rewrite_admonitions`] normalizes `:::tip` style container
//!    directives into `Admonition` elements. Pure syntax sugar, applies
//!    to every document, never fails.
//! 2. [`ExerciseCompiler`] compiles documents that the configured
//!    [`PathPolicy`] identifies as question specs: it validates the
//!    required structure, partitions the body into sections, extracts
//!    exam tips, substitutes cloze blanks, derives heading anchor ids,
//!    and replaces the document's children with a single `Exercise`
//!    element. Malformed question specs fail with a [`CompileError`]
//!    naming the document path.
//!
//! Both passes mutate the tree in place through an exclusive borrow and
//! perform no I/O; the document path is caller-supplied data.
//!
//! # Example
//!
//! ```
//! use qspec_compile::{ExerciseCompiler, PathPolicy, rewrite_admonitions};
//! use qspec_tree::Node;
//!
//! let mut doc = Node::root(vec![
//!     Node::heading(1, vec![Node::text("Sample")]),
//!     Node::heading(2, vec![Node::text("Type")]),
//!     Node::paragraph(vec![Node::text("descriptive")]),
//!     Node::heading(2, vec![Node::text("Prompt")]),
//!     Node::paragraph(vec![Node::text("Explain ownership.")]),
//! ]);
//!
//! rewrite_admonitions(&mut doc);
//! let compiler = ExerciseCompiler::new(PathPolicy::default());
//! let compiled = compiler.compile(&mut doc, "rust/q1.qspec.md").unwrap();
//! assert!(compiled);
//! ```

mod admonitions;
mod cloze;
mod error;
mod exercise;
mod heading_id;
mod policy;
mod scoring;
mod sections;

pub use admonitions::rewrite_admonitions;
pub use error::CompileError;
pub use exercise::ExerciseCompiler;
pub use policy::{PathPolicy, QUESTION_SUFFIX};
