//! Shared compile pipeline for the build and check commands.
//!
//! Discovery, parsing, and the two rewrite passes are identical for both
//! commands; only the handling of results differs (write vs. report).

use std::path::{Path, PathBuf};

use qspec_compile::{ExerciseCompiler, PathPolicy, rewrite_admonitions};
use qspec_config::{Convention, QuestionsConfig};
use qspec_parse::parse_document;
use qspec_tree::Node;

use crate::error::CliError;

/// Result of compiling one markdown source.
#[derive(Debug)]
pub(crate) struct CompiledDocument {
    /// The compiled tree, ready for serialization.
    pub root: Node,
    /// Parser warnings (stray or unclosed directives).
    pub warnings: Vec<String>,
    /// Whether the question-spec pass applied to this document.
    pub is_question: bool,
}

/// Map the configured question convention onto a compiler path policy.
pub(crate) fn path_policy(questions: &QuestionsConfig) -> PathPolicy {
    match questions.convention {
        Convention::Suffix => PathPolicy::Suffix(questions.suffix.clone()),
        Convention::Directory => PathPolicy::Directory(questions.directory.clone()),
    }
}

/// Discover markdown sources under the content directory.
///
/// Walks the tree with gitignore and hidden-file filtering and returns
/// paths relative to `source_dir`, sorted for a deterministic processing
/// order.
pub(crate) fn discover_sources(source_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut sources = Vec::new();
    for entry in ignore::Walk::new(source_dir) {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "md") {
            let rel = path.strip_prefix(source_dir).unwrap_or(path);
            sources.push(rel.to_path_buf());
        }
    }
    sources.sort();
    Ok(sources)
}

/// Parse and compile a single document.
///
/// `rel_path` is the path relative to the source directory; it drives the
/// question-spec gate, the heading id prefix, and error messages.
pub(crate) fn compile_source(
    source_dir: &Path,
    rel_path: &Path,
    compiler: &ExerciseCompiler,
) -> Result<CompiledDocument, CliError> {
    let text = std::fs::read_to_string(source_dir.join(rel_path))?;
    let parsed = parse_document(&text);

    let mut root = parsed.root;
    rewrite_admonitions(&mut root);
    let is_question = compiler.compile(&mut root, &rel_path.to_string_lossy())?;

    Ok(CompiledDocument {
        root,
        warnings: parsed.warnings,
        is_question,
    })
}
