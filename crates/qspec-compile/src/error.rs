//! Question-spec validation errors.

/// Structural failure of one question-spec document.
///
/// Each variant is a distinct violation of the required document shape
/// and carries the offending path. A failing document is rejected as a
/// whole; no partially compiled output is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Question spec markdown must not include frontmatter: {path}")]
    Frontmatter { path: String },

    #[error("Question spec markdown must start with \"# <title>\": {path}")]
    MissingTitle { path: String },

    #[error("Question spec title must not be empty: {path}")]
    EmptyTitle { path: String },

    #[error("Question spec requires \"## Type\": {path}")]
    MissingType { path: String },

    #[error("Question spec requires \"## Prompt\": {path}")]
    MissingPrompt { path: String },
}
