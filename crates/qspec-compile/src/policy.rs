//! Question-spec path conventions.

/// Default filename suffix marking a document as a question spec.
pub const QUESTION_SUFFIX: &str = ".qspec.md";

/// Path convention deciding which documents the compiler applies to.
///
/// Deployments use one of two conventions: a distinguishing filename
/// suffix, or a dedicated directory for question files. The compiler
/// only ever consults the predicate, so the choice stays in
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPolicy {
    /// Filenames ending in the given suffix, e.g. `.qspec.md`.
    Suffix(String),
    /// Files with the given directory name anywhere in their path,
    /// e.g. `questions`.
    Directory(String),
}

impl Default for PathPolicy {
    fn default() -> Self {
        PathPolicy::Suffix(QUESTION_SUFFIX.to_owned())
    }
}

impl PathPolicy {
    /// Whether the document at `path` is a question spec.
    ///
    /// Paths are normalized to forward slashes first, so Windows-style
    /// separators match as well.
    pub fn is_question_spec(&self, path: &str) -> bool {
        let normalized = normalize(path);
        match self {
            PathPolicy::Suffix(suffix) => normalized.ends_with(suffix.as_str()),
            PathPolicy::Directory(dir) => {
                // The final segment is the filename, not a directory.
                let mut segments: Vec<&str> = normalized.split('/').collect();
                segments.pop();
                segments.iter().any(|segment| segment == dir)
            }
        }
    }
}

/// Derive the per-document id prefix from the file path.
///
/// The filename is taken with the question-spec suffix stripped, falling
/// back to stripping a generic `.md` suffix; an empty remainder becomes
/// `question`.
pub(crate) fn id_prefix(path: &str) -> String {
    let normalized = normalize(path);
    let base = normalized.rsplit('/').next().unwrap_or("");
    let stem = base
        .strip_suffix(QUESTION_SUFFIX)
        .or_else(|| base.strip_suffix(".md"))
        .unwrap_or(base);
    if stem.is_empty() {
        "question".to_owned()
    } else {
        stem.to_owned()
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_suffix_policy() {
        let policy = PathPolicy::default();
        assert!(policy.is_question_spec("content/rust/q1.qspec.md"));
        assert!(policy.is_question_spec(r"content\rust\q1.qspec.md"));
        assert!(!policy.is_question_spec("content/rust/q1.md"));
        assert!(!policy.is_question_spec(""));
    }

    #[test]
    fn test_directory_policy() {
        let policy = PathPolicy::Directory("questions".to_owned());
        assert!(policy.is_question_spec("course/questions/q1.md"));
        assert!(policy.is_question_spec("questions/q1.md"));
        // A file named like the directory does not count.
        assert!(!policy.is_question_spec("course/questions"));
        assert!(!policy.is_question_spec("course/notes/q1.md"));
    }

    #[test]
    fn test_id_prefix_strips_question_suffix_first() {
        assert_eq!(id_prefix("rust/q1.qspec.md"), "q1");
        assert_eq!(id_prefix("rust/q1.md"), "q1");
        assert_eq!(id_prefix(r"rust\q2.qspec.md"), "q2");
        assert_eq!(id_prefix("README"), "README");
    }

    #[test]
    fn test_id_prefix_empty_stem_falls_back() {
        assert_eq!(id_prefix(".qspec.md"), "question");
        assert_eq!(id_prefix(".md"), "question");
        assert_eq!(id_prefix(""), "question");
    }
}
