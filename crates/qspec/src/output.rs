//! Styled status output for the CLI commands.

use std::fmt::Display;

use console::{Term, style};

/// Writes status lines to stderr, styled by severity.
///
/// Write failures are swallowed; status output must never abort a
/// compile run.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn line(&self, msg: impl Display) {
        let _ = self.term.write_line(&msg.to_string());
    }

    /// Plain informational message.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    /// Success message, green.
    pub(crate) fn success(&self, msg: &str) {
        self.line(style(msg).green());
    }

    /// Warning message, yellow.
    pub(crate) fn warning(&self, msg: &str) {
        self.line(style(msg).yellow());
    }

    /// Error message, red.
    pub(crate) fn error(&self, msg: &str) {
        self.line(style(msg).red());
    }
}
