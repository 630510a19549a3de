//! `qspec check` command implementation.

use std::path::PathBuf;

use clap::Args;
use qspec_compile::ExerciseCompiler;
use qspec_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;
use crate::pipeline;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover qspec.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (show per-document compile logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Unlike `build`, every document is compiled even after a failure so
    /// all problems are reported in one run; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns a validation error summarizing the failure count when any
    /// document is malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source_dir = &config.content_resolved.source_dir;
        let compiler = ExerciseCompiler::new(pipeline::path_policy(&config.questions));
        let sources = pipeline::discover_sources(source_dir)?;

        output.info(&format!(
            "Checking {} documents in {}",
            sources.len(),
            source_dir.display()
        ));

        let mut questions = 0usize;
        let mut failures = 0usize;
        for rel_path in &sources {
            match pipeline::compile_source(source_dir, rel_path, &compiler) {
                Ok(doc) => {
                    for warning in &doc.warnings {
                        output.warning(&format!("{}: {warning}", rel_path.display()));
                    }
                    if doc.is_question {
                        questions += 1;
                    }
                }
                Err(err) => {
                    output.error(&err.to_string());
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            return Err(CliError::Validation(format!(
                "{failures} of {} documents failed validation",
                sources.len()
            )));
        }

        output.success(&format!(
            "{} documents OK ({questions} question specs)",
            sources.len()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &std::path::Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn check_args(temp: &tempfile::TempDir) -> CheckArgs {
        let config_path = temp.path().join("qspec.toml");
        write(&config_path, "");
        CheckArgs {
            source_dir: None,
            config: Some(config_path),
            verbose: false,
        }
    }

    #[test]
    fn test_check_passes_valid_tree() {
        let temp = tempfile::tempdir().unwrap();
        write(
            &temp.path().join("content/q1.qspec.md"),
            "# T\n\n## Type\n\ncloze\n\n## Prompt\n\n{{answer}}\n",
        );
        write(&temp.path().join("content/notes.md"), "# Notes\n");

        assert!(check_args(&temp).execute().is_ok());
    }

    #[test]
    fn test_check_reports_every_failure() {
        let temp = tempfile::tempdir().unwrap();
        write(
            &temp.path().join("content/good.qspec.md"),
            "# T\n\n## Type\n\nx\n\n## Prompt\n\np\n",
        );
        write(
            &temp.path().join("content/no-type.qspec.md"),
            "# T\n\n## Prompt\n\np\n",
        );
        write(&temp.path().join("content/no-title.qspec.md"), "just text\n");

        let err = check_args(&temp).execute().unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert_eq!(err.to_string(), "2 of 3 documents failed validation");
    }
}
