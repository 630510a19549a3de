//! `qspec build` command implementation.

use std::path::PathBuf;

use clap::Args;
use qspec_compile::ExerciseCompiler;
use qspec_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;
use crate::pipeline;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for compiled JSON trees (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover qspec.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (show per-document compile logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error on the first malformed question spec, naming the
    /// offending path; nothing is written for that document.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source_dir = &config.content_resolved.source_dir;
        let output_dir = &config.content_resolved.output_dir;

        output.info(&format!("Source: {}", source_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let compiler = ExerciseCompiler::new(pipeline::path_policy(&config.questions));
        let sources = pipeline::discover_sources(source_dir)?;

        let mut questions = 0usize;
        for rel_path in &sources {
            let doc = pipeline::compile_source(source_dir, rel_path, &compiler)?;
            for warning in &doc.warnings {
                tracing::warn!(path = %rel_path.display(), warning = %warning, "Directive warning");
            }
            if doc.is_question {
                questions += 1;
            }
            tracing::debug!(path = %rel_path.display(), question = doc.is_question, "Compiled document");

            let target = output_dir.join(rel_path).with_extension("json");
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, serde_json::to_string_pretty(&doc.root)?)?;
        }

        output.success(&format!(
            "Compiled {} documents ({questions} question specs) to {}",
            sources.len(),
            output_dir.display()
        ));
        Ok(())
    }
}
