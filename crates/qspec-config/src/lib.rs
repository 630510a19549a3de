//! `qspec.toml` loading and validation.
//!
//! The file is discovered by walking up from the working directory when
//! no explicit path is given; relative paths in it resolve against the
//! directory the file sits in. Command-line flags take precedence over
//! file values through [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Command-line overrides applied on top of the loaded file.
///
/// A `None` field keeps whatever the file (or default) provided.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override compiled output directory.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "qspec.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    #[serde(default)]
    content: ContentConfigRaw,
    /// Question detection configuration.
    pub questions: QuestionsConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Source directory scanned for markdown files.
    pub source_dir: PathBuf,
    /// Output directory for compiled JSON trees.
    pub output_dir: PathBuf,
}

/// How question spec files are recognized under the source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// Files whose name ends with the configured suffix are questions.
    Suffix,
    /// Files inside a directory with the configured name are questions.
    Directory,
}

/// Question detection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct QuestionsConfig {
    /// Detection convention (`suffix` or `directory`).
    pub convention: Convention,
    /// Filename suffix marking question specs (used by the `suffix` convention).
    pub suffix: String,
    /// Directory name holding question specs (used by the `directory` convention).
    pub directory: String,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            convention: Convention::Suffix,
            suffix: ".qspec.md".to_owned(),
            directory: "questions".to_owned(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly given config path does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value fails a post-load check.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Reject an empty value for the named field.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load the configuration, falling back to discovery and defaults.
    ///
    /// An explicit `config_path` must exist. Without one, `qspec.toml`
    /// is searched for from the working directory upward; if no file
    /// turns up, built-in defaults apply. `cli_settings` are layered on
    /// last, after path resolution, so flags win over file values.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Layer command-line overrides onto the resolved paths.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.content_resolved.output_dir.clone_from(output_dir);
        }
    }

    /// Walk up from the working directory looking for `qspec.toml`.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Defaults anchored at the working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Defaults anchored at `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            questions: QuestionsConfig::default(),
            content_resolved: ContentConfig {
                source_dir: base.join("content"),
                output_dir: base.join("build"),
            },
            config_path: None,
        }
    }

    /// Parse, resolve, and validate one config file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Paths must be resolved before validation runs
        config.validate()?;

        Ok(config)
    }

    /// Check loaded values for consistency.
    ///
    /// Runs automatically after a file load; callers constructing a
    /// config by hand can invoke it directly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_questions()?;
        Ok(())
    }

    /// The suffix needs a dot plus an extension; the directory must
    /// be one bare path segment.
    fn validate_questions(&self) -> Result<(), ConfigError> {
        let suffix = &self.questions.suffix;
        if !suffix.starts_with('.') || suffix.len() == 1 {
            return Err(ConfigError::Validation(format!(
                "questions.suffix must start with '.' followed by an extension, got \"{suffix}\""
            )));
        }

        require_non_empty(&self.questions.directory, "questions.directory")?;
        if self.questions.directory.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "questions.directory must be a single path component".to_owned(),
            ));
        }

        Ok(())
    }

    /// Anchor the raw content paths at the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content_resolved = ContentConfig {
            source_dir: resolve(self.content.source_dir.as_deref(), "content"),
            output_dir: resolve(self.content.output_dir.as_deref(), "build"),
        };
    }
}
