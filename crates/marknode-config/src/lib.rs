//! Configuration management for marknode.
//!
//! Parses `marknode.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! format = "markdown"
//!
//! [options]
//! breaks = true
//! smartLists = false
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].

mod format;
mod options;

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use format::Format;
pub use options::{OptionOverrides, RenderOptions};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "marknode.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only set values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override input format.
    pub format: Option<Format>,
    /// Option overrides layered over the file's `[options]` table.
    pub options: OptionOverrides,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input format.
    pub format: Format,
    /// Option overrides merged over [`RenderOptions::default`].
    pub options: OptionOverrides,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Option key that no renderer understands.
    #[error("Unknown option: {0}")]
    UnknownOption(String),
    /// Option value that is not a boolean.
    #[error("Invalid value for {key}: `{value}` (expected true or false)")]
    InvalidValue {
        /// Option key as written.
        key: String,
        /// Rejected value.
        value: String,
    },
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration, then layer CLI settings on top.
    ///
    /// An explicit `config_path` must exist. Without one, the nearest
    /// `marknode.toml` in the current directory or its ancestors is used,
    /// falling back to defaults when there is none.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let source = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_from(&cwd)),
        };

        let mut config = match source {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        Ok(config)
    }

    /// Effective rendering options: defaults with the configured overrides applied.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::merged(&self.options)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        self.format = settings.format.unwrap_or(self.format);
        self.options.extend(&settings.options);
    }

    /// Nearest config file in `dir` or its ancestors.
    fn discover_from(dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .map(|ancestor| ancestor.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(Self {
            config_path: Some(path),
            ..config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.format, Format::Markdown);
        assert_eq!(config.options, OptionOverrides::default());
        assert_eq!(config.render_options(), RenderOptions::default());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.format, Format::Markdown);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
format = "plain"

[options]
gfm = false
breaks = true
smartLists = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.format, Format::Plain);
        let options = config.render_options();
        assert!(!options.gfm);
        assert!(options.breaks);
        assert!(!options.smart_lists);
        assert!(!options.sanitize);
    }

    #[test]
    fn test_parse_unknown_format_is_markdown() {
        let config: Config = toml::from_str(r#"format = "html""#).unwrap();
        assert_eq!(config.format, Format::Markdown);
    }

    #[test]
    fn test_parse_invalid_option_type() {
        let result: Result<Config, _> = toml::from_str("[options]\ngfm = \"yes\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[options]\nsanitize = true\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert!(config.render_options().sanitize);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "format = [").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_apply_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marknode.toml");
        std::fs::write(&path, "format = \"plain\"\n[options]\nbreaks = true\ngfm = false\n")
            .unwrap();

        let mut options = OptionOverrides::default();
        options.set("gfm", "true").unwrap();
        let settings = CliSettings {
            format: Some(Format::Markdown),
            options,
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.format, Format::Markdown);
        let options = config.render_options();
        assert!(options.gfm);
        assert!(options.breaks);
    }

    #[test]
    fn test_discover_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs").join("guide");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "format = \"plain\"\n").unwrap();

        assert_eq!(
            Config::discover_from(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.format, Format::Markdown);
        assert_eq!(config.options, OptionOverrides::default());
    }
}
