//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `S2E_PROJECT__<SECTION>__<KEY>`
//! 3. Config file (`--config`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::GlobalArgs;
use crate::error::{CliError, CliResult};

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "S2E_PROJECT";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the S2E environment lives.
    pub paths: PathsConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// S2E environment directory; `--env-dir` / `S2EDIR` take precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// One of `auto`, `human`, `plain`, `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory whose templates shadow the built-in ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  Without it the default location is read if present.
    pub fn load(config_file: Option<&Path>) -> CliResult<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "loading configuration");

        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(config_error)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.s2e-project.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "s2e", "s2e-project")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".s2e-project.toml"))
    }

    /// The file the current invocation reads: `--config` if given.
    pub fn active_path(args: &GlobalArgs) -> PathBuf {
        args.config.clone().unwrap_or_else(Self::config_path)
    }

    /// Value of a dotted key, formatted for display.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "paths.env_dir" => display_path(self.paths.env_dir.as_deref()),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            "templates.local_path" => display_path(self.templates.local_path.as_deref()),
            _ => return None,
        };
        Some(value)
    }

    /// Resolve the S2E environment directory.
    ///
    /// `--env-dir` / `S2EDIR` win over `paths.env_dir`, which wins over the
    /// current directory.
    pub fn env_dir(&self, args: &GlobalArgs) -> CliResult<PathBuf> {
        if let Some(dir) = args.env_dir.as_ref().or(self.paths.env_dir.as_ref()) {
            return Ok(dir.clone());
        }
        std::env::current_dir().map_err(|e| CliError::IoError {
            message: "Failed to determine the current directory".into(),
            source: e,
        })
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

fn config_error(err: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: err.to_string(),
        source: Some(Box::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    fn args(env_dir: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            env_dir: env_dir.map(PathBuf::from),
            output_format: OutputFormat::Auto,
        }
    }

    #[test]
    fn default_format_is_auto() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.output.format, "auto");
        assert!(!cfg.output.no_color);
        assert!(cfg.paths.env_dir.is_none());
    }

    #[test]
    fn load_reads_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[paths]\nenv_dir = \"/opt/s2e\"\n\n[output]\nno_color = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.paths.env_dir, Some(PathBuf::from("/opt/s2e")));
        assert!(cfg.output.no_color);
        // Untouched keys keep their defaults
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[paths\nenv_dir = ").unwrap();
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let mut cfg = AppConfig::default();
        cfg.templates.local_path = Some(PathBuf::from("/tpl"));
        assert_eq!(cfg.get("templates.local_path").as_deref(), Some("/tpl"));
        assert_eq!(cfg.get("paths.env_dir").as_deref(), Some(""));
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert!(cfg.get("defaults.language").is_none());
    }

    #[test]
    fn env_dir_precedence() {
        let mut cfg = AppConfig::default();
        cfg.paths.env_dir = Some(PathBuf::from("/from/config"));

        assert_eq!(
            cfg.env_dir(&args(Some("/from/flag"))).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(cfg.env_dir(&args(None)).unwrap(), PathBuf::from("/from/config"));

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(AppConfig::default().env_dir(&args(None)).unwrap(), cwd);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
