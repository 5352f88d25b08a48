//! # Configuration Module
//!
//! This module provides configuration file support for gplstrip, so that a
//! repository can record how its preambles are stripped (which pattern files,
//! recursion, overlap handling) instead of repeating CLI flags.
//!
//! Configuration can be specified in a `.gplstrip.toml` file in the target
//! directory, via the `GPLSTRIP_CONFIG` environment variable, or with
//! `--config`.
//!
//! ```toml
//! recursive = true
//! default-patterns = false
//! pattern-files = ["patterns/java.props", "patterns/shell.props"]
//! overlap = "first-match"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::processor::OverlapPolicy;
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".gplstrip.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "GPLSTRIP_CONFIG";

/// Main configuration struct for gplstrip.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// Process subdirectories
  #[serde(default)]
  pub recursive: bool,

  /// Load the built-in pattern files
  #[serde(default = "default_true")]
  pub default_patterns: bool,

  /// Additional pattern files, loaded after the built-in ones and before any
  /// given on the command line
  #[serde(default)]
  pub pattern_files: Vec<PathBuf>,

  /// What to do when several patterns match one file
  #[serde(default)]
  pub overlap: OverlapPolicy,
}

const fn default_true() -> bool {
  true
}

impl Default for Config {
  fn default() -> Self {
    Self {
      recursive: false,
      default_patterns: true,
      pattern_files: Vec::new(),
      overlap: OverlapPolicy::default(),
    }
  }
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A pattern file entry is unusable.
  #[error("Invalid pattern file entry '{entry}': {message}")]
  InvalidPatternFile { entry: String, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// Relative `pattern-files` entries are resolved against the directory
  /// containing the config file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = config.resolve_relative_to(base_dir);

    verbose_log!("Loaded {} pattern files from config", config.pattern_files.len());

    Ok(config)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    for entry in &self.pattern_files {
      if entry.as_os_str().is_empty() {
        return Err(ConfigError::InvalidPatternFile {
          entry: String::new(),
          message: "path cannot be empty".to_string(),
        });
      }
    }
    Ok(())
  }

  fn resolve_relative_to(mut self, base_dir: &Path) -> Self {
    self.pattern_files = self
      .pattern_files
      .into_iter()
      .map(|p| if p.is_absolute() { p } else { base_dir.join(p) })
      .collect();
    self
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `GPLSTRIP_CONFIG` environment variable
/// 3. `.gplstrip.toml` in the target directory
pub fn discover_config_path(explicit_path: Option<&Path>, target_dir: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let local_config = target_dir.join(DEFAULT_CONFIG_FILENAME);
  if local_config.exists() {
    verbose_log!("Using directory config: {}", local_config.display());
    return Some(local_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// Returns `None` when `no_config` is set or no config file exists.
pub fn load_config(explicit_path: Option<&Path>, target_dir: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, target_dir) {
    Some(path) => {
      let config = Config::load(&path)?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
