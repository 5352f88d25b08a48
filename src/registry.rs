//! # Registry Module
//!
//! The [`RuleRegistry`] holds every [`RuleSet`] active for a run. It is built
//! once, from the built-in defaults (when enabled) followed by user-supplied
//! pattern files, and is read-only afterwards.
//!
//! Rule sets are keyed by their file pattern string. Loading a second source
//! with an identical pattern replaces the earlier rule set in place.
//!
//! ## Example
//!
//! ```rust
//! use gplstrip::registry::{RuleRegistry, RuleSource};
//!
//! # fn main() -> Result<(), gplstrip::registry::RegistryError> {
//! let custom = RuleSource::new("custom.props", "filepattern=.*\\\\.txt\nnumpatterns=0\n");
//! let registry = RuleRegistry::build(true, &[custom])?;
//!
//! assert_eq!(registry.rules_for("notes.txt").count(), 1);
//! assert_eq!(registry.rules_for("Main.java").count(), 1);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::rules::{RuleError, RuleSet};
use crate::verbose_log;

/// Built-in rule sources, loaded in this order when defaults are enabled.
pub const DEFAULT_SOURCES: [(&str, &str); 2] = [
  ("c_family.props", include_str!("../patterns/c_family.props")),
  ("python.props", include_str!("../patterns/python.props")),
];

/// Where a rule source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
  /// Bundled with the tool
  Default,
  /// Supplied by the user
  External,
}

/// The text of one pattern definition together with a name for error
/// reporting.
#[derive(Debug, Clone)]
pub struct RuleSource {
  pub name: String,
  pub text: String,
  pub kind: SourceKind,
}

impl RuleSource {
  /// Creates a user-supplied rule source from in-memory text.
  pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      text: text.into(),
      kind: SourceKind::External,
    }
  }

  /// Reads a user-supplied pattern file.
  ///
  /// # Errors
  ///
  /// Returns [`RegistryError::Read`] if the file cannot be read as UTF-8
  /// text.
  pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
    let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Self::new(path.display().to_string(), text))
  }

  fn builtin(name: &str, text: &str) -> Self {
    Self {
      name: name.to_string(),
      text: text.to_string(),
      kind: SourceKind::Default,
    }
  }

  /// The built-in rule sources, in load order.
  pub fn defaults() -> Vec<Self> {
    DEFAULT_SOURCES
      .iter()
      .map(|(name, text)| Self::builtin(name, text))
      .collect()
  }
}

/// Error type for building a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
  /// A pattern file could not be read.
  #[error("Failed to load pattern file '{}': {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A rule source failed validation.
  #[error("Failed to load {kind} '{name}': {source}")]
  Invalid {
    kind: SourceKind,
    name: String,
    #[source]
    source: RuleError,
  },
}

impl fmt::Display for SourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SourceKind::Default => write!(f, "default pattern"),
      SourceKind::External => write!(f, "pattern file"),
    }
  }
}

/// The collection of rule sets active for a run.
#[derive(Debug, Default, Clone)]
pub struct RuleRegistry {
  /// Rule sets in insertion order; file patterns are unique
  entries: Vec<RuleSet>,
}

impl RuleRegistry {
  /// Creates an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a registry from the built-in defaults (if `use_defaults`)
  /// followed by `user_sources`, in order.
  ///
  /// # Errors
  ///
  /// Stops at the first source that fails to load; no rule set from a later
  /// source is loaded.
  pub fn build(use_defaults: bool, user_sources: &[RuleSource]) -> Result<Self, RegistryError> {
    let defaults = if use_defaults { RuleSource::defaults() } else { Vec::new() };

    let mut registry = Self::new();
    for source in defaults.iter().chain(user_sources) {
      match source.kind {
        SourceKind::Default => verbose_log!("Loading default pattern: {}", source.name),
        SourceKind::External => verbose_log!("Loading pattern file: {}", source.name),
      }
      registry.load(source)?;
    }

    debug!("Registry holds {} rule sets", registry.len());
    Ok(registry)
  }

  /// Builds a registry from the built-in defaults (if `use_defaults`)
  /// followed by the pattern files at `paths`.
  ///
  /// # Errors
  ///
  /// Each file is read and loaded before the next one is opened, so the
  /// error always names the first file that is unreadable or invalid.
  pub fn build_from_files(use_defaults: bool, paths: &[PathBuf]) -> Result<Self, RegistryError> {
    let mut registry = Self::build(use_defaults, &[])?;
    for path in paths {
      verbose_log!("Loading pattern file: {}", path.display());
      registry.load(&RuleSource::from_file(path)?)?;
    }

    debug!("Registry holds {} rule sets", registry.len());
    Ok(registry)
  }

  /// Parses `source` and inserts the resulting rule set.
  pub fn load(&mut self, source: &RuleSource) -> Result<(), RegistryError> {
    let rules = RuleSet::parse(&source.text).map_err(|e| RegistryError::Invalid {
      kind: source.kind,
      name: source.name.clone(),
      source: e,
    })?;
    self.insert(rules);
    Ok(())
  }

  /// Inserts a rule set, replacing any existing one with the same file
  /// pattern. A replaced rule set keeps its original position.
  pub fn insert(&mut self, rules: RuleSet) {
    match self
      .entries
      .iter_mut()
      .find(|existing| existing.file_pattern() == rules.file_pattern())
    {
      Some(existing) => {
        debug!("Replacing rule set for pattern: {}", rules.file_pattern());
        *existing = rules;
      }
      None => self.entries.push(rules),
    }
  }

  /// Returns the rule sets whose file pattern matches the whole of
  /// `file_name`, in insertion order.
  pub fn rules_for<'a>(&'a self, file_name: &'a str) -> impl Iterator<Item = &'a RuleSet> + 'a {
    self.entries.iter().filter(move |rules| rules.matches_file_name(file_name))
  }

  /// Looks up a rule set by its file pattern string.
  pub fn get(&self, file_pattern: &str) -> Option<&RuleSet> {
    self.entries.iter().find(|rules| rules.file_pattern() == file_pattern)
  }

  pub fn iter(&self) -> impl Iterator<Item = &RuleSet> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn source(name: &str, pattern: &str, find: &str) -> RuleSource {
    RuleSource::new(
      name,
      format!("filepattern={pattern}\nnumpatterns=1\nfind1={find}\nreplace1=\n"),
    )
  }

  #[test]
  fn test_defaults_load() {
    let registry = RuleRegistry::build(true, &[]).unwrap();
    assert_eq!(registry.len(), DEFAULT_SOURCES.len());
    assert_eq!(registry.rules_for("Main.java").count(), 1);
    assert_eq!(registry.rules_for("lexer.jflex").count(), 1);
    assert_eq!(registry.rules_for("setup.py").count(), 1);
    assert_eq!(registry.rules_for("README.md").count(), 0);
  }

  #[test]
  fn test_defaults_disabled() {
    let registry = RuleRegistry::build(false, &[]).unwrap();
    assert!(registry.is_empty());
  }

  #[test]
  fn test_user_sources_after_defaults() {
    let registry = RuleRegistry::build(true, &[source("txt", r".*\\.txt", "GPL")]).unwrap();
    assert_eq!(registry.len(), 3);
    let patterns: Vec<_> = registry.iter().map(RuleSet::file_pattern).collect();
    assert_eq!(patterns[2], r".*\.txt");
  }

  #[test]
  fn test_same_pattern_last_write_wins() {
    let first = source("first", "A", "one");
    let second = source("second", "B", "two");
    let third = source("third", "A", "three");
    let registry = RuleRegistry::build(false, &[first, second, third]).unwrap();

    assert_eq!(registry.len(), 2);
    let a = registry.get("A").unwrap();
    assert_eq!(a.replacements()[0].find.as_str(), "three");
    // The replacement keeps the slot of the rule set it replaced
    let patterns: Vec<_> = registry.iter().map(RuleSet::file_pattern).collect();
    assert_eq!(patterns, vec!["A", "B"]);
  }

  #[test]
  fn test_fail_fast_names_offending_source() {
    let good = source("good.props", "G", "g");
    let bad = RuleSource::new("bad.props", "numpatterns=1\n");
    let never = source("never.props", "N", "n");

    let err = RuleRegistry::build(false, &[good, bad, never]).unwrap_err();
    assert_eq!(
      err.to_string(),
      "Failed to load pattern file 'bad.props': Missing key: filepattern"
    );
  }

  #[test]
  fn test_build_from_files_stops_at_first_bad_file() {
    let temp_dir = tempfile::TempDir::new().expect("create temp dir");
    let good = temp_dir.path().join("good.props");
    let bad = temp_dir.path().join("bad.props");
    let missing = temp_dir.path().join("missing.props");
    std::fs::write(&good, "filepattern=G\nnumpatterns=0\n").expect("write good");
    std::fs::write(&bad, "numpatterns=0\n").expect("write bad");

    let err = RuleRegistry::build_from_files(false, &[good.clone(), bad.clone(), missing]).unwrap_err();
    assert!(matches!(err, RegistryError::Invalid { .. }));
    assert_eq!(
      err.to_string(),
      format!("Failed to load pattern file '{}': Missing key: filepattern", bad.display())
    );

    let registry = RuleRegistry::build_from_files(true, &[good]).unwrap();
    assert_eq!(registry.len(), DEFAULT_SOURCES.len() + 1);
  }

  #[test]
  fn test_rules_for_uses_full_match() {
    let registry = RuleRegistry::build(false, &[source("t", r"Test\\.java", "x")]).unwrap();
    assert_eq!(registry.rules_for("Test.java").count(), 1);
    assert_eq!(registry.rules_for("XTest.java").count(), 0);
    assert_eq!(registry.rules_for("Test.javax").count(), 0);
  }

  #[test]
  fn test_rules_for_keeps_insertion_order() {
    let registry =
      RuleRegistry::build(false, &[source("b", r"b.*", "x"), source("any", r".*", "y")]).unwrap();
    let matched: Vec<_> = registry.rules_for("build.rs").map(RuleSet::file_pattern).collect();
    assert_eq!(matched, vec!["b.*", ".*"]);
  }

  #[test]
  fn test_missing_pattern_file() {
    let err = RuleSource::from_file(Path::new("/definitely/not/here.props")).unwrap_err();
    assert!(matches!(err, RegistryError::Read { .. }));
    assert!(err.to_string().starts_with("Failed to load pattern file '/definitely/not/here.props'"));
  }
}
