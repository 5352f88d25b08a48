//! # Tree Walker Module
//!
//! This module walks a directory tree depth-first, applies the matching rule
//! sets to every file and decides whether to persist the result.
//!
//! The walk is fail-fast: the first read or write error aborts the whole
//! traversal. Directories that cannot be listed are treated as empty.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, trace, warn};

use super::content_transformer::FileTransformer;
use super::file_io::{DirEntry, EntryKind, FileSystem};
use crate::diff::DiffManager;
use crate::logging::is_quiet;
use crate::registry::RuleRegistry;
use crate::report::{FileAction, FileReport, WalkSummary};
use crate::rules::RuleSet;

/// What to do when more than one rule set matches a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
  /// Apply every matching rule set, in registry order
  #[default]
  ApplyAll,
  /// Apply only the first matching rule set
  FirstMatch,
}

/// Behavior flags for a walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
  /// Descend into subdirectories
  pub recursive: bool,
  /// Compute and report changes without writing them
  pub dry_run: bool,
  /// Print progress lines
  pub verbose: bool,
  pub overlap: OverlapPolicy,
}

/// Error type for a walk. Only file I/O can fail.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
  /// A matched file could not be read.
  #[error("Failed to load file: {}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Updated content could not be written back.
  #[error("Failed to write content to '{}': {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Walks a directory tree and strips matching content from its files.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
///
/// use gplstrip::processor::{MemoryFileSystem, TreeWalker, WalkOptions};
/// use gplstrip::registry::RuleRegistry;
///
/// let fs = MemoryFileSystem::new().with_file("/src/tool.py", "# This program is free software; you can redistribute it and/or modify\nprint(1)\n");
/// let registry = RuleRegistry::build(true, &[]).unwrap();
///
/// let walker = TreeWalker::new(&fs, &registry, WalkOptions::default());
/// let summary = walker.run(Path::new("/src")).unwrap();
///
/// assert_eq!(summary.changed_file_count(), 1);
/// assert_eq!(fs.lines("/src/tool.py").unwrap(), vec!["", "print(1)"]);
/// ```
pub struct TreeWalker<'a, F: FileSystem> {
  fs: &'a F,
  registry: &'a RuleRegistry,
  options: WalkOptions,
  transformer: FileTransformer,
  diff_manager: Option<&'a DiffManager>,
}

impl<'a, F: FileSystem> TreeWalker<'a, F> {
  pub const fn new(fs: &'a F, registry: &'a RuleRegistry, options: WalkOptions) -> Self {
    Self {
      fs,
      registry,
      options,
      transformer: FileTransformer::new(),
      diff_manager: None,
    }
  }

  /// Renders would-be changes through `diff_manager` during dry runs.
  pub fn with_diff_manager(mut self, diff_manager: &'a DiffManager) -> Self {
    self.diff_manager = Some(diff_manager);
    self
  }

  /// Processes every file under `root`.
  ///
  /// # Errors
  ///
  /// Returns the first [`WalkError`] encountered; nothing after it is
  /// processed.
  pub fn run(&self, root: &Path) -> Result<WalkSummary, WalkError> {
    let start_time = std::time::Instant::now();
    let summary = self.walk_dir(root)?;
    debug!(
      "Walked {} directories and {} files in {}ms",
      summary.dirs_visited,
      summary.files_seen,
      start_time.elapsed().as_millis()
    );
    Ok(summary)
  }

  fn walk_dir(&self, dir: &Path) -> Result<WalkSummary, WalkError> {
    self.progress(format_args!("Processing dir: {}", dir.display()));

    let mut summary = WalkSummary {
      dirs_visited: 1,
      ..WalkSummary::default()
    };

    let entries = match self.fs.list_dir(dir) {
      Ok(entries) => entries,
      Err(e) => {
        debug!("Cannot list {} ({}), treating it as empty", dir.display(), e);
        return Ok(summary);
      }
    };

    for entry in entries {
      match entry.kind {
        EntryKind::Dir if self.options.recursive => summary.merge(self.walk_dir(&entry.path)?),
        EntryKind::Dir => trace!("Skipping: {} (not recursive)", entry.path.display()),
        EntryKind::File => summary.merge(self.process_file(&entry)?),
        EntryKind::Other => trace!("Skipping: {} (not a regular file)", entry.path.display()),
      }
    }

    Ok(summary)
  }

  fn process_file(&self, entry: &DirEntry) -> Result<WalkSummary, WalkError> {
    let mut summary = WalkSummary {
      files_seen: 1,
      ..WalkSummary::default()
    };

    let matching: Vec<&RuleSet> = self.registry.rules_for(&entry.name).collect();
    let selected = match (matching.len(), self.options.overlap) {
      (0, _) => {
        trace!("Skipping: {} (no matching pattern)", entry.path.display());
        return Ok(summary);
      }
      (1, _) => &matching[..],
      (_, OverlapPolicy::ApplyAll) => {
        warn!(
          "{} matches {} patterns ({}), applying all of them in order",
          entry.path.display(),
          matching.len(),
          pattern_list(&matching)
        );
        &matching[..]
      }
      (_, OverlapPolicy::FirstMatch) => {
        warn!(
          "{} matches {} patterns ({}), applying only '{}'",
          entry.path.display(),
          matching.len(),
          pattern_list(&matching),
          matching[0].file_pattern()
        );
        &matching[..1]
      }
    };

    summary.files_matched = 1;
    let mut content = self.fs.read_lines(&entry.path).map_err(|source| WalkError::Read {
      path: entry.path.clone(),
      source,
    })?;
    for rules in selected {
      summary.reports.push(self.apply_rules(&entry.path, &mut content, rules)?);
    }
    Ok(summary)
  }

  /// Runs one rule set over the current content of a file. Successive rule
  /// sets see each other's output, in dry runs as well.
  fn apply_rules(&self, path: &Path, content: &mut Vec<String>, rules: &RuleSet) -> Result<FileReport, WalkError> {
    self.progress(format_args!(
      "Processing file '{}' using: {}",
      path.display(),
      rules.file_pattern()
    ));

    let original = std::mem::take(content);
    let transformed = self.transformer.apply(&original, rules);

    let action = if !transformed.changed {
      FileAction::Unchanged
    } else if self.options.dry_run {
      if let Some(diff_manager) = self.diff_manager.filter(|d| d.is_enabled())
        && let Err(e) = diff_manager.display_diff(path, &original, &transformed.lines)
      {
        eprintln!("Warning: Failed to display diff for {}: {}", path.display(), e);
      }
      FileAction::WouldUpdate
    } else {
      self
        .fs
        .write_lines(path, &transformed.lines)
        .map_err(|source| WalkError::Write {
          path: path.to_path_buf(),
          source,
        })?;
      FileAction::Updated
    };

    *content = transformed.lines;

    match action {
      FileAction::Updated => self.progress(format_args!(" --> updated")),
      FileAction::WouldUpdate => self.progress(format_args!(" --> updated [dry-run]")),
      FileAction::Unchanged => {}
    }

    Ok(FileReport {
      path: path.to_path_buf(),
      pattern: rules.file_pattern().to_string(),
      action,
    })
  }

  /// Progress lines share stderr with `verbose_log!`, keeping stdout for the summary.
  fn progress(&self, message: fmt::Arguments<'_>) {
    if self.options.verbose && !is_quiet() {
      eprintln!("{message}");
    }
  }
}

fn pattern_list(rules: &[&RuleSet]) -> String {
  rules.iter().map(|r| r.file_pattern()).collect::<Vec<_>>().join(", ")
}
