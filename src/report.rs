//! # Report Module
//!
//! This module records what a run did to each file it processed and can
//! write that record as JSON for auditing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Possible outcomes for one (file, rule set) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileAction {
  /// The file was rewritten
  Updated,
  /// The file would have been rewritten, but this is a dry run
  WouldUpdate,
  /// The rule set matched the file name but changed nothing
  Unchanged,
}

/// Information about a processed file for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// File pattern of the rule set that was applied
  pub pattern: String,
  /// What happened to the file
  pub action: FileAction,
}

impl FileReport {
  pub const fn is_change(&self) -> bool {
    matches!(self.action, FileAction::Updated | FileAction::WouldUpdate)
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Aggregated result of walking a directory tree.
///
/// Each subtree produces its own summary; a parent merges the summaries of
/// its children with [`WalkSummary::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkSummary {
  /// Number of directories listed (including the root)
  pub dirs_visited: usize,
  /// Number of regular files encountered
  pub files_seen: usize,
  /// Number of files matched by at least one rule set
  pub files_matched: usize,
  /// One entry per applied (file, rule set) pair, in processing order
  pub reports: Vec<FileReport>,
}

impl WalkSummary {
  /// Folds a child summary into this one.
  pub fn merge(&mut self, other: WalkSummary) {
    self.dirs_visited += other.dirs_visited;
    self.files_seen += other.files_seen;
    self.files_matched += other.files_matched;
    self.reports.extend(other.reports);
  }

  /// Reports for files that were (or would have been) changed.
  pub fn changes(&self) -> impl Iterator<Item = &FileReport> {
    self.reports.iter().filter(|r| r.is_change())
  }

  /// Number of distinct files that were (or would have been) changed.
  pub fn changed_file_count(&self) -> usize {
    let mut paths: Vec<&Path> = self.changes().map(|r| r.path.as_path()).collect();
    paths.sort();
    paths.dedup();
    paths.len()
  }
}

/// The JSON document written by `--report-json`.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
  generated_at: String,
  root: String,
  dry_run: bool,
  #[serde(flatten)]
  summary: &'a WalkSummary,
}

/// Writes `summary` as pretty-printed JSON to `output_path`.
pub fn write_json_report(output_path: &Path, root: &Path, dry_run: bool, summary: &WalkSummary) -> Result<()> {
  let report = JsonReport {
    generated_at: Local::now().to_rfc3339(),
    root: root.to_string_lossy().into_owned(),
    dry_run,
    summary,
  };

  let json = serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")?;
  fs::write(output_path, json)
    .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;
  Ok(())
}
