//! # Diff Module
//!
//! Renders the changes a dry run would make, so they can be reviewed before
//! the preamble is actually stripped.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use similar::{ChangeTag, TextDiff};

use crate::processor::file_io::join_lines;

/// Where dry-run diffs go.
#[derive(Debug, Default, Clone)]
pub struct DiffManager {
  /// Print diffs to stderr
  pub show_diff: bool,

  /// Append diffs to this file
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether any diff output is requested at all.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so diffs from a previous run are not mixed in.
  pub fn init(&self) -> Result<()> {
    if let Some(ref path) = self.save_diff_path {
      std::fs::write(path, "").with_context(|| format!("Failed to create diff file: {}", path.display()))?;
    }
    Ok(())
  }

  /// Renders the diff between `original` and `updated` for `path`.
  ///
  /// The diff is printed to stderr when `show_diff` is set and appended to
  /// the diff file when one is configured.
  pub fn display_diff(&self, path: &Path, original: &[String], updated: &[String]) -> Result<()> {
    let diff_content = render_diff(path, original, updated);

    if self.show_diff {
      eprint!("{diff_content}");
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      file
        .write_all(diff_content.as_bytes())
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}

/// Formats a simple line diff headed by the file path.
pub fn render_diff(path: &Path, original: &[String], updated: &[String]) -> String {
  let old = join_lines(original);
  let new = join_lines(updated);
  let diff = TextDiff::from_lines(old.as_str(), new.as_str());

  let mut out = format!("Diff for {}:\n", path.display());
  for change in diff.iter_all_changes() {
    let sign = match change.tag() {
      ChangeTag::Delete => "-",
      ChangeTag::Insert => "+",
      ChangeTag::Equal => " ",
    };
    out.push_str(sign);
    out.push_str(change.value());
  }
  out.push('\n');
  out
}
