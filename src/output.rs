//! # Output Module
//!
//! This module centralizes the end-of-run output for gplstrip.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! Everything here is suppressed by `--quiet`; only the final `ERROR:` line
//! survives quiet mode.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::WalkSummary;

/// Symbols used in output
pub mod symbols {
  /// Nothing to strip
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Preamble stripped
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the files that were (or would have been) changed.
///
/// Paths are shown relative to `root` and sorted. Without `-v` the list is
/// truncated after [`DEFAULT_FILE_LIST_LIMIT`] entries.
pub fn print_changed_files(summary: &WalkSummary, root: &Path, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let mut paths: Vec<String> = summary.changes().map(|r| make_relative_path(&r.path, root)).collect();
  paths.sort();
  paths.dedup();

  if paths.is_empty() {
    println!(
      "{} No matching content found.",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
    );
    return;
  }

  let count = paths.len();
  let verb = if dry_run { "Would update" } else { "Updated" };
  println!(
    "{} {} {} {}:",
    symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()),
    verb,
    count,
    if count == 1 { "file" } else { "files" }
  );

  let limit = if is_verbose() { count } else { DEFAULT_FILE_LIST_LIMIT };
  for path in paths.iter().take(limit) {
    println!("  {}", path);
  }

  if count > limit {
    println!(
      "  {} ... and {} more (use -v to see all)",
      "".if_supports_color(Stream::Stdout, |s| s.dimmed()),
      count - limit
    );
  }
}

/// Print the processing summary.
///
/// Format: "Summary: X files scanned, Y matched, Z updated"
pub fn print_summary(summary: &WalkSummary, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let changed = summary.changed_file_count();
  let changed_str = if changed > 0 {
    changed.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string()
  } else {
    changed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  println!(
    "Summary: {} files scanned, {} matched, {} {}",
    summary.files_seen.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.files_matched.if_supports_color(Stream::Stdout, |s| s.cyan()),
    changed_str,
    if dry_run { "would be updated" } else { "updated" }
  );
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Make a path relative to the scanned root for display.
fn make_relative_path(path: &Path, root: &Path) -> String {
  path
    .strip_prefix(root)
    .map(|p| p.to_string_lossy().to_string())
    .unwrap_or_else(|_| path.to_string_lossy().to_string())
}
