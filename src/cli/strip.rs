//! # Strip Command
//!
//! This module implements the strip command: validate the target directory,
//! load the pattern files, walk the tree and report what changed.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Result, bail};
use clap::Args;
use tracing::debug;

use crate::config::{Config, load_config};
use crate::diff::DiffManager;
use crate::info_log;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{print_blank_line, print_changed_files, print_hint, print_summary};
use crate::processor::{DiskFileSystem, OverlapPolicy, TreeWalker, WalkOptions};
use crate::registry::RuleRegistry;
use crate::report::write_json_report;

/// Arguments for the strip command
#[derive(Args, Debug, Default)]
pub struct StripArgs {
  /// Directory to process
  #[arg(long, short = 'd', value_name = "DIR", required = true)]
  pub dir: PathBuf,

  /// Process subdirectories as well
  #[arg(long, short = 'r')]
  pub recursive: bool,

  /// Do not load the built-in pattern files
  #[arg(long)]
  pub no_default_patterns: bool,

  /// Additional pattern files, applied after the built-in ones in the order
  /// given
  #[arg(long, short = 'p', value_name = "FILE", num_args = 1..)]
  pub pattern_file: Vec<PathBuf>,

  /// Report what would change without modifying any file
  #[arg(long, short = 'n')]
  pub dry_run: bool,

  /// When several patterns match a file, apply only the first one
  #[arg(long)]
  pub first_match_only: bool,

  /// Show diff of changes in dry run mode
  #[arg(long)]
  pub show_diff: bool,

  /// Save diff of changes to a file in dry run mode
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Write a JSON report of every processed file to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Path to config file (default: .gplstrip.toml in the target directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Increase verbosity (-v progress, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl StripArgs {
  /// Combines the command line with the config file. Flags only ever turn
  /// behavior on, except `--no-default-patterns` which turns it off.
  fn effective(&self, config: Option<Config>) -> Settings {
    let config = config.unwrap_or_default();

    let mut pattern_files = config.pattern_files;
    pattern_files.extend(self.pattern_file.iter().cloned());

    Settings {
      recursive: self.recursive || config.recursive,
      use_defaults: config.default_patterns && !self.no_default_patterns,
      overlap: if self.first_match_only {
        OverlapPolicy::FirstMatch
      } else {
        config.overlap
      },
      pattern_files,
    }
  }
}

/// The options a run actually uses once config and flags are merged.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
  recursive: bool,
  use_defaults: bool,
  overlap: OverlapPolicy,
  pattern_files: Vec<PathBuf>,
}

/// Checks that the target exists and is a directory.
fn validate_root(dir: &Path) -> Result<()> {
  if !dir.exists() {
    bail!("Directory does not exist: {}", dir.display());
  }
  if !dir.is_dir() {
    bail!("Not a directory: {}", dir.display());
  }
  Ok(())
}

/// Run the strip command with the given arguments
pub fn run_strip(args: StripArgs) -> Result<()> {
  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  validate_root(&args.dir)?;

  let config = load_config(args.config.as_deref(), &args.dir, args.no_config)?;
  if config.is_some() {
    debug!("Using configuration file");
  }
  let settings = args.effective(config);

  let registry = RuleRegistry::build_from_files(settings.use_defaults, &settings.pattern_files)?;
  debug!("Loaded {} patterns", registry.len());

  if registry.is_empty() {
    info_log!("No patterns loaded, nothing to do");
  }

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff.clone());
  diff_manager.init()?;
  if diff_manager.is_enabled() && !args.dry_run {
    debug!("Diffs are only rendered in dry run mode");
  }

  let options = WalkOptions {
    recursive: settings.recursive,
    dry_run: args.dry_run,
    verbose: args.verbose > 0,
    overlap: settings.overlap,
  };

  let start_time = Instant::now();
  let summary = TreeWalker::new(&DiskFileSystem, &registry, options)
    .with_diff_manager(&diff_manager)
    .run(&args.dir)?;
  debug!("Processing took {:.2}s", start_time.elapsed().as_secs_f64());

  print_blank_line();
  print_changed_files(&summary, &args.dir, args.dry_run);
  print_blank_line();
  print_summary(&summary, args.dry_run);

  if args.dry_run && summary.changed_file_count() > 0 {
    print_blank_line();
    print_hint("Run without --dry-run to strip the matched content.");
  }

  if let Some(ref output_path) = args.report_json {
    write_json_report(output_path, &args.dir, args.dry_run, &summary)?;
    info_log!("Generated JSON report at {}", output_path.display());
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_validate_root_messages() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let missing = temp_dir.path().join("missing");
    let file = temp_dir.path().join("file.txt");
    std::fs::write(&file, "").unwrap();

    assert!(validate_root(temp_dir.path()).is_ok());
    assert_eq!(
      validate_root(&missing).unwrap_err().to_string(),
      format!("Directory does not exist: {}", missing.display())
    );
    assert_eq!(
      validate_root(&file).unwrap_err().to_string(),
      format!("Not a directory: {}", file.display())
    );
  }

  #[test]
  fn test_effective_without_config() {
    let args = StripArgs {
      recursive: true,
      pattern_file: vec![PathBuf::from("cli.props")],
      ..StripArgs::default()
    };

    assert_eq!(
      args.effective(None),
      Settings {
        recursive: true,
        use_defaults: true,
        overlap: OverlapPolicy::ApplyAll,
        pattern_files: vec![PathBuf::from("cli.props")],
      }
    );
  }

  #[test]
  fn test_effective_merges_config_before_cli() {
    let args = StripArgs {
      pattern_file: vec![PathBuf::from("cli.props")],
      first_match_only: true,
      ..StripArgs::default()
    };
    let config = Config {
      recursive: true,
      default_patterns: false,
      pattern_files: vec![PathBuf::from("/cfg/config.props")],
      overlap: OverlapPolicy::ApplyAll,
    };

    let settings = args.effective(Some(config));
    assert!(settings.recursive);
    assert!(!settings.use_defaults);
    assert_eq!(settings.overlap, OverlapPolicy::FirstMatch);
    assert_eq!(
      settings.pattern_files,
      vec![PathBuf::from("/cfg/config.props"), PathBuf::from("cli.props")]
    );
  }

  #[test]
  fn test_no_default_patterns_overrides_config() {
    let args = StripArgs {
      no_default_patterns: true,
      ..StripArgs::default()
    };
    assert!(!args.effective(Some(Config::default())).use_defaults);
  }
}
