//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing.

mod strip;

use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
pub use strip::{StripArgs, run_strip};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  name = "gplstrip",
  author,
  version,
  about = "Strips GPL license preambles from source files using regex pattern files",
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Preview what would be stripped, with diffs
  gplstrip --dir src --recursive --dry-run --show-diff

  # Strip preambles in place using the built-in patterns
  gplstrip --dir src -r

  # Use only a custom pattern file
  gplstrip --dir src -r --no-default-patterns --pattern-file java.props

  # Save a JSON record of every processed file
  gplstrip --dir src -r --report-json strip-report.json
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub strip_args: StripArgs,
}
