//! # gplstrip
//!
//! Strips GPL license preambles from source files using regex pattern files.

use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use gplstrip::cli::{Cli, run_strip};

/// Exit code for invalid command-line arguments.
const EXIT_USAGE: i32 = 1;

/// Exit code for any failure while loading patterns or processing files.
const EXIT_FAILURE: i32 = 2;

fn main() {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) => {
      let code = match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_USAGE,
      };
      let _ = e.print();
      process::exit(code);
    }
  };

  if let Err(e) = run_strip(cli.strip_args) {
    tracing::debug!("{e:?}");
    eprintln!("ERROR: {e}");
    process::exit(EXIT_FAILURE);
  }
}
