//! # gplstrip
//!
//! A tool that strips GPL license preambles from source files by applying
//! regex find/replace pattern files to every matching file in a directory
//! tree.
//!
//! A pattern file is a Java-properties document naming a file-name regex and
//! an ordered list of line substitutions:
//!
//! ```properties
//! filepattern=.*\\.java
//! numpatterns=1
//! find1=^\\s*\\*\\s*This program is free software.*$
//! replace1=
//! ```
//!
//! Two pattern files (C-family block comments and `#` comments) are built in
//! and loaded first unless disabled.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use gplstrip::processor::{DiskFileSystem, TreeWalker, WalkOptions};
//! use gplstrip::registry::{RuleRegistry, RuleSource};
//!
//! fn main() -> anyhow::Result<()> {
//!   let custom = RuleSource::from_file(Path::new("java.props"))?;
//!   let registry = RuleRegistry::build(true, &[custom])?;
//!
//!   let options = WalkOptions {
//!     recursive: true,
//!     ..WalkOptions::default()
//!   };
//!   let summary = TreeWalker::new(&DiskFileSystem, &registry, options).run(Path::new("src"))?;
//!
//!   println!("Stripped {} files", summary.changed_file_count());
//!   Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`rules`] - Pattern file parsing and validation
//! * [`registry`] - The ordered set of rule sets active for a run
//! * [`processor`] - Content transformation and directory traversal
//! * [`report`] - Per-file outcomes and JSON reports
//! * [`logging`] - Logging utilities for verbose output

pub mod cli;
pub mod config;
pub mod diff;
pub mod logging;
pub mod output;
pub mod processor;
pub mod registry;
pub mod report;
pub mod rules;
