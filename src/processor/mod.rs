//! # Processor Module
//!
//! This module contains the core functionality for stripping content from
//! files: applying rule sets to file content and walking directory trees.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File-system primitives behind the [`FileSystem`] trait
//! - [`content_transformer`] - Applies a rule set's find/replace pairs to lines
//! - [`tree_walker`] - Depth-first traversal that selects rule sets per file and persists changes
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use gplstrip::processor::{DiskFileSystem, TreeWalker, WalkOptions};
//! use gplstrip::registry::RuleRegistry;
//!
//! fn main() -> anyhow::Result<()> {
//!   let registry = RuleRegistry::build(true, &[])?;
//!   let options = WalkOptions {
//!     recursive: true,
//!     dry_run: true,
//!     ..WalkOptions::default()
//!   };
//!
//!   let summary = TreeWalker::new(&DiskFileSystem, &registry, options).run(Path::new("src"))?;
//!   println!("{} files would change", summary.changed_file_count());
//!   Ok(())
//! }
//! ```

pub mod content_transformer;
pub mod file_io;
pub mod tree_walker;

pub use content_transformer::{FileTransformer, Transformed};
pub use file_io::{DirEntry, DiskFileSystem, EntryKind, FileSystem, MemoryFileSystem};
pub use tree_walker::{OverlapPolicy, TreeWalker, WalkError, WalkOptions};
