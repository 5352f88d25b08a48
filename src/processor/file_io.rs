//! # File I/O Module
//!
//! This module provides the file-system primitives the tree walker needs:
//! listing a directory, reading a file as lines and rewriting a file from
//! lines. They sit behind the [`FileSystem`] trait so the walker can run
//! against the real disk ([`DiskFileSystem`]) or an in-memory tree
//! ([`MemoryFileSystem`]).

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// What kind of object a directory entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
  File,
  Dir,
  /// Symlinked directories, dangling symlinks, sockets and anything else the
  /// walker does not touch
  Other,
}

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
  /// Full path of the entry
  pub path: PathBuf,
  /// Bare file name, without any directory component
  pub name: String,
  pub kind: EntryKind,
}

/// File-system operations used by the tree walker.
pub trait FileSystem {
  /// Lists the immediate entries of `dir`, excluding `.` and `..`.
  fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>>;

  /// Reads a whole file as lines.
  ///
  /// Lines are split on `\n` or `\r\n`; a trailing newline does not produce
  /// an empty last line.
  fn read_lines(&self, path: &Path) -> io::Result<Vec<String>>;

  /// Truncates `path` and writes every line followed by `\n`.
  fn write_lines(&self, path: &Path, lines: &[String]) -> io::Result<()>;
}

/// Splits text into lines the way [`FileSystem::read_lines`] describes.
pub fn split_lines(content: &str) -> Vec<String> {
  content.lines().map(str::to_string).collect()
}

/// Joins lines back into file content, terminating each line with `\n`.
pub fn join_lines(lines: &[String]) -> String {
  let capacity = lines.iter().map(|l| l.len() + 1).sum();
  lines.iter().fold(String::with_capacity(capacity), |mut out, line| {
    out.push_str(line);
    out.push('\n');
    out
  })
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
  fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
      let Ok(entry) = entry else {
        continue;
      };

      // Prefer cached dirent file type to avoid extra syscalls where possible.
      // A symlink counts as a file when its target is a regular file;
      // symlinked directories are never entered.
      let kind = match entry.file_type() {
        Ok(t) if t.is_dir() => EntryKind::Dir,
        Ok(t) if t.is_file() => EntryKind::File,
        Ok(t) if t.is_symlink() => match std::fs::metadata(entry.path()) {
          Ok(target) if target.is_file() => EntryKind::File,
          _ => EntryKind::Other,
        },
        _ => EntryKind::Other,
      };

      entries.push(DirEntry {
        path: entry.path(),
        name: entry.file_name().to_string_lossy().into_owned(),
        kind,
      });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
  }

  fn read_lines(&self, path: &Path) -> io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(split_lines(&content))
  }

  fn write_lines(&self, path: &Path, lines: &[String]) -> io::Result<()> {
    std::fs::write(path, join_lines(lines))
  }
}

/// In-memory [`FileSystem`] for tests and dry experiments.
///
/// Directories are created implicitly for every ancestor of an added file.
/// Individual paths can be marked to fail on listing, reading or writing.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
  files: RefCell<BTreeMap<PathBuf, Vec<String>>>,
  dirs: BTreeSet<PathBuf>,
  unlistable: BTreeSet<PathBuf>,
  unreadable: BTreeSet<PathBuf>,
  unwritable: BTreeSet<PathBuf>,
  writes: RefCell<Vec<PathBuf>>,
}

impl MemoryFileSystem {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a file with the given content, creating its parent directories.
  pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
    let path = path.as_ref();
    self.add_ancestors(path);
    self.files.get_mut().insert(path.to_path_buf(), split_lines(content));
    self
  }

  /// Adds an empty directory.
  pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    self.add_ancestors(path);
    self.dirs.insert(path.to_path_buf());
    self
  }

  /// Makes listing `dir` fail with a permission error.
  pub fn deny_listing(mut self, dir: impl AsRef<Path>) -> Self {
    self.unlistable.insert(dir.as_ref().to_path_buf());
    self
  }

  /// Makes reading `path` fail with a permission error.
  pub fn deny_reading(mut self, path: impl AsRef<Path>) -> Self {
    self.unreadable.insert(path.as_ref().to_path_buf());
    self
  }

  /// Makes writing `path` fail with a permission error.
  pub fn deny_writing(mut self, path: impl AsRef<Path>) -> Self {
    self.unwritable.insert(path.as_ref().to_path_buf());
    self
  }

  /// Current lines of a file, if it exists.
  pub fn lines(&self, path: impl AsRef<Path>) -> Option<Vec<String>> {
    self.files.borrow().get(path.as_ref()).cloned()
  }

  /// Paths written so far, in write order.
  pub fn writes(&self) -> Vec<PathBuf> {
    self.writes.borrow().clone()
  }

  fn add_ancestors(&mut self, path: &Path) {
    for ancestor in path.ancestors().skip(1) {
      if ancestor.as_os_str().is_empty() {
        break;
      }
      self.dirs.insert(ancestor.to_path_buf());
    }
  }
}

fn permission_denied(path: &Path) -> io::Error {
  io::Error::new(
    io::ErrorKind::PermissionDenied,
    format!("permission denied: {}", path.display()),
  )
}

impl FileSystem for MemoryFileSystem {
  fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
    if self.unlistable.contains(dir) {
      return Err(permission_denied(dir));
    }
    if !self.dirs.contains(dir) {
      return Err(io::Error::new(io::ErrorKind::NotFound, format!("no such directory: {}", dir.display())));
    }

    let entry = |path: &PathBuf, kind| DirEntry {
      path: path.clone(),
      name: path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default(),
      kind,
    };

    let files = self.files.borrow();
    let mut entries: Vec<DirEntry> = self
      .dirs
      .iter()
      .filter(|d| d.parent() == Some(dir))
      .map(|d| entry(d, EntryKind::Dir))
      .collect();
    entries.extend(
      files
        .keys()
        .filter(|f| f.parent() == Some(dir))
        .map(|f| entry(f, EntryKind::File)),
    );
    Ok(entries)
  }

  fn read_lines(&self, path: &Path) -> io::Result<Vec<String>> {
    if self.unreadable.contains(path) {
      return Err(permission_denied(path));
    }
    self
      .files
      .borrow()
      .get(path)
      .cloned()
      .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path.display())))
  }

  fn write_lines(&self, path: &Path, lines: &[String]) -> io::Result<()> {
    if self.unwritable.contains(path) {
      return Err(permission_denied(path));
    }
    self.files.borrow_mut().insert(path.to_path_buf(), lines.to_vec());
    self.writes.borrow_mut().push(path.to_path_buf());
    Ok(())
  }
}
