//! # Content Transformer Module
//!
//! This module applies the find/replace pairs of a [`RuleSet`] to file
//! content held in memory as lines.

use std::borrow::Cow;

use crate::rules::RuleSet;

/// Outcome of transforming one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
  /// Content after every replacement pair has been applied
  pub lines: Vec<String>,
  /// Whether any line differs from the original
  pub changed: bool,
}

/// Applies rule sets to file content.
///
/// Pairs are applied in ascending index order and compose: the output of
/// pair `i` is the input of pair `i + 1`. Every pair replaces every match on
/// every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTransformer;

impl FileTransformer {
  pub const fn new() -> Self {
    Self
  }

  /// Applies all replacement pairs of `rules` to `lines`.
  ///
  /// Replacement templates may use capture group references (`$1`,
  /// `${name}`) as understood by the `regex` crate.
  pub fn apply(&self, lines: &[String], rules: &RuleSet) -> Transformed {
    let mut current: Vec<Cow<'_, str>> = lines.iter().map(|l| Cow::Borrowed(l.as_str())).collect();

    for pair in rules.replacements() {
      for line in &mut current {
        // replace_all only allocates when something matched
        let replaced = match pair.find.replace_all(line.as_ref(), pair.replace.as_str()) {
          Cow::Owned(replaced) => Some(replaced),
          Cow::Borrowed(_) => None,
        };
        if let Some(replaced) = replaced {
          *line = Cow::Owned(replaced);
        }
      }
    }

    let changed = current.iter().zip(lines).any(|(new, old)| new.as_ref() != old.as_str());
    let lines = current.into_iter().map(Cow::into_owned).collect();

    Transformed { lines, changed }
  }
}
