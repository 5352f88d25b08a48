//! # Rules Module
//!
//! A [`RuleSet`] is the validated, in-memory form of one pattern file: a
//! regular expression selecting the files it applies to, plus an ordered list
//! of find/replace pairs.
//!
//! Pattern files are key/value documents (see [`properties`]):
//!
//! ```text
//! filepattern=.*\\.java
//! numpatterns=2
//! find1=^ \\*   This program is free software.*$
//! replace1=
//! find2=^ \\*   GNU General Public License.*$
//! replace2=
//! ```
//!
//! ## Example
//!
//! ```rust
//! use gplstrip::rules::RuleSet;
//!
//! let rules = RuleSet::parse("filepattern=Test\\\\.java\nnumpatterns=0\n").unwrap();
//! assert!(rules.matches_file_name("Test.java"));
//! assert!(!rules.matches_file_name("XTest.java"));
//! ```

pub mod properties;

use regex::Regex;

pub use properties::Properties;

/// Key holding the file-name regular expression.
pub const KEY_FILEPATTERN: &str = "filepattern";

/// Key holding the number of find/replace pairs.
pub const KEY_NUMPATTERNS: &str = "numpatterns";

/// Prefix of the find keys (`find1`, `find2`, ...).
pub const KEY_FIND: &str = "find";

/// Prefix of the replace keys (`replace1`, `replace2`, ...).
pub const KEY_REPLACE: &str = "replace";

/// Error type for loading a rule source.
///
/// Validation stops at the first problem, so a rule source never reports
/// more than one error.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
  /// A required key is absent.
  #[error("Missing key: {0}")]
  MissingKey(String),

  /// The file-name pattern is not a valid regular expression.
  #[error("Failed to compile regexp: {pattern}")]
  InvalidFilePattern {
    pattern: String,
    #[source]
    source: regex::Error,
  },

  /// `numpatterns` is not a non-negative integer.
  #[error("Failed to parse value for 'numpatterns': {0}")]
  InvalidCount(String),

  /// A find expression is not a valid regular expression.
  #[error("Failed to compile find pattern '{key}': {source}")]
  InvalidFind {
    key: String,
    #[source]
    source: regex::Error,
  },

  /// A `\u` escape in the source is not followed by four hex digits.
  #[error("Malformed \\uxxxx encoding on line {line}")]
  MalformedEscape { line: usize },
}

/// One find/replace pair of a [`RuleSet`].
#[derive(Debug, Clone)]
pub struct Replacement {
  /// 1-based position of the pair in the rule source
  pub index: usize,
  /// Expression applied globally to every line
  pub find: Regex,
  /// Replacement template, may reference capture groups (`$1`, `${name}`)
  pub replace: String,
}

/// A validated pattern definition.
///
/// Constructed once from a rule source and immutable afterwards.
#[derive(Debug, Clone)]
pub struct RuleSet {
  /// The file pattern exactly as written in the source
  file_pattern: String,

  /// The file pattern anchored at both ends for whole-name matching
  file_matcher: Regex,

  /// Replacement pairs in ascending index order
  replacements: Vec<Replacement>,
}

impl RuleSet {
  /// Parses and validates a rule source.
  ///
  /// # Errors
  ///
  /// Returns the first problem found, checked in this order: missing or
  /// invalid `filepattern`, missing or invalid `numpatterns`, then for each
  /// index a missing or invalid `find<i>` followed by a missing `replace<i>`.
  pub fn parse(text: &str) -> Result<Self, RuleError> {
    let props = Properties::parse(text)?;
    Self::from_properties(&props)
  }

  /// Builds a rule set from an already parsed key/value table.
  pub fn from_properties(props: &Properties) -> Result<Self, RuleError> {
    let file_pattern = props
      .get(KEY_FILEPATTERN)
      .ok_or_else(|| RuleError::MissingKey(KEY_FILEPATTERN.to_string()))?;
    // The pattern must compile on its own before it is wrapped in anchors,
    // otherwise input such as `a)(b` would slip through.
    let file_matcher = Regex::new(file_pattern)
      .and_then(|_| Regex::new(&format!("^(?:{file_pattern})$")))
      .map_err(|source| RuleError::InvalidFilePattern {
        pattern: file_pattern.to_string(),
        source,
      })?;

    let count = props
      .get(KEY_NUMPATTERNS)
      .ok_or_else(|| RuleError::MissingKey(KEY_NUMPATTERNS.to_string()))?;
    let count = count
      .trim()
      .parse::<usize>()
      .ok()
      .ok_or_else(|| RuleError::InvalidCount(count.to_string()))?;

    let mut replacements = Vec::with_capacity(count);
    for index in 1..=count {
      let find_key = format!("{KEY_FIND}{index}");
      let find = props
        .get(&find_key)
        .ok_or_else(|| RuleError::MissingKey(find_key.clone()))?;
      let find = Regex::new(find).map_err(|source| RuleError::InvalidFind { key: find_key, source })?;

      let replace_key = format!("{KEY_REPLACE}{index}");
      let replace = props.get(&replace_key).ok_or(RuleError::MissingKey(replace_key))?;

      replacements.push(Replacement {
        index,
        find,
        replace: replace.to_string(),
      });
    }

    Ok(Self {
      file_pattern: file_pattern.to_string(),
      file_matcher,
      replacements,
    })
  }

  /// The file pattern as written in the rule source.
  ///
  /// This string identifies the rule set inside a registry.
  pub fn file_pattern(&self) -> &str {
    &self.file_pattern
  }

  /// Returns `true` if the whole bare file name matches the file pattern.
  pub fn matches_file_name(&self, file_name: &str) -> bool {
    self.file_matcher.is_match(file_name)
  }

  /// The find/replace pairs, in the order they are applied.
  pub fn replacements(&self) -> &[Replacement] {
    &self.replacements
  }
}
