//! # Properties Module
//!
//! A small reader for the `key=value` documents that pattern files are
//! written in. It follows the conventions of Java `.properties` files because
//! that is the format the shipped and user-supplied pattern files use:
//!
//! - `#` and `!` start a comment line
//! - keys are separated from values by `=`, `:` or whitespace
//! - a trailing backslash continues the logical line
//! - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded, any other escaped character stands for itself

use std::collections::HashMap;

use super::RuleError;

/// An unordered key/value table parsed from a properties document.
///
/// When a key occurs more than once the last occurrence wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Properties {
  entries: HashMap<String, String>,
}

impl Properties {
  /// Parses a properties document.
  ///
  /// # Errors
  ///
  /// Returns [`RuleError::MalformedEscape`] if a `\u` escape is not followed
  /// by four hexadecimal digits.
  pub fn parse(text: &str) -> Result<Self, RuleError> {
    let mut entries = HashMap::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
      let line_number = index + 1;
      let trimmed = raw.trim_start();
      if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
        continue;
      }

      // Join continuation lines into a single logical line
      let mut logical = trimmed.to_string();
      while ends_with_continuation(&logical) {
        logical.pop();
        match lines.next() {
          Some((_, next)) => logical.push_str(next.trim_start()),
          None => break,
        }
      }

      let (key, value) = split_key_value(&logical);
      let key = unescape(key, line_number)?;
      let value = unescape(value, line_number)?;
      entries.insert(key, value);
    }

    Ok(Self { entries })
  }

  /// Returns the value stored under `key`, if any.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }
}

/// A line continues when it ends in an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
  line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits a logical line into its raw (still escaped) key and value parts.
fn split_key_value(line: &str) -> (&str, &str) {
  let mut key_end = line.len();
  let mut escaped = false;
  for (i, c) in line.char_indices() {
    if escaped {
      escaped = false;
      continue;
    }
    match c {
      '\\' => escaped = true,
      '=' | ':' => {
        key_end = i;
        break;
      }
      c if c.is_whitespace() => {
        key_end = i;
        break;
      }
      _ => {}
    }
  }

  let key = &line[..key_end];
  let mut rest = line[key_end..].trim_start();
  if let Some(stripped) = rest.strip_prefix(&['=', ':'][..]) {
    rest = stripped.trim_start();
  }
  (key, rest)
}

fn unescape(raw: &str, line_number: usize) -> Result<String, RuleError> {
  if !raw.contains('\\') {
    return Ok(raw.to_string());
  }

  let mut out = String::with_capacity(raw.len());
  let mut chars = raw.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    match chars.next() {
      Some('t') => out.push('\t'),
      Some('n') => out.push('\n'),
      Some('r') => out.push('\r'),
      Some('f') => out.push('\u{000C}'),
      Some('u') => {
        let hex: String = chars.by_ref().take(4).collect();
        let decoded = (hex.len() == 4)
          .then(|| u32::from_str_radix(&hex, 16).ok())
          .flatten()
          .and_then(char::from_u32)
          .ok_or(RuleError::MalformedEscape { line: line_number })?;
        out.push(decoded);
      }
      Some(other) => out.push(other),
      None => {}
    }
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_separators() {
    let props = Properties::parse("a=1\nb: 2\nc 3\nd   =   4\n").unwrap();
    assert_eq!(props.get("a"), Some("1"));
    assert_eq!(props.get("b"), Some("2"));
    assert_eq!(props.get("c"), Some("3"));
    assert_eq!(props.get("d"), Some("4"));
  }

  #[test]
  fn test_comments_and_blank_lines_are_skipped() {
    let props = Properties::parse("# comment\n! another\n\n   \nkey=value").unwrap();
    assert_eq!(props.get("#"), None);
    assert_eq!(props.get("!"), None);
    assert_eq!(props.get("key"), Some("value"));
  }

  #[test]
  fn test_empty_value_is_kept() {
    let props = Properties::parse("replace1=\nreplace2").unwrap();
    assert_eq!(props.get("replace1"), Some(""));
    assert_eq!(props.get("replace2"), Some(""));
  }

  #[test]
  fn test_last_occurrence_wins() {
    let props = Properties::parse("key=first\nkey=second").unwrap();
    assert_eq!(props.get("key"), Some("second"));
  }

  #[test]
  fn test_backslash_escapes_for_regex() {
    // A regex `A\.java` has to be written with a doubled backslash
    let props = Properties::parse(r"filepattern=A\\.java").unwrap();
    assert_eq!(props.get("filepattern"), Some(r"A\.java"));
  }

  #[test]
  fn test_unicode_and_control_escapes() {
    let props = Properties::parse(r"k=\u00e9\ttab").unwrap();
    assert_eq!(props.get("k"), Some("é\ttab"));
  }

  #[test]
  fn test_escaped_separator_in_key() {
    let props = Properties::parse(r"a\=b=c").unwrap();
    assert_eq!(props.get("a=b"), Some("c"));
  }

  #[test]
  fn test_line_continuation() {
    let props = Properties::parse("find1=^foo\\\n    bar$\nother=x").unwrap();
    assert_eq!(props.get("find1"), Some("^foobar$"));
    assert_eq!(props.get("other"), Some("x"));
  }

  #[test]
  fn test_escaped_backslash_does_not_continue() {
    let props = Properties::parse("a=x\\\\\nb=y").unwrap();
    assert_eq!(props.get("a"), Some("x\\"));
    assert_eq!(props.get("b"), Some("y"));
  }

  #[test]
  fn test_trailing_whitespace_in_value_is_kept() {
    let props = Properties::parse("replace1= x  ").unwrap();
    assert_eq!(props.get("replace1"), Some("x  "));
  }

  #[test]
  fn test_malformed_unicode_escape() {
    let err = Properties::parse("ok=1\nbad=\\u12").unwrap_err();
    assert!(matches!(err, RuleError::MalformedEscape { line: 2 }));
  }
}
