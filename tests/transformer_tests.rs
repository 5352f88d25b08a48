mod common;

use anyhow::Result;
use common::{non_empty_lines, read, write_tree};
use gplstrip::processor::{DiskFileSystem, FileTransformer, TreeWalker, WalkOptions};
use gplstrip::registry::{RuleRegistry, RuleSource};
use gplstrip::report::FileAction;
use gplstrip::rules::RuleSet;
use tempfile::tempdir;

const HEADER_RULES: &str = r"filepattern=A\\.java
numpatterns=1
find1=^\\s*(/\\*|\\*/|\\*)?\\s*(GPL header line \\d+)?\\s*$
replace1=
";

fn lines(text: &[&str]) -> Vec<String> {
  text.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_header_is_stripped_from_matching_file() -> Result<()> {
  let temp_dir = tempdir()?;
  write_tree(
    temp_dir.path(),
    &[("A.java", "/* GPL header line 1\n * GPL header line 2\n */\npublic class A {}")],
  )?;

  let registry = RuleRegistry::build(false, &[RuleSource::new("header.props", HEADER_RULES)])?;
  let summary = TreeWalker::new(&DiskFileSystem, &registry, WalkOptions::default()).run(temp_dir.path())?;

  assert_eq!(summary.reports.len(), 1);
  assert_eq!(summary.reports[0].action, FileAction::Updated);

  // Blanked lines stay in place as empty lines
  let content = read(temp_dir.path(), "A.java")?;
  assert_eq!(content, "\n\n\npublic class A {}\n");
  assert_eq!(non_empty_lines(&content), "public class A {}");
  Ok(())
}

#[test]
fn test_pairs_apply_in_index_order() -> Result<()> {
  let forward = RuleSet::parse("filepattern=.*\nnumpatterns=2\nfind1=foo\nreplace1=bar\nfind2=bar\nreplace2=baz\n")?;
  let reversed = RuleSet::parse("filepattern=.*\nnumpatterns=2\nfind1=bar\nreplace1=baz\nfind2=foo\nreplace2=bar\n")?;
  let transformer = FileTransformer::new();
  let input = lines(&["foo"]);

  assert_eq!(transformer.apply(&input, &forward).lines, lines(&["baz"]));
  assert_eq!(transformer.apply(&input, &reversed).lines, lines(&["bar"]));
  Ok(())
}

#[test]
fn test_second_pass_changes_nothing() -> Result<()> {
  let rules = RuleSet::parse(HEADER_RULES)?;
  let transformer = FileTransformer::new();
  let input = lines(&["/* GPL header line 1", " */", "public class A {}"]);

  let first = transformer.apply(&input, &rules);
  let second = transformer.apply(&first.lines, &rules);

  assert!(first.changed);
  assert!(!second.changed);
  assert_eq!(second.lines, first.lines);
  Ok(())
}

#[test]
fn test_file_pattern_requires_full_name_match() -> Result<()> {
  let rules = RuleSet::parse("filepattern=Test\\\\.java\nnumpatterns=0\n")?;

  assert!(rules.matches_file_name("Test.java"));
  assert!(!rules.matches_file_name("XTest.java"));
  assert!(!rules.matches_file_name("Test.javax"));
  Ok(())
}

#[test]
fn test_replacement_templates_expand_groups() -> Result<()> {
  let rules = RuleSet::parse("filepattern=.*\nnumpatterns=1\nfind1=Copyright \\\\(C\\\\) (\\\\d+)\nreplace1=(c) $1\n")?;
  let transformed = FileTransformer::new().apply(&lines(&["Copyright (C) 2009 FSF"]), &rules);

  assert!(transformed.changed);
  assert_eq!(transformed.lines, lines(&["(c) 2009 FSF"]));
  Ok(())
}
