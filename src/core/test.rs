//! Implementation of `rexp test` and `rexp check`
//!
//! Scans input text for every match of a pattern, returning positions and
//! capture groups.

use std::time::Instant;

use anyhow::Result;
use rexp::Regex;

use super::input::Source;
use crate::output::{Capture, CheckResult, Match, TestResult};

/// Options for the test command
pub struct TestOptions {
    /// Maximum number of matches to return
    pub max_matches: Option<usize>,
    pub regex: rexp::Options,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            max_matches: Some(100),
            regex: rexp::Options::default(),
        }
    }
}

/// Test a compiled pattern against a string
pub fn test_string(re: &Regex, input: &str, max_matches: Option<usize>) -> Result<TestResult> {
    let start = Instant::now();

    let (matches, truncated) = collect_matches(re, input, max_matches.unwrap_or(usize::MAX))?;

    Ok(TestResult {
        pattern: re.as_str().to_string(),
        flags: re.options().into(),
        input_length: input.chars().count(),
        matched: !matches.is_empty(),
        match_count: matches.len(),
        truncated,
        matches,
        elapsed_us: start.elapsed().as_micros() as u64,
    })
}

/// Test a pattern against text read from `source`
pub fn test_source(pattern: &str, source: Source<'_>, options: &TestOptions) -> Result<TestResult> {
    // Compile first so a bad pattern fails before waiting on stdin
    let re = rexp::compile(pattern, options.regex)?;
    let input = source.read()?;
    test_string(&re, &input, options.max_matches)
}

/// Whether a compiled pattern matches anywhere in `input`
pub fn check_string(re: &Regex, input: &str) -> Result<CheckResult> {
    Ok(CheckResult {
        pattern: re.as_str().to_string(),
        flags: re.options().into(),
        matched: rexp::check(re, input)?,
    })
}

/// Collect up to `max_matches` matches, reporting whether more were left
fn collect_matches(re: &Regex, text: &str, max_matches: usize) -> Result<(Vec<Match>, bool)> {
    let mut matches = Vec::new();
    for m in re.find_iter(text) {
        if matches.len() >= max_matches {
            return Ok((matches, true));
        }
        matches.push(to_output(re, m?));
    }
    Ok((matches, false))
}

fn to_output(re: &Regex, m: rexp::Match) -> Match {
    let captures = m
        .submatches
        .into_iter()
        .zip(re.group_names())
        .enumerate()
        .map(|(i, (text, name))| Capture {
            group: i + 1,
            name: name.clone(),
            text,
        })
        .collect();

    Match {
        text: m.content,
        start: m.start,
        end: m.end,
        captures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        pattern: &str,
        input: &str,
        max_matches: Option<usize>,
        options: rexp::Options,
    ) -> TestResult {
        let re = rexp::compile(pattern, options).unwrap();
        test_string(&re, input, max_matches).unwrap()
    }

    fn run_default(pattern: &str, input: &str) -> TestResult {
        run(pattern, input, Some(100), rexp::Options::default())
    }

    #[test]
    fn test_simple_match() {
        let result = run_default(r"\d+", "hello 123 world 456");
        assert!(result.matched);
        assert_eq!(result.match_count, 2);
        assert_eq!(result.matches[0].text, "123");
        assert_eq!(result.matches[1].text, "456");
    }

    #[test]
    fn test_no_match() {
        let result = run_default(r"\d+", "hello world");
        assert!(!result.matched);
        assert_eq!(result.match_count, 0);
    }

    #[test]
    fn test_with_captures() {
        let result = run_default(r"(?<a>\d+)-(\d+)|(x)", "123-456");
        let captures = &result.matches[0].captures;
        assert_eq!(captures.len(), 3);
        assert_eq!(captures[0].name.as_deref(), Some("a"));
        assert_eq!(captures[0].text.as_deref(), Some("123"));
        assert_eq!(captures[1].text.as_deref(), Some("456"));
        assert_eq!(captures[2].text, None);
    }

    #[test]
    fn test_max_matches() {
        let result = run(r"\d+", "1 2 3 4 5", Some(1), rexp::Options::default());
        assert_eq!(result.match_count, 1);
        assert!(result.truncated);
    }

    #[test]
    fn test_codepoint_offsets() {
        let result = run_default("é", "caféé");
        assert_eq!(result.input_length, 5);
        assert_eq!((result.matches[0].start, result.matches[0].end), (3, 4));
    }

    #[test]
    fn test_multi_line_anchors() {
        let multi = rexp::Options {
            multi_line: true,
            ..Default::default()
        };
        let result = run(r"^\w+$", "foo\nbar\nbaz", None, multi);
        assert_eq!(result.match_count, 3);

        let result = run_default(r"^\w+$", "foo\nbar");
        assert_eq!(result.match_count, 0);
    }

    #[test]
    fn test_check() {
        let ci = rexp::Options {
            case_insensitive: true,
            ..Default::default()
        };
        let re = rexp::compile("ABC", ci).unwrap();
        assert!(check_string(&re, "xabcx").unwrap().matched);
        let re = rexp::compile("ABC", rexp::Options::default()).unwrap();
        assert!(!check_string(&re, "xabcx").unwrap().matched);
    }

    #[test]
    fn test_backtrack_limit_is_match_error() {
        let re = rexp::RegexBuilder::new("(a|a)*b")
            .backtrack_limit(1_000)
            .build()
            .unwrap();
        let err = test_string(&re, &"a".repeat(30), None).unwrap_err();
        assert!(err.downcast_ref::<rexp::MatchError>().is_some());
    }

    #[test]
    fn test_invalid_pattern_is_compile_error() {
        let err = test_source("a(b", Source::Text("ab"), &TestOptions::default()).unwrap_err();
        let compile = err.downcast_ref::<rexp::CompileError>().unwrap();
        assert_eq!(compile.position, 1);
    }
}
