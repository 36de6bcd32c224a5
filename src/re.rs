//! Compiled regular expressions and the operations built on them

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::compile::{self, DEFAULT_SIZE_LIMIT};
use crate::error::{CompileError, MatchError};
use crate::exec::{self, Slots, DEFAULT_BACKTRACK_LIMIT};
use crate::parse::{is_meta_character, Parser};
use crate::program::Program;

/// Compile-time flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Options {
    /// Match letters regardless of case, using simple case folding
    pub case_insensitive: bool,
    /// `^` and `$` also match at line boundaries
    pub multi_line: bool,
}

/// One match found in a subject.
///
/// Offsets are codepoint offsets, not byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub content: String,
    pub start: usize,
    pub end: usize,
    /// One entry per capture group; `None` when the group did not participate
    pub submatches: Vec<Option<String>>,
}

impl Match {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Configures and compiles a [`Regex`]
#[derive(Debug, Clone)]
pub struct RegexBuilder {
    pattern: String,
    options: Options,
    size_limit: usize,
    backtrack_limit: usize,
}

impl RegexBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            options: Options::default(),
            size_limit: DEFAULT_SIZE_LIMIT,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }

    pub fn options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    pub fn case_insensitive(&mut self, yes: bool) -> &mut Self {
        self.options.case_insensitive = yes;
        self
    }

    pub fn multi_line(&mut self, yes: bool) -> &mut Self {
        self.options.multi_line = yes;
        self
    }

    /// Maximum number of instructions in the compiled program
    pub fn size_limit(&mut self, limit: usize) -> &mut Self {
        self.size_limit = limit;
        self
    }

    /// Maximum number of backtracks in a single search
    pub fn backtrack_limit(&mut self, limit: usize) -> &mut Self {
        self.backtrack_limit = limit;
        self
    }

    pub fn build(&self) -> Result<Regex, CompileError> {
        let parsed = Parser::new(&self.pattern).parse()?;
        let capture_count = parsed.group_names.len();
        let program = compile::compile(&parsed.ast, capture_count, self.options, self.size_limit)?;
        log::debug!(
            "compiled {:?}: {} groups, {} instructions",
            self.pattern,
            capture_count,
            program.len()
        );
        Ok(Regex {
            pattern: self.pattern.clone(),
            options: self.options,
            program: Arc::new(program),
            group_names: parsed.group_names,
            backtrack_limit: self.backtrack_limit,
        })
    }
}

/// A compiled regular expression.
///
/// Cheap to clone and safe to share between threads. Every search allocates
/// its own backtracking state, so nothing is carried between calls.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    options: Options,
    program: Arc<Program>,
    group_names: Vec<Option<String>>,
    backtrack_limit: usize,
}

impl Regex {
    /// Compile `pattern` with default options
    pub fn new(pattern: &str) -> Result<Self, CompileError> {
        RegexBuilder::new(pattern).build()
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Number of capture groups, not counting the whole match
    pub fn capture_count(&self) -> usize {
        self.program.capture_count
    }

    /// The name of each capture group in order, `None` for unnamed groups
    pub fn group_names(&self) -> &[Option<String>] {
        &self.group_names
    }

    /// Find the leftmost match starting at or after codepoint offset `start`
    pub fn find_at(&self, subject: &str, start: usize) -> Result<Option<Match>, MatchError> {
        let chars: Vec<char> = subject.chars().collect();
        self.find_chars(&chars, start)
    }

    /// Whether the pattern matches anywhere in `subject`
    pub fn check(&self, subject: &str) -> Result<bool, MatchError> {
        let chars: Vec<char> = subject.chars().collect();
        Ok(exec::search(&self.program, &chars, 0, self.backtrack_limit)?.is_some())
    }

    /// All non-overlapping matches, left to right.
    ///
    /// After an empty match the next search starts one codepoint later.
    pub fn scan(&self, subject: &str) -> Result<Vec<Match>, MatchError> {
        self.find_iter(subject).collect()
    }

    /// Lazily yield the matches [`Regex::scan`] would return.
    ///
    /// Iteration stops after the first error.
    pub fn find_iter(&self, subject: &str) -> Matches<'_> {
        Matches {
            regex: self,
            chars: subject.chars().collect(),
            at: 0,
            done: false,
        }
    }

    /// The pieces of `subject` between matches, including empty ones
    pub fn split(&self, subject: &str) -> Result<Vec<String>, MatchError> {
        let chars: Vec<char> = subject.chars().collect();
        let mut pieces = Vec::new();
        let mut last = 0;
        for m in self.scan_chars(&chars)? {
            pieces.push(chars[last..m.start].iter().collect());
            last = m.end;
        }
        pieces.push(chars[last..].iter().collect());
        Ok(pieces)
    }

    /// Replace every match with `replacement`, taken literally
    pub fn replace(&self, subject: &str, replacement: &str) -> Result<String, MatchError> {
        self.replace_with(subject, |_| replacement.to_string())
    }

    /// Replace every match with the result of calling `f` on it
    pub fn replace_with<F>(&self, subject: &str, mut f: F) -> Result<String, MatchError>
    where
        F: FnMut(&Match) -> String,
    {
        let chars: Vec<char> = subject.chars().collect();
        let mut out = String::with_capacity(subject.len());
        let mut last = 0;
        for m in self.scan_chars(&chars)? {
            out.extend(&chars[last..m.start]);
            out.push_str(&f(&m));
            last = m.end;
        }
        out.extend(&chars[last..]);
        Ok(out)
    }

    fn find_chars(&self, chars: &[char], start: usize) -> Result<Option<Match>, MatchError> {
        let slots = exec::search(&self.program, chars, start, self.backtrack_limit)?;
        Ok(slots.map(|slots| build_match(chars, &slots)))
    }

    fn scan_chars(&self, chars: &[char]) -> Result<Vec<Match>, MatchError> {
        let mut matches = Vec::new();
        let mut at = 0;
        while at <= chars.len() {
            let Some(m) = self.find_chars(chars, at)? else {
                break;
            };
            at = next_start(&m);
            matches.push(m);
        }
        Ok(matches)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Iterator over successive matches, created by [`Regex::find_iter`]
#[derive(Debug)]
pub struct Matches<'r> {
    regex: &'r Regex,
    chars: Vec<char>,
    at: usize,
    done: bool,
}

impl Iterator for Matches<'_> {
    type Item = Result<Match, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.at > self.chars.len() {
            return None;
        }
        match self.regex.find_chars(&self.chars, self.at) {
            Ok(Some(m)) => {
                self.at = next_start(&m);
                Some(Ok(m))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Where the search after `m` begins; an empty match steps one codepoint
fn next_start(m: &Match) -> usize {
    if m.is_empty() {
        m.end + 1
    } else {
        m.end
    }
}

fn build_match(chars: &[char], slots: &Slots) -> Match {
    let span = |group: usize| match (slots[2 * group], slots[2 * group + 1]) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    };
    let (start, end) = span(0).unwrap_or((0, 0));
    let submatches = (1..slots.len() / 2)
        .map(|group| span(group).map(|(s, e)| chars[s..e].iter().collect()))
        .collect();
    Match {
        content: chars[start..end].iter().collect(),
        start,
        end,
        submatches,
    }
}

/// Escape every metacharacter in `text` so it matches literally
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_meta_character) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_meta_character(c) {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}
