//! A backtracking regular expression engine.
//!
//! Patterns use the JavaScript `RegExp` dialect in Unicode mode: captures,
//! named groups, lookahead, backreferences, and lazy quantifiers. All offsets
//! reported by the engine count Unicode codepoints.
//!
//! ```
//! let re = rexp::compile(r"(\w+)@(\w+)", rexp::Options::default()).unwrap();
//! let matches = rexp::scan(&re, "ann@example bob@test").unwrap();
//! assert_eq!(matches.len(), 2);
//! assert_eq!(matches[1].submatches[0].as_deref(), Some("bob"));
//! ```

pub mod ast;
mod class;
mod compile;
pub mod error;
mod exec;
pub mod parse;
mod program;
mod re;

pub use crate::compile::DEFAULT_SIZE_LIMIT;
pub use crate::error::{CompileError, Error, ErrorKind, MatchError};
pub use crate::exec::DEFAULT_BACKTRACK_LIMIT;
pub use crate::re::{escape, Match, Matches, Options, Regex, RegexBuilder};

/// Compile `pattern` with the given flags
pub fn compile(pattern: &str, options: Options) -> Result<Regex, CompileError> {
    RegexBuilder::new(pattern).options(options).build()
}

/// Whether `regex` matches anywhere in `subject`
pub fn check(regex: &Regex, subject: &str) -> Result<bool, MatchError> {
    regex.check(subject)
}

/// Every non-overlapping match in `subject`, left to right
pub fn scan(regex: &Regex, subject: &str) -> Result<Vec<Match>, MatchError> {
    regex.scan(subject)
}

/// Split `subject` around each match of `regex`
pub fn split(regex: &Regex, subject: &str) -> Result<Vec<String>, MatchError> {
    regex.split(subject)
}

/// Replace each match of `regex` in `subject` with the literal `replacement`
pub fn replace(regex: &Regex, subject: &str, replacement: &str) -> Result<String, MatchError> {
    regex.replace(subject, replacement)
}
