//! Error types for compilation and matching

use std::fmt;

use thiserror::Error;

/// The kind of syntax or budget problem found while compiling a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An opening `(` without a matching `)`
    UnclosedGroup,
    /// A `)` without a matching `(`
    UnopenedGroup,
    /// `{m,n}` where `m > n`
    InvalidRepetitionRange,
    /// A quantifier with nothing to repeat
    RepetitionMissing,
    /// A `{` after an atom that does not form a valid quantifier
    IncompleteRepetition,
    /// A repetition bound larger than the supported maximum
    RepetitionCountTooLarge,
    /// An unknown or malformed escape sequence
    InvalidEscape,
    /// An opening `[` without a matching `]`
    UnclosedClass,
    /// A class range whose bounds are reversed or not single characters
    InvalidClassRange,
    /// A stray `]` or `}` outside of a class or quantifier
    LoneBracket,
    /// A backreference to a group that does not exist
    InvalidBackreference,
    /// A malformed capture group name
    InvalidGroupName,
    /// Two capture groups with the same name
    DuplicateGroupName,
    /// Group syntax that is not supported, such as lookbehind
    UnsupportedGroup,
    /// Groups nested deeper than the parser allows
    NestLimitExceeded,
    /// The compiled program would exceed the size limit
    SizeLimitExceeded,
}

impl ErrorKind {
    /// Stable snake_case identifier, used in CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnclosedGroup => "unclosed_group",
            ErrorKind::UnopenedGroup => "unopened_group",
            ErrorKind::InvalidRepetitionRange => "invalid_repetition_range",
            ErrorKind::RepetitionMissing => "missing_repetition_target",
            ErrorKind::IncompleteRepetition => "incomplete_repetition",
            ErrorKind::RepetitionCountTooLarge => "repetition_count_too_large",
            ErrorKind::InvalidEscape => "invalid_escape",
            ErrorKind::UnclosedClass => "unclosed_class",
            ErrorKind::InvalidClassRange => "invalid_class_range",
            ErrorKind::LoneBracket => "lone_bracket",
            ErrorKind::InvalidBackreference => "invalid_backreference",
            ErrorKind::InvalidGroupName => "invalid_group_name",
            ErrorKind::DuplicateGroupName => "duplicate_group_name",
            ErrorKind::UnsupportedGroup => "unsupported_group",
            ErrorKind::NestLimitExceeded => "nest_limit_exceeded",
            ErrorKind::SizeLimitExceeded => "size_limit_exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ErrorKind::UnclosedGroup => "unclosed group",
            ErrorKind::UnopenedGroup => "unopened group",
            ErrorKind::InvalidRepetitionRange => "invalid repetition range: minimum exceeds maximum",
            ErrorKind::RepetitionMissing => "nothing to repeat",
            ErrorKind::IncompleteRepetition => "incomplete quantifier",
            ErrorKind::RepetitionCountTooLarge => "repetition count too large",
            ErrorKind::InvalidEscape => "invalid escape",
            ErrorKind::UnclosedClass => "unclosed character class",
            ErrorKind::InvalidClassRange => "invalid character class range",
            ErrorKind::LoneBracket => "lone quantifier or class bracket",
            ErrorKind::InvalidBackreference => "backreference to a group that does not exist",
            ErrorKind::InvalidGroupName => "invalid capture group name",
            ErrorKind::DuplicateGroupName => "duplicate capture group name",
            ErrorKind::UnsupportedGroup => "unsupported group syntax",
            ErrorKind::NestLimitExceeded => "groups nested too deeply",
            ErrorKind::SizeLimitExceeded => "compiled pattern exceeds size limit",
        };
        f.write_str(msg)
    }
}

/// A pattern failed to compile.
///
/// `position` is a codepoint offset into the pattern pointing at the
/// offending token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at position {position}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: usize,
}

impl CompileError {
    pub(crate) fn new(kind: ErrorKind, position: usize) -> Self {
        Self {
            kind,
            message: kind.to_string(),
            position,
        }
    }
}

/// A match call gave up before finding an answer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    #[error("backtrack limit of {limit} exceeded")]
    BacktrackLimitExceeded { limit: usize },
}

/// Either failure mode, for callers that compile and match in one step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Match(#[from] MatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_display() {
        let err = CompileError::new(ErrorKind::UnclosedGroup, 3);
        assert_eq!(err.to_string(), "unclosed group at position 3");
        assert_eq!(err.message, "unclosed group");
    }

    #[test]
    fn test_error_from() {
        let err: Error = MatchError::BacktrackLimitExceeded { limit: 10 }.into();
        assert_eq!(err.to_string(), "backtrack limit of 10 exceeded");
    }
}
