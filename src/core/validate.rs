//! Implementation of `rexp validate`
//!
//! Compiles a pattern and reports the first syntax error with its position
//! and a suggested fix.

use rexp::{CompileError, ErrorKind};

use crate::output::{ValidateResult, ValidationError};

/// Validate a regex pattern
pub fn validate_pattern(pattern: &str, options: rexp::Options) -> ValidateResult {
    match rexp::compile(pattern, options) {
        Ok(re) => ValidateResult {
            pattern: pattern.to_string(),
            valid: true,
            error: None,
            capture_count: Some(re.capture_count()),
            group_names: re.group_names().iter().flatten().cloned().collect(),
            suggestion: None,
        },
        Err(err) => ValidateResult {
            pattern: pattern.to_string(),
            valid: false,
            suggestion: Some(suggest_fix(&err).to_string()),
            error: Some(ValidationError {
                kind: err.kind.as_str().to_string(),
                position: err.position,
                message: err.message,
            }),
            capture_count: None,
            group_names: Vec::new(),
        },
    }
}

/// Suggest a fix for a compile error
pub fn suggest_fix(err: &CompileError) -> &'static str {
    match err.kind {
        ErrorKind::UnclosedGroup => "Add closing ')' to complete the group",
        ErrorKind::UnopenedGroup => "Remove extra ')' or add opening '('",
        ErrorKind::InvalidRepetitionRange => "Swap the bounds so the minimum comes first",
        ErrorKind::RepetitionMissing => "Add a character or group before the quantifier",
        ErrorKind::IncompleteRepetition => {
            "Complete the quantifier as {n}, {n,} or {n,m}, or escape the brace with '\\{'"
        }
        ErrorKind::RepetitionCountTooLarge => "Use a repetition count of at most 100000",
        ErrorKind::InvalidEscape => {
            "Complete the escape sequence or escape the backslash with '\\\\'"
        }
        ErrorKind::UnclosedClass => "Add closing ']' to complete the character class",
        ErrorKind::InvalidClassRange => "Write class ranges as low-high with single characters",
        ErrorKind::LoneBracket => "Escape the bracket with a backslash",
        ErrorKind::InvalidBackreference => "Refer only to groups that exist in the pattern",
        ErrorKind::InvalidGroupName => "Group names must match [A-Za-z_][A-Za-z0-9_]*",
        ErrorKind::DuplicateGroupName => "Give each named group a distinct name",
        ErrorKind::UnsupportedGroup => {
            "Only (?:...), (?=...), (?!...) and (?<name>...) groups are supported"
        }
        ErrorKind::NestLimitExceeded => "Flatten nested groups",
        ErrorKind::SizeLimitExceeded => "Reduce large bounded repetitions such as {1000}",
    }
}
