//! Output types for rexp commands
//!
//! All output structures are JSON-first. Offsets are codepoint offsets.

use serde::{Deserialize, Serialize};

/// A single capture group within a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capture {
    /// Group number (1-indexed)
    pub group: usize,
    /// Named group name (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Captured text, `null` when the group did not participate
    pub text: Option<String>,
}

/// A single match result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Full matched text
    pub text: String,
    /// Start codepoint offset
    pub start: usize,
    /// End codepoint offset (exclusive)
    pub end: usize,
    /// One entry per capture group in the pattern
    pub captures: Vec<Capture>,
}

/// Result of `rexp test`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub pattern: String,
    /// Flags the pattern was compiled with
    pub flags: Flags,
    /// Length of input in codepoints
    pub input_length: usize,
    pub matched: bool,
    pub match_count: usize,
    /// Whether `max_matches` cut the scan short
    pub truncated: bool,
    pub matches: Vec<Match>,
    /// Elapsed time in microseconds
    pub elapsed_us: u64,
}

/// Compile flags, echoed back in results
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Flags {
    pub case_insensitive: bool,
    pub multi_line: bool,
}

impl From<rexp::Options> for Flags {
    fn from(options: rexp::Options) -> Self {
        Self {
            case_insensitive: options.case_insensitive,
            multi_line: options.multi_line,
        }
    }
}

/// Result of `rexp check`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub pattern: String,
    pub flags: Flags,
    pub matched: bool,
}

/// Result of `rexp split`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitResult {
    pub pattern: String,
    pub flags: Flags,
    pub piece_count: usize,
    pub pieces: Vec<String>,
}

/// Result of `rexp replace`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceResult {
    pub pattern: String,
    /// The replacement text, inserted literally
    pub replacement: String,
    pub original: String,
    pub result: String,
    pub replacements_made: usize,
}

/// A single replacement preview line (for `--file`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacePreview {
    /// Line number (1-indexed)
    pub line: usize,
    pub before: String,
    pub after: String,
}

/// Result of `rexp replace --file`. The file is never written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceFileResult {
    pub pattern: String,
    pub replacement: String,
    pub file_path: String,
    /// Total number of replacements across the file
    pub replacements_made: usize,
    /// Number of lines that would change
    pub lines_changed: usize,
    pub preview: Vec<ReplacePreview>,
}

/// Error information for validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Stable error kind, e.g. `unclosed_group`
    pub kind: String,
    /// Codepoint offset into the pattern
    pub position: usize,
    pub message: String,
}

/// Result of `rexp validate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResult {
    pub pattern: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
    /// Number of capture groups (if valid)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_count: Option<usize>,
    /// Named groups in order (if valid and any are named)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_names: Vec<String>,
    /// Suggested fix (if invalid)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A single token/part in pattern explanation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainPart {
    /// The token text
    pub token: String,
    /// Token type (anchor, literal, quantifier, etc.)
    #[serde(rename = "type")]
    pub token_type: String,
    /// Human-readable description
    pub desc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantifier: Option<String>,
    /// Capturing group number (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<usize>,
    /// Child parts (for groups and alternations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ExplainPart>>,
}

/// Result of `rexp explain`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResult {
    pub pattern: String,
    pub parts: Vec<ExplainPart>,
    /// High-level summary of what the pattern does
    pub summary: String,
}

/// Result of `rexp benchmark`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub pattern: String,
    /// Input size in codepoints
    pub input_length: usize,
    /// Iterations actually completed
    pub iterations: usize,
    pub avg_us: f64,
    pub median_us: f64,
    pub stddev_us: f64,
    /// Throughput in MB/s of UTF-8 input
    pub throughput_mb_s: f64,
    /// Backtrack budget used per scan
    pub backtrack_limit: usize,
    /// Whether the budget tripped or timings blew up
    pub catastrophic_backtracking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Generic error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always true for errors
    pub error: bool,
    pub code: String,
    pub message: String,
    /// Position in pattern (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: true,
            code: code.into(),
            message: message.into(),
            position: None,
            suggestion: None,
        }
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Error codes used throughout rexp
pub mod error_codes {
    pub const INVALID_PATTERN: &str = "INVALID_PATTERN";
    pub const BACKTRACK_LIMIT: &str = "BACKTRACK_LIMIT";
    pub const COMMAND_ERROR: &str = "COMMAND_ERROR";
}
