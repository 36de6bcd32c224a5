//! Human-friendly text output formatting
//!
//! Used when --format text is specified.

use super::types::*;

fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

fn flag_str(flags: &Flags) -> String {
    let mut s = String::new();
    if flags.case_insensitive {
        s.push('i');
    }
    if flags.multi_line {
        s.push('m');
    }
    if s.is_empty() {
        s.push_str("none");
    }
    s
}

/// Format TestResult as human-readable text
pub fn format_test_result(result: &TestResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Pattern: {}\n", result.pattern));
    output.push_str(&format!("Flags:   {}\n", flag_str(&result.flags)));
    output.push('\n');

    if !result.matched {
        output.push_str("No matches found\n");
        return output;
    }

    for (i, m) in result.matches.iter().enumerate() {
        output.push_str(&format!(
            "Match {}: {:?} [{}..{}]\n",
            i + 1,
            m.text,
            m.start,
            m.end
        ));
        for cap in &m.captures {
            let name_str = cap
                .name
                .as_ref()
                .map(|n| format!(" ({})", n))
                .unwrap_or_default();
            let text = match &cap.text {
                Some(text) => format!("{:?}", text),
                None => "<none>".to_string(),
            };
            output.push_str(&format!("  Group {}{}: {}\n", cap.group, name_str, text));
        }
    }
    output.push('\n');
    output.push_str(&format!(
        "{} found in {}μs{}\n",
        plural(result.match_count, "match", "matches"),
        result.elapsed_us,
        if result.truncated { " (truncated)" } else { "" }
    ));

    output
}

/// Format CheckResult as human-readable text
pub fn format_check_result(result: &CheckResult) -> String {
    if result.matched {
        format!("✓ {} matches\n", result.pattern)
    } else {
        format!("✗ {} does not match\n", result.pattern)
    }
}

/// Format SplitResult as human-readable text
pub fn format_split_result(result: &SplitResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Pattern: {}\n\n", result.pattern));
    for (i, piece) in result.pieces.iter().enumerate() {
        output.push_str(&format!("{:>3}: {:?}\n", i, piece));
    }
    output.push('\n');
    output.push_str(&format!("{}\n", plural(result.piece_count, "piece", "pieces")));

    output
}

/// Format ReplaceResult as human-readable text
pub fn format_replace_result(result: &ReplaceResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Pattern:     {}\n", result.pattern));
    output.push_str(&format!("Replacement: {}\n", result.replacement));
    output.push('\n');
    output.push_str(&format!("Original: {}\n", result.original));
    output.push_str(&format!("Result:   {}\n", result.result));
    output.push('\n');
    output.push_str(&format!(
        "{} made\n",
        plural(result.replacements_made, "replacement", "replacements")
    ));

    output
}

/// Format ReplaceFileResult as human-readable text
pub fn format_replace_file_result(result: &ReplaceFileResult) -> String {
    let mut output = String::new();

    output.push_str("[DRY-RUN]\n");
    output.push_str(&format!("Pattern:     {}\n", result.pattern));
    output.push_str(&format!("Replacement: {}\n", result.replacement));
    output.push_str(&format!("File:        {}\n", result.file_path));
    output.push('\n');
    output.push_str(&format!(
        "{} on {}\n",
        plural(result.replacements_made, "replacement", "replacements"),
        plural(result.lines_changed, "line", "lines")
    ));

    if !result.preview.is_empty() {
        output.push_str("\nPreview:\n");
        for p in &result.preview {
            output.push_str(&format!("  L{}: {} -> {}\n", p.line, p.before, p.after));
        }
    }

    output
}

/// Format ValidateResult as human-readable text
pub fn format_validate_result(result: &ValidateResult) -> String {
    let mut output = String::new();

    if result.valid {
        output.push_str("✓ Pattern is valid\n");
        if let Some(count) = result.capture_count {
            output.push_str(&format!("\nCapture groups: {}\n", count));
        }
        if !result.group_names.is_empty() {
            output.push_str(&format!("Named groups:   {}\n", result.group_names.join(", ")));
        }
        return output;
    }

    output.push_str("✗ Pattern is invalid\n");
    if let Some(ref error) = result.error {
        output.push('\n');
        output.push_str(&format!("Error: {} ({})\n", error.message, error.kind));
        output.push_str(&format!("  {}\n", result.pattern));
        output.push_str(&format!("  {}^\n", " ".repeat(error.position)));
    }
    if let Some(ref suggestion) = result.suggestion {
        output.push_str(&format!("\nSuggestion: {}\n", suggestion));
    }

    output
}

/// Format ExplainResult as human-readable text
pub fn format_explain_result(result: &ExplainResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Pattern: {}\n\n", result.pattern));
    output.push_str("Breakdown:\n");

    fn format_parts(parts: &[ExplainPart], indent: usize, output: &mut String) {
        let indent_str = "  ".repeat(indent);
        for part in parts {
            let quantifier_str = part
                .quantifier
                .as_ref()
                .map(|q| format!(" ({})", q))
                .unwrap_or_default();
            let group_str = part
                .group
                .map(|g| format!(" [group {}]", g))
                .unwrap_or_default();

            output.push_str(&format!(
                "{}• {} [{}]{}{}\n",
                indent_str, part.token, part.token_type, quantifier_str, group_str
            ));
            output.push_str(&format!("{}  {}\n", indent_str, part.desc));

            if let Some(ref children) = part.children {
                format_parts(children, indent + 1, output);
            }
        }
    }

    format_parts(&result.parts, 0, &mut output);

    output.push('\n');
    output.push_str(&format!("Summary: {}\n", result.summary));

    output
}

/// Format BenchmarkResult as human-readable text
pub fn format_benchmark_result(result: &BenchmarkResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Pattern: {}\n", result.pattern));
    output.push_str(&format!("Input:   {} codepoints\n", result.input_length));
    output.push_str(&format!("Budget:  {} backtracks\n\n", result.backtrack_limit));

    output.push_str("Performance:\n");
    output.push_str(&format!("  Iterations: {}\n", result.iterations));
    output.push_str(&format!("  Average:    {:.1}μs\n", result.avg_us));
    output.push_str(&format!("  Median:     {:.1}μs\n", result.median_us));
    output.push_str(&format!("  Std dev:    {:.1}μs\n", result.stddev_us));
    output.push_str(&format!(
        "  Throughput: {:.2} MB/s\n",
        result.throughput_mb_s
    ));

    output.push('\n');
    if result.catastrophic_backtracking {
        output.push_str("⚠ CATASTROPHIC BACKTRACKING DETECTED\n");
        if let Some(ref warning) = result.warning {
            output.push_str(&format!("  {}\n", warning));
        }
        if let Some(ref suggestion) = result.suggestion {
            output.push_str(&format!("  Suggestion: {}\n", suggestion));
        }
    } else {
        output.push_str("✓ No backtracking issues detected\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_absent_capture() {
        let result = TestResult {
            pattern: "(a)|(b)".to_string(),
            flags: Flags::default(),
            input_length: 1,
            matched: true,
            match_count: 1,
            truncated: false,
            matches: vec![Match {
                text: "b".to_string(),
                start: 0,
                end: 1,
                captures: vec![
                    Capture {
                        group: 1,
                        name: None,
                        text: None,
                    },
                    Capture {
                        group: 2,
                        name: None,
                        text: Some("b".to_string()),
                    },
                ],
            }],
            elapsed_us: 3,
        };
        let text = format_test_result(&result);
        assert!(text.contains("Group 1: <none>"));
        assert!(text.contains("Group 2: \"b\""));
        assert!(text.contains("1 match found"));
    }

    #[test]
    fn test_format_validate_caret() {
        let result = ValidateResult {
            pattern: "ab(c".to_string(),
            valid: false,
            error: Some(ValidationError {
                kind: "unclosed_group".to_string(),
                position: 2,
                message: "unclosed group".to_string(),
            }),
            capture_count: None,
            group_names: Vec::new(),
            suggestion: None,
        };
        let text = format_validate_result(&result);
        assert!(text.contains("  ab(c\n    ^\n"));
    }
}
