//! Implementation of `rexp replace`
//!
//! Replacement text is inserted literally. With `--file` the command only
//! previews changes; the file is never written.

use std::path::Path;

use anyhow::Result;
use rexp::Regex;

use super::input::read_file;
use crate::output::{ReplaceFileResult, ReplacePreview, ReplaceResult};

/// Replace every match of `re` in `input`
pub fn replace_string(re: &Regex, replacement: &str, input: &str) -> Result<ReplaceResult> {
    let (result, count) = replace_counted(re, input, replacement)?;

    Ok(ReplaceResult {
        pattern: re.as_str().to_string(),
        replacement: replacement.to_string(),
        original: input.to_string(),
        result,
        replacements_made: count,
    })
}

/// Preview replacements in a file (dry-run)
pub fn replace_file_preview(
    re: &Regex,
    replacement: &str,
    file_path: &Path,
    max_preview: Option<usize>,
) -> Result<ReplaceFileResult> {
    let content = read_file(file_path)?;
    let max_preview = max_preview.unwrap_or(20);

    let (total, preview, lines_changed) = if re.options().multi_line {
        // Matches may cross lines, so replace the whole file at once and diff
        let (new_content, count) = replace_counted(re, &content, replacement)?;
        let (preview, changed) = diff_preview(&content, &new_content, max_preview);
        (count, preview, changed)
    } else {
        let mut total = 0;
        let mut changed = 0;
        let mut preview = Vec::new();
        for (i, line) in content.lines().enumerate() {
            let (new_line, count) = replace_counted(re, line, replacement)?;
            if count == 0 {
                continue;
            }
            total += count;
            changed += 1;
            if preview.len() < max_preview {
                preview.push(ReplacePreview {
                    line: i + 1,
                    before: line.to_string(),
                    after: new_line,
                });
            }
        }
        (total, preview, changed)
    };

    Ok(ReplaceFileResult {
        pattern: re.as_str().to_string(),
        replacement: replacement.to_string(),
        file_path: file_path.display().to_string(),
        replacements_made: total,
        lines_changed,
        preview,
    })
}

fn replace_counted(re: &Regex, text: &str, replacement: &str) -> Result<(String, usize)> {
    let mut count = 0;
    let result = re.replace_with(text, |_| {
        count += 1;
        replacement.to_string()
    })?;
    Ok((result, count))
}

/// Line-by-line diff of two versions of a file
fn diff_preview(original: &str, new_content: &str, max_preview: usize) -> (Vec<ReplacePreview>, usize) {
    let original_lines: Vec<&str> = original.lines().collect();
    let new_lines: Vec<&str> = new_content.lines().collect();

    if original_lines.len() != new_lines.len() {
        // Lines were merged or split; show the whole file as one change
        if original == new_content {
            return (Vec::new(), 0);
        }
        let preview = ReplacePreview {
            line: 1,
            before: original.to_string(),
            after: new_content.to_string(),
        };
        return (vec![preview], original_lines.len());
    }

    let mut preview = Vec::new();
    let mut changed = 0;
    for (i, (before, after)) in original_lines.iter().zip(&new_lines).enumerate() {
        if before == after {
            continue;
        }
        changed += 1;
        if preview.len() < max_preview {
            preview.push(ReplacePreview {
                line: i + 1,
                before: before.to_string(),
                after: after.to_string(),
            });
        }
    }
    (preview, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn replace(pattern: &str, replacement: &str, input: &str) -> ReplaceResult {
        replace_string(&Regex::new(pattern).unwrap(), replacement, input).unwrap()
    }

    #[test]
    fn test_replace_literal() {
        let result = replace("a+", "X", "aaa-aa");
        assert_eq!(result.result, "X-X");
        assert_eq!(result.replacements_made, 2);
    }

    #[test]
    fn test_replacement_is_not_expanded() {
        let result = replace(r"(\d+)", "<$1>", "a1b");
        assert_eq!(result.result, "a<$1>b");
    }

    #[test]
    fn test_replace_empty_matches() {
        let result = replace("x*", "-", "ab");
        assert_eq!(result.result, "-a-b-");
        assert_eq!(result.replacements_made, 3);
    }

    #[test]
    fn test_file_preview_per_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "foo 1").unwrap();
        writeln!(file, "bar").unwrap();
        writeln!(file, "foo foo").unwrap();

        let re = Regex::new("foo").unwrap();
        let result = replace_file_preview(&re, "baz", file.path(), None).unwrap();
        assert_eq!(result.replacements_made, 3);
        assert_eq!(result.lines_changed, 2);
        assert_eq!(result.preview[1].line, 3);
        assert_eq!(result.preview[1].after, "baz baz");

        // Never written
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with("foo 1"));
    }

    #[test]
    fn test_file_preview_multi_line() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a\nb\nc\n").unwrap();

        let re = rexp::RegexBuilder::new("^b$").multi_line(true).build().unwrap();
        let result = replace_file_preview(&re, "B", file.path(), Some(5)).unwrap();
        assert_eq!(result.replacements_made, 1);
        assert_eq!(result.preview.len(), 1);
        assert_eq!(result.preview[0].line, 2);
        assert_eq!(result.preview[0].after, "B");
    }
}
