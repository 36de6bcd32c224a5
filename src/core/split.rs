//! Implementation of `rexp split`

use anyhow::Result;
use rexp::Regex;

use crate::output::SplitResult;

/// Split `input` around every match of `re`
pub fn split_string(re: &Regex, input: &str) -> Result<SplitResult> {
    let pieces = rexp::split(re, input)?;
    Ok(SplitResult {
        pattern: re.as_str().to_string(),
        flags: re.options().into(),
        piece_count: pieces.len(),
        pieces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(pattern: &str, input: &str) -> SplitResult {
        split_string(&Regex::new(pattern).unwrap(), input).unwrap()
    }

    #[test]
    fn test_split_pieces() {
        let result = split(r"\s*,\s*", "a , b,c");
        assert_eq!(result.pieces, vec!["a", "b", "c"]);
        assert_eq!(result.piece_count, 3);
    }

    #[test]
    fn test_split_edges_are_empty() {
        let result = split("x", "xax");
        assert_eq!(result.pieces, vec!["", "a", ""]);
    }

    #[test]
    fn test_split_without_match() {
        let result = split("z", "abc");
        assert_eq!(result.pieces, vec!["abc"]);
    }
}
