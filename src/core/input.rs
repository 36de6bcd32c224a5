//! Subject text sources shared by the commands

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use anyhow::{Context, Result};

/// Where a command reads its subject text from
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Text(&'a str),
    File(&'a Path),
    Stdin,
}

impl<'a> Source<'a> {
    /// Pick a source: a file wins over inline text, and stdin is the fallback
    pub fn pick(input: Option<&'a str>, file: Option<&'a Path>) -> Self {
        match (file, input) {
            (Some(path), _) => Source::File(path),
            (None, Some(text)) => Source::Text(text),
            (None, None) => Source::Stdin,
        }
    }

    pub fn read(self) -> Result<String> {
        match self {
            Source::Text(text) => Ok(text.to_string()),
            Source::File(path) => read_file(path),
            Source::Stdin => read_stdin(),
        }
    }
}

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}

pub fn read_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        eprintln!("rexp: reading from stdin (pipe data or press Ctrl-D when done)");
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_pick_prefers_file() {
        let path = Path::new("x.txt");
        assert!(matches!(Source::pick(Some("t"), Some(path)), Source::File(_)));
        assert!(matches!(Source::pick(Some("t"), None), Source::Text("t")));
        assert!(matches!(Source::pick(None, None), Source::Stdin));
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "héllo").unwrap();
        assert_eq!(Source::File(file.path()).read().unwrap(), "héllo");

        let err = read_file(Path::new("/nonexistent/rexp.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
