//! CLI interface using clap
//!
//! Defines all command-line arguments and subcommands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::input::Source;
use crate::logging::LogArgs;
use crate::output::json::format_json;

#[derive(Parser)]
#[command(name = "rexp")]
#[command(author, version, about = "Backtracking regex engine: test, split, replace, validate, explain", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub regex: RegexArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output (default)
    Json,
    /// Human-readable text
    Text,
}

/// Compile flags shared by every command
#[derive(Args, Debug, Default)]
pub struct RegexArgs {
    /// Match letters regardless of case
    #[arg(long, short = 'i', global = true)]
    pub ignore_case: bool,

    /// Let ^ and $ match at line boundaries
    #[arg(long, short = 'm', global = true)]
    pub multi_line: bool,
}

impl RegexArgs {
    pub fn options(&self) -> rexp::Options {
        rexp::Options {
            case_insensitive: self.ignore_case,
            multi_line: self.multi_line,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find every match of a pattern in the input
    Test {
        /// The regex pattern to test
        pattern: String,

        /// Input text (reads stdin when neither this nor --file is given)
        input: Option<String>,

        /// File to test against
        #[arg(long, short = 'F')]
        file: Option<PathBuf>,

        /// Maximum number of matches to return
        #[arg(long, default_value = "100")]
        max_matches: usize,
    },

    /// Report whether a pattern matches anywhere in the input
    Check {
        pattern: String,

        input: Option<String>,

        #[arg(long, short = 'F')]
        file: Option<PathBuf>,
    },

    /// Split the input around every match
    Split {
        pattern: String,

        input: Option<String>,

        #[arg(long, short = 'F')]
        file: Option<PathBuf>,
    },

    /// Replace every match with literal text
    Replace {
        /// The regex pattern
        pattern: String,

        /// The replacement text, inserted as-is
        replacement: String,

        /// Input text to transform
        input: Option<String>,

        /// File to preview replacements on (never written)
        #[arg(long, short = 'F')]
        file: Option<PathBuf>,

        /// Maximum number of preview lines
        #[arg(long, default_value = "20")]
        max_preview: usize,
    },

    /// Validate regex syntax
    Validate {
        /// The regex pattern to validate
        pattern: String,
    },

    /// Explain a regex pattern
    Explain {
        /// The regex pattern to explain
        pattern: String,
    },

    /// Benchmark a pattern and detect catastrophic backtracking
    Benchmark {
        /// The regex pattern to benchmark
        pattern: String,

        /// Input text (generated adversarial input when omitted)
        #[arg(long)]
        input: Option<String>,

        /// File to benchmark against
        #[arg(long, short = 'F')]
        file: Option<PathBuf>,

        /// Timeout in milliseconds
        #[arg(long, default_value = "5000")]
        timeout_ms: u64,

        /// Number of iterations
        #[arg(long, default_value = "100")]
        iterations: usize,

        /// Backtracks allowed per scan
        #[arg(long, default_value_t = rexp::DEFAULT_BACKTRACK_LIMIT)]
        backtrack_limit: usize,
    },
}

/// Parse CLI arguments
pub fn parse() -> Cli {
    Cli::parse()
}

/// Run a parsed command, returning its formatted output
pub fn run(cli: Cli) -> Result<String> {
    let format = cli.format;
    let options = cli.regex.options();

    match cli.command {
        Commands::Test {
            pattern,
            input,
            file,
            max_matches,
        } => handle_test(
            &pattern,
            Source::pick(input.as_deref(), file.as_deref()),
            max_matches,
            options,
            format,
        ),
        Commands::Check {
            pattern,
            input,
            file,
        } => handle_check(
            &pattern,
            Source::pick(input.as_deref(), file.as_deref()),
            options,
            format,
        ),
        Commands::Split {
            pattern,
            input,
            file,
        } => handle_split(
            &pattern,
            Source::pick(input.as_deref(), file.as_deref()),
            options,
            format,
        ),
        Commands::Replace {
            pattern,
            replacement,
            input,
            file,
            max_preview,
        } => handle_replace(
            &pattern,
            &replacement,
            input.as_deref(),
            file.as_deref(),
            max_preview,
            options,
            format,
        ),
        Commands::Validate { pattern } => handle_validate(&pattern, options, format),
        Commands::Explain { pattern } => handle_explain(&pattern, format),
        Commands::Benchmark {
            pattern,
            input,
            file,
            timeout_ms,
            iterations,
            backtrack_limit,
        } => {
            let bench = crate::core::BenchmarkOptions {
                iterations,
                timeout_ms,
                backtrack_limit,
                regex: options,
            };
            handle_benchmark(&pattern, input.as_deref(), file.as_deref(), &bench, format)
        }
    }
}

/// Handle the test command
pub fn handle_test(
    pattern: &str,
    source: Source<'_>,
    max_matches: usize,
    options: rexp::Options,
    format: OutputFormat,
) -> Result<String> {
    use crate::core::{test_source, TestOptions};
    use crate::output::text::format_test_result;

    let test_options = TestOptions {
        max_matches: Some(max_matches),
        regex: options,
    };
    let result = test_source(pattern, source, &test_options)?;

    Ok(match format {
        OutputFormat::Json => format_json(&result),
        OutputFormat::Text => format_test_result(&result),
    })
}

/// Handle the check command
pub fn handle_check(
    pattern: &str,
    source: Source<'_>,
    options: rexp::Options,
    format: OutputFormat,
) -> Result<String> {
    use crate::core::check_string;
    use crate::output::text::format_check_result;

    let re = rexp::compile(pattern, options)?;
    let result = check_string(&re, &source.read()?)?;

    Ok(match format {
        OutputFormat::Json => format_json(&result),
        OutputFormat::Text => format_check_result(&result),
    })
}

/// Handle the split command
pub fn handle_split(
    pattern: &str,
    source: Source<'_>,
    options: rexp::Options,
    format: OutputFormat,
) -> Result<String> {
    use crate::core::split_string;
    use crate::output::text::format_split_result;

    let re = rexp::compile(pattern, options)?;
    let result = split_string(&re, &source.read()?)?;

    Ok(match format {
        OutputFormat::Json => format_json(&result),
        OutputFormat::Text => format_split_result(&result),
    })
}

/// Handle the replace command
pub fn handle_replace(
    pattern: &str,
    replacement: &str,
    input: Option<&str>,
    file: Option<&Path>,
    max_preview: usize,
    options: rexp::Options,
    format: OutputFormat,
) -> Result<String> {
    use crate::core::{replace_file_preview, replace_string};
    use crate::output::text::{format_replace_file_result, format_replace_result};

    let re = rexp::compile(pattern, options)?;
    if let Some(file_path) = file {
        let result = replace_file_preview(&re, replacement, file_path, Some(max_preview))?;
        return Ok(match format {
            OutputFormat::Json => format_json(&result),
            OutputFormat::Text => format_replace_file_result(&result),
        });
    }

    let text = Source::pick(input, None).read()?;
    let result = replace_string(&re, replacement, &text)?;
    Ok(match format {
        OutputFormat::Json => format_json(&result),
        OutputFormat::Text => format_replace_result(&result),
    })
}

/// Handle the validate command
pub fn handle_validate(
    pattern: &str,
    options: rexp::Options,
    format: OutputFormat,
) -> Result<String> {
    use crate::core::validate_pattern;
    use crate::output::text::format_validate_result;

    let result = validate_pattern(pattern, options);

    Ok(match format {
        OutputFormat::Json => format_json(&result),
        OutputFormat::Text => format_validate_result(&result),
    })
}

/// Handle the explain command
pub fn handle_explain(pattern: &str, format: OutputFormat) -> Result<String> {
    use crate::core::explain_pattern;
    use crate::output::text::format_explain_result;

    let result = explain_pattern(pattern)?;

    Ok(match format {
        OutputFormat::Json => format_json(&result),
        OutputFormat::Text => format_explain_result(&result),
    })
}

/// Handle the benchmark command
pub fn handle_benchmark(
    pattern: &str,
    input: Option<&str>,
    file: Option<&Path>,
    options: &crate::core::BenchmarkOptions,
    format: OutputFormat,
) -> Result<String> {
    use crate::core::benchmark::generate_redos_input;
    use crate::core::{benchmark_file, benchmark_pattern};
    use crate::output::text::format_benchmark_result;

    let result = if let Some(file_path) = file {
        benchmark_file(pattern, file_path, options)?
    } else if let Some(text) = input {
        benchmark_pattern(pattern, text, options)?
    } else {
        // Generate adversarial input for ReDoS testing
        let evil_input = generate_redos_input(pattern);
        benchmark_pattern(pattern, &evil_input, options)?
    };

    Ok(match format {
        OutputFormat::Json => format_json(&result),
        OutputFormat::Text => format_benchmark_result(&result),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["rexp", "check", "ABC", "abc", "-i", "--format", "text"])
            .unwrap();
        assert!(cli.regex.options().case_insensitive);
        assert!(!cli.regex.options().multi_line);
        assert!(cli.format == OutputFormat::Text);
    }

    #[test]
    fn test_run_split() {
        let cli = Cli::try_parse_from(["rexp", "split", ",", "a,b"]).unwrap();
        let output = run(cli).unwrap();
        assert!(output.contains("\"piece_count\": 2"));
    }
}
