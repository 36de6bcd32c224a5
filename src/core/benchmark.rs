//! Implementation of `rexp benchmark`
//!
//! Times repeated scans of an input and detects catastrophic backtracking,
//! either from the engine's backtrack budget tripping or from timings that
//! blow up.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use rexp::ast::{Ast, GroupKind};
use rexp::{MatchError, RegexBuilder, DEFAULT_BACKTRACK_LIMIT};

use super::input::read_file;
use crate::output::BenchmarkResult;

/// Options for benchmarking
pub struct BenchmarkOptions {
    /// Number of iterations to run
    pub iterations: usize,
    /// Timeout in milliseconds for the whole run
    pub timeout_ms: u64,
    /// Backtracks allowed per scan before giving up
    pub backtrack_limit: usize,
    pub regex: rexp::Options,
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            iterations: 100,
            timeout_ms: 5000,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            regex: rexp::Options::default(),
        }
    }
}

/// Benchmark a pattern against input
pub fn benchmark_pattern(
    pattern: &str,
    input: &str,
    options: &BenchmarkOptions,
) -> Result<BenchmarkResult> {
    let re = RegexBuilder::new(pattern)
        .options(options.regex)
        .backtrack_limit(options.backtrack_limit)
        .build()?;

    let timeout = Duration::from_millis(options.timeout_ms);
    let mut timings_ns: Vec<u64> = Vec::with_capacity(options.iterations);
    let start_total = Instant::now();
    let mut budget_tripped = false;
    let mut timed_out = false;

    for _ in 0..options.iterations {
        if start_total.elapsed() > timeout {
            timed_out = true;
            break;
        }

        let start = Instant::now();
        let outcome = re.scan(input);
        timings_ns.push(start.elapsed().as_nanos() as u64);

        if let Err(MatchError::BacktrackLimitExceeded { .. }) = outcome {
            budget_tripped = true;
            break;
        }
    }

    let stats = Stats::from_timings(&mut timings_ns);
    let throughput_mb_s = if stats.avg_ns > 0.0 {
        (input.len() as f64 / 1_000_000.0) / (stats.avg_ns / 1_000_000_000.0)
    } else {
        0.0
    };

    // Slow enough to matter (>1ms) and erratic relative to the mean
    let erratic = stats.avg_ns > 1_000_000.0 && stats.stddev_ns > stats.avg_ns * 2.0;
    let catastrophic = budget_tripped || erratic;

    let warning = if budget_tripped {
        Some(format!(
            "Scan exceeded the backtrack limit of {}; the pattern backtracks exponentially on this input",
            options.backtrack_limit
        ))
    } else if erratic {
        Some("Pattern exhibits exponential time complexity".to_string())
    } else if timed_out {
        Some("Benchmark timed out before completing all iterations".to_string())
    } else {
        None
    };

    Ok(BenchmarkResult {
        pattern: pattern.to_string(),
        input_length: input.chars().count(),
        iterations: timings_ns.len(),
        avg_us: stats.avg_ns / 1_000.0,
        median_us: stats.median_ns / 1_000.0,
        stddev_us: stats.stddev_ns / 1_000.0,
        throughput_mb_s,
        backtrack_limit: options.backtrack_limit,
        catastrophic_backtracking: catastrophic,
        timeout: timed_out.then_some(true),
        warning,
        suggestion: if catastrophic {
            suggest_fix(pattern)
        } else {
            None
        },
    })
}

/// Benchmark a pattern against a file
pub fn benchmark_file(
    pattern: &str,
    file_path: &Path,
    options: &BenchmarkOptions,
) -> Result<BenchmarkResult> {
    let content = read_file(file_path)?;
    benchmark_pattern(pattern, &content, options)
}

#[derive(Debug, Default)]
struct Stats {
    avg_ns: f64,
    median_ns: f64,
    stddev_ns: f64,
}

impl Stats {
    fn from_timings(timings_ns: &mut [u64]) -> Self {
        if timings_ns.is_empty() {
            return Self::default();
        }
        timings_ns.sort_unstable();
        let n = timings_ns.len() as f64;
        let avg_ns = timings_ns.iter().sum::<u64>() as f64 / n;
        let median_ns = timings_ns[timings_ns.len() / 2] as f64;
        let stddev_ns = if timings_ns.len() > 1 {
            let variance = timings_ns
                .iter()
                .map(|&t| (t as f64 - avg_ns).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            variance.sqrt()
        } else {
            0.0
        };
        Self {
            avg_ns,
            median_ns,
            stddev_ns,
        }
    }
}

/// Build an input likely to trigger backtracking in `pattern`.
///
/// Repeats the first literal character the pattern needs, then appends a
/// character that makes the overall match fail.
pub fn generate_redos_input(pattern: &str) -> String {
    let seed = rexp::parse::parse(pattern)
        .ok()
        .and_then(|ast| first_literal(&ast))
        .unwrap_or('a');
    let tail = if seed == '!' { '?' } else { '!' };
    let mut input: String = std::iter::repeat(seed).take(30).collect();
    input.push(tail);
    input
}

fn first_literal(ast: &Ast) -> Option<char> {
    match ast {
        Ast::Literal(c) => Some(*c),
        Ast::Dot | Ast::Perl(_) | Ast::Class(_) => None,
        Ast::Group(group) => first_literal(&group.ast),
        Ast::Repetition(rep) => first_literal(&rep.ast),
        Ast::Concat(asts) | Ast::Alternation(asts) => asts.iter().find_map(first_literal),
        _ => None,
    }
}

/// Detect a structural ReDoS risk in a pattern
pub fn detect_redos_vulnerability(pattern: &str) -> Option<String> {
    let ast = rexp::parse::parse(pattern).ok()?;
    find_risk(&ast, false)
}

/// `in_loop` is set below an unbounded repetition
fn find_risk(ast: &Ast, in_loop: bool) -> Option<String> {
    match ast {
        Ast::Repetition(rep) => {
            let unbounded = rep.max.is_none();
            if in_loop && unbounded {
                return Some("Nested quantifiers".to_string());
            }
            if unbounded {
                if let Ast::Alternation(branches) = unwrap_groups(&rep.ast) {
                    if has_overlapping_branches(branches) {
                        return Some("Overlapping alternation with quantifier".to_string());
                    }
                }
            }
            find_risk(&rep.ast, in_loop || unbounded)
        }
        Ast::Group(group) => match group.kind {
            // Lookahead bodies are atomic, so nothing inside can blow up the outer loop
            GroupKind::LookAhead { .. } => find_risk(&group.ast, false),
            _ => find_risk(&group.ast, in_loop),
        },
        Ast::Concat(asts) | Ast::Alternation(asts) => {
            asts.iter().find_map(|ast| find_risk(ast, in_loop))
        }
        _ => None,
    }
}

fn unwrap_groups(ast: &Ast) -> &Ast {
    match ast {
        Ast::Group(group) if !matches!(group.kind, GroupKind::LookAhead { .. }) => {
            unwrap_groups(&group.ast)
        }
        _ => ast,
    }
}

/// Whether two branches can start with the same literal, or one can be empty
fn has_overlapping_branches(branches: &[Ast]) -> bool {
    if branches.iter().any(Ast::can_match_empty) {
        return true;
    }
    let firsts: Vec<Option<char>> = branches.iter().map(first_literal).collect();
    firsts
        .iter()
        .enumerate()
        .any(|(i, a)| a.is_some() && firsts[i + 1..].contains(a))
}

/// Suggest fix for ReDoS vulnerable patterns
fn suggest_fix(pattern: &str) -> Option<String> {
    let risk = detect_redos_vulnerability(pattern)?;
    let hint = if risk.starts_with("Nested") {
        "Remove the inner quantifier, e.g. (a+)+ becomes a+, or make the inner part atomic with (?=(a+))\\1"
    } else {
        "Make the alternatives mutually exclusive, e.g. (a|aa)+ becomes a+"
    };
    Some(hint.to_string())
}
