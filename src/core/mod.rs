//! Command implementations
//!
//! This module contains the logic behind each rexp command. The engine
//! itself lives in the `rexp` library.

pub mod benchmark;
pub mod explain;
pub mod input;
pub mod replace;
pub mod split;
pub mod test;
pub mod validate;

// Re-export commonly used types
pub use benchmark::{benchmark_file, benchmark_pattern, BenchmarkOptions};
pub use explain::explain_pattern;
pub use replace::{replace_file_preview, replace_string};
pub use split::split_string;
pub use test::{check_string, test_source, TestOptions};
pub use validate::validate_pattern;
