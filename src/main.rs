//! rexp - command-line front-end for the rexp regex engine
//!
//! Test, split, replace, validate, explain and benchmark patterns. Output is
//! JSON by default.

#[cfg(feature = "cli")]
mod cli;
#[cfg(feature = "cli")]
mod core;
#[cfg(feature = "cli")]
mod logging;
#[cfg(feature = "cli")]
mod output;

use std::process::ExitCode;

fn main() -> ExitCode {
    #[cfg(feature = "cli")]
    {
        let args = cli::parse();
        if let Err(e) = args.log.setup_logging() {
            eprintln!("rexp: failed to set up logging: {}", e);
        }

        match cli::run(args) {
            Ok(output) => {
                println!("{}", output);
                ExitCode::SUCCESS
            }
            Err(e) => {
                // Structured error on stderr so callers can parse failures too
                let error = error_response(&e);
                eprintln!("{}", output::json::format_json_compact(&error));
                ExitCode::FAILURE
            }
        }
    }

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("CLI feature not enabled. Build with --features cli");
        ExitCode::FAILURE
    }
}

#[cfg(feature = "cli")]
fn error_response(err: &anyhow::Error) -> output::ErrorResponse {
    use output::{error_codes, ErrorResponse};

    if let Some(compile) = err.downcast_ref::<rexp::CompileError>() {
        return ErrorResponse::new(error_codes::INVALID_PATTERN, compile.to_string())
            .with_position(compile.position)
            .with_suggestion(core::validate::suggest_fix(compile));
    }
    if let Some(budget) = err.downcast_ref::<rexp::MatchError>() {
        return ErrorResponse::new(error_codes::BACKTRACK_LIMIT, budget.to_string())
            .with_suggestion("Run `rexp benchmark` on the pattern to find the backtracking hot spot");
    }
    ErrorResponse::new(error_codes::COMMAND_ERROR, format!("{:#}", err))
}
