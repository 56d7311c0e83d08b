//! agent-demo: live demo harness for agent scripts.
//!
//! This is the main entry point for the `agent-demo` CLI. It parses arguments,
//! sets up diagnostics, dispatches to the appropriate command handler, and
//! maps errors to exit codes.

mod cli;
mod commands;
pub mod agent;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod locks;
pub mod logging;
pub mod session;
pub mod transcript;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init_tracing(cli.global.verbose, cli.global.log_json);

    match commands::dispatch(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // User-actionable message on stderr; the transcript owns stdout.
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
