//! CLI argument parsing for agent-demo.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// agent-demo: live demo harness for hotel agent scripts.
///
/// Pick an agent, run its script with a controlled environment, and watch the
/// sanitized output stream into a bounded terminal panel:
/// - Agents come from `agents.yaml` (or the built-in hotel set)
/// - Scripts are validated before anything is spawned
/// - Transcripts can be exported to timestamped text files
#[derive(Parser, Debug)]
#[command(name = "agent-demo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default: .agent-demo/config.yaml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Agents registry file (default: agents.yaml, else the built-in agents).
    #[arg(long, global = true, value_name = "PATH")]
    pub agents: Option<PathBuf>,

    /// Log diagnostics at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Emit diagnostics as JSON lines on stderr.
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub log_json: bool,
}

/// Available commands for agent-demo.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available agents with their readiness.
    #[command(alias = "ls")]
    List,

    /// Show an agent's details and whether its script is ready.
    Show(ShowArgs),

    /// Validate agent scripts without running them.
    ///
    /// Checks one agent, or every registered agent when none is given.
    /// Exits with code 2 if any script fails validation.
    Check(CheckArgs),

    /// Run an agent and stream its output live.
    ///
    /// Prints the transcript as it is produced, followed by a status bar.
    Run(RunArgs),

    /// Show recent runs from the run history.
    History(HistoryArgs),

    /// Clear a stale run lock left behind by an interrupted run.
    Unlock(UnlockArgs),
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Agent name (case-insensitive if unambiguous).
    pub agent: String,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Agent to check. If omitted, checks all agents.
    pub agent: Option<String>,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Agent name (case-insensitive if unambiguous).
    pub agent: String,

    /// Kill the agent after this many seconds (overrides config).
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Export the transcript when the run finishes.
    #[arg(long, action = ArgAction::SetTrue)]
    pub export: bool,

    /// Directory for the exported transcript (implies --export).
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Do not print the status bar after the run.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_status_bar: bool,
}

/// Arguments for the `history` command.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Number of most recent events to show.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub tail: usize,
}

/// Arguments for the `unlock` command.
#[derive(Parser, Debug)]
pub struct UnlockArgs {
    /// Required: the lock may belong to a run that is still active.
    #[arg(long, action = ArgAction::SetTrue)]
    pub force: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
