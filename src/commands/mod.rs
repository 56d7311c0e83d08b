//! Command implementations for agent-demo.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, and the `Harness` every command loads first: the resolved
//! context, the config, and the agent registry.

mod check;
mod history;
mod list;
mod run;
mod show;
mod unlock;

use crate::agent::{AgentDescriptor, AgentRegistry, LaunchSettings, validate_script};
use crate::cli::{Cli, Command, GlobalArgs};
use crate::config::Config;
use crate::context::{DemoContext, resolve_path};
use crate::error::{DemoError, Result};
use crate::events::{Event, append_event};
use crate::exit_codes;
use crate::session::SessionSlot;
use tracing::{debug, warn};

/// Loaded state shared by all commands.
#[derive(Debug)]
pub struct Harness {
    pub ctx: DemoContext,
    pub config: Config,
    pub registry: AgentRegistry,
    /// The latest run of this process; a second run is refused while it is active.
    pub sessions: SessionSlot,
}

impl Harness {
    /// Load config and registry for `ctx`.
    ///
    /// An explicit `--config` or `--agents` path must exist; the default
    /// locations fall back to built-in defaults when absent.
    pub fn load(ctx: DemoContext, global: &GlobalArgs) -> Result<Self> {
        let config = match &global.config {
            Some(path) => Config::load(resolve_path(&ctx.work_dir, path))?,
            None => Config::load_or_default(ctx.config_path())?,
        };

        let registry = match &global.agents {
            Some(path) => {
                let path = resolve_path(&ctx.work_dir, path);
                AgentRegistry::load(&path)?.ok_or_else(|| {
                    DemoError::UserError(format!(
                        "agents file '{}' does not exist",
                        path.display()
                    ))
                })?
            }
            None => AgentRegistry::load_or_builtin(ctx.agents_path())?,
        };

        debug!(
            work_dir = %ctx.work_dir.display(),
            agents = registry.len(),
            "harness loaded"
        );

        let sessions = SessionSlot::new(config.output_max_chars, config.output_keep_lines);

        Ok(Self {
            ctx,
            config,
            registry,
            sessions,
        })
    }

    pub fn launch_settings(&self) -> Result<LaunchSettings> {
        LaunchSettings::from_config(&self.config, &self.ctx)
    }

    /// Validate an agent's script as it would be launched.
    pub fn check_agent(&self, agent: &AgentDescriptor) -> std::result::Result<(), String> {
        let script = resolve_path(&self.ctx.work_dir, &agent.executable_path);
        validate_script(&script, &self.config.script_extension).map_err(|e| e.to_string())
    }
}

/// Append to the run history. Failures are logged, never returned.
pub fn record(ctx: &DemoContext, event: Event) {
    if let Err(e) = append_event(ctx, &event) {
        warn!(action = %event.action, error = %e, "failed to record run history");
    }
}

/// Dispatch a command to its implementation.
///
/// Returns the process exit code. A run that completes with a failing
/// status is not an `Err`; its status maps to the exit code instead.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let ctx = DemoContext::resolve()?;
    let mut harness = Harness::load(ctx, &cli.global)?;

    match cli.command {
        Command::List => list::cmd_list(&harness).map(|()| exit_codes::SUCCESS),
        Command::Show(args) => show::cmd_show(&harness, args).map(|()| exit_codes::SUCCESS),
        Command::Check(args) => check::cmd_check(&harness, args).map(|()| exit_codes::SUCCESS),
        Command::Run(args) => run::cmd_run(&mut harness, args, &mut std::io::stdout().lock()),
        Command::History(args) => {
            history::cmd_history(&harness, args).map(|()| exit_codes::SUCCESS)
        }
        Command::Unlock(args) => unlock::cmd_unlock(&harness, args).map(|()| exit_codes::SUCCESS),
    }
}
