//! Implementation of the `agent-demo check` command.
//!
//! Validates agent scripts without spawning anything.

use super::Harness;
use crate::agent::AgentDescriptor;
use crate::cli::CheckArgs;
use crate::error::{DemoError, Result};

/// Execute the `agent-demo check` command.
///
/// # Returns
///
/// * `Ok(())` - Every checked script is ready
/// * `Err(DemoError::ValidationError)` - At least one is not (exit code 2)
pub fn cmd_check(harness: &Harness, args: CheckArgs) -> Result<()> {
    let agents: Vec<&AgentDescriptor> = match &args.agent {
        Some(name) => vec![harness.registry.lookup(name)?],
        None => harness.registry.list().iter().collect(),
    };

    let mut failures = 0;
    for agent in &agents {
        match harness.check_agent(agent) {
            Ok(()) => println!("[OK]   {}: {}", agent.name, agent.executable_path.display()),
            Err(reason) => {
                failures += 1;
                println!("[FAIL] {}: {}", agent.name, reason);
            }
        }
    }

    if failures > 0 {
        return Err(DemoError::ValidationError(format!(
            "{} of {} agent(s) not ready",
            failures,
            agents.len()
        )));
    }

    Ok(())
}
