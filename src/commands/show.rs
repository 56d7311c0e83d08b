//! Implementation of the `agent-demo show` command.
//!
//! Displays an agent's descriptor and whether its script is ready to run.

use super::Harness;
use crate::cli::ShowArgs;
use crate::error::Result;

/// Execute the `agent-demo show` command.
pub fn cmd_show(harness: &Harness, args: ShowArgs) -> Result<()> {
    let agent = harness.registry.lookup(&args.agent)?;

    println!("================================================================================");
    println!("{}", agent.label());
    println!("================================================================================");
    println!();

    println!("Script:          {}", agent.executable_path.display());
    if !agent.description.is_empty() {
        println!("Description:     {}", agent.description);
    }
    if !agent.demo_scenario.is_empty() {
        println!("Demo Scenario:   {}", agent.demo_scenario);
    }
    if !agent.expected_output.is_empty() {
        println!("Expected Output: {}", agent.expected_output);
    }
    println!();

    match harness.check_agent(agent) {
        Ok(()) => println!(
            "[SUCCESS] Agent Ready: {} is accessible",
            agent.executable_path.display()
        ),
        Err(reason) => println!("[ERROR] File Validation Failed: {}", reason),
    }

    Ok(())
}
