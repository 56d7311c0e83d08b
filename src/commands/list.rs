//! Implementation of the `agent-demo list` command.
//!
//! The selector view: every agent with its tag, script, and readiness.

use super::Harness;
use crate::error::Result;

/// One row of the selector view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AgentRow {
    pub label: String,
    pub script: String,
    pub ready: bool,
}

pub(crate) fn agent_rows(harness: &Harness) -> Vec<AgentRow> {
    harness
        .registry
        .list()
        .iter()
        .map(|agent| AgentRow {
            label: agent.label(),
            script: agent.executable_path.display().to_string(),
            ready: harness.check_agent(agent).is_ok(),
        })
        .collect()
}

/// Execute the `agent-demo list` command.
pub fn cmd_list(harness: &Harness) -> Result<()> {
    let rows = agent_rows(harness);
    let label_width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    let script_width = rows.iter().map(|r| r.script.chars().count()).max().unwrap_or(0);

    println!("Agents ({})", rows.len());
    println!();
    for row in &rows {
        println!(
            "  {:label_width$}  {:script_width$}  {}",
            row.label,
            row.script,
            if row.ready { "ready" } else { "NOT READY" },
        );
    }

    let not_ready = rows.iter().filter(|r| !r.ready).count();
    if not_ready > 0 {
        println!();
        println!(
            "{} agent(s) not ready. Use `agent-demo check` for details.",
            not_ready
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GlobalArgs;
    use crate::context::DemoContext;
    use crate::test_support::write_sh_workspace;
    use tempfile::TempDir;

    #[test]
    fn test_rows_follow_registry_order_and_readiness() {
        let temp_dir = TempDir::new().unwrap();
        write_sh_workspace(
            temp_dir.path(),
            &[("Check-in Processor", "checkin.sh"), ("HR Assistant", "hr.sh")],
        );
        std::fs::write(temp_dir.path().join("hr.sh"), "echo hr\n").unwrap();
        let ctx = DemoContext::resolve_from(temp_dir.path()).unwrap();
        let harness = Harness::load(ctx, &GlobalArgs::default()).unwrap();

        let rows = agent_rows(&harness);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Check-in Processor");
        assert!(!rows[0].ready);
        assert_eq!(rows[1].script, "hr.sh");
        assert!(rows[1].ready);
    }

    #[test]
    fn test_builtin_rows_carry_tags() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = DemoContext::resolve_from(temp_dir.path()).unwrap();
        let harness = Harness::load(ctx, &GlobalArgs::default()).unwrap();

        let rows = agent_rows(&harness);
        assert!(rows.iter().all(|r| r.label.starts_with('[')));
        assert!(rows.iter().all(|r| !r.ready));
    }
}
