//! Implementation of the `agent-demo history` command.

use super::Harness;
use crate::cli::HistoryArgs;
use crate::error::Result;
use crate::events::{Event, EventAction, read_recent_events};
use chrono::Local;

/// Execute the `agent-demo history` command.
pub fn cmd_history(harness: &Harness, args: HistoryArgs) -> Result<()> {
    let events = read_recent_events(&harness.ctx, args.tail)?;

    if events.is_empty() {
        println!("No runs recorded yet.");
        return Ok(());
    }

    for event in &events {
        println!("{}", format_event(event));
    }

    Ok(())
}

/// One history line: local time, action, agent, and a short summary.
pub(crate) fn format_event(event: &Event) -> String {
    let ts = event.ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    let agent = event.agent.as_deref().unwrap_or("-");
    let summary = match event.action {
        EventAction::RunComplete => {
            let status = event.details["status"].as_str().unwrap_or("unknown");
            let exit = event.details["exit_code"]
                .as_i64()
                .map(|c| format!(" (exit {})", c))
                .unwrap_or_default();
            let duration = event.details["duration_ms"]
                .as_u64()
                .map(|ms| format!(" in {}ms", ms))
                .unwrap_or_default();
            format!("{}{}{}", status, exit, duration)
        }
        EventAction::Export => event.details["path"].as_str().unwrap_or("").to_string(),
        EventAction::RunStart | EventAction::LockClear => String::new(),
    };

    let mut line = format!("{}  {:<12}  {:<24}", ts, event.action.to_string(), agent);
    if !summary.is_empty() {
        line.push_str("  ");
        line.push_str(&summary);
    }
    line.push_str(&format!("  [{}]", event.actor));
    line
}
