//! Implementation of the `agent-demo unlock` command.
//!
//! Clears a run lock left behind by an interrupted run.

use super::{Harness, record};
use crate::cli::UnlockArgs;
use crate::error::Result;
use crate::events::{Event, EventAction};
use crate::locks::clear_run_lock;
use serde_json::json;

/// Execute the `agent-demo unlock` command.
pub fn cmd_unlock(harness: &Harness, args: UnlockArgs) -> Result<()> {
    let cleared = clear_run_lock(&harness.ctx, args.force)?;

    let mut event = Event::new(EventAction::LockClear);
    match &cleared {
        Some(info) => {
            println!("Cleared {}", info);
            event = event.with_agent(&info.metadata.agent).with_details(json!({
                "owner": info.metadata.owner,
                "pid": info.metadata.pid,
                "age": info.metadata.age_string(),
                "stale": info.is_stale,
            }));
        }
        None => {
            println!(
                "Cleared unreadable run lock at {}",
                harness.ctx.run_lock_path().display()
            );
        }
    }
    record(&harness.ctx, event);

    Ok(())
}
