//! Run history for agent-demo.
//!
//! Every run, export, and lock clear is appended to
//! `.agent-demo/events.ndjson`, one JSON object per line.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `run_start`, `run_complete`, `export`, or `lock_clear`
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `agent`: the agent name, when the event concerns one
//! - `details`: action-specific object; `run_complete` carries `status`,
//!   `exit_code`, `started_at`, `finished_at`, `duration_ms`, and `lines`
//!
//! History is advisory: callers log a failed append and carry on.

use crate::context::DemoContext;
use crate::error::{DemoError, Result};
use crate::locks::owner_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use tracing::debug;

/// Actions recorded in the run history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    RunStart,
    RunComplete,
    /// Transcript exported to a file
    Export,
    /// Run lock cleared manually
    LockClear,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::RunStart => write!(f, "run_start"),
            EventAction::RunComplete => write!(f, "run_complete"),
            EventAction::Export => write!(f, "export"),
            EventAction::LockClear => write!(f, "lock_clear"),
        }
    }
}

/// One history record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    /// Who performed the action (e.g., `user@HOST`).
    pub actor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Action-specific details.
    #[serde(default)]
    pub details: Value,
}

impl Event {
    /// New event stamped now, attributed to the current user.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: owner_string(),
            agent: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| DemoError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Append an event to the history file, creating it if needed.
///
/// # Returns
///
/// * `Ok(())` - The event was written and synced
/// * `Err(DemoError::UserError)` - Serialization or write failed
pub fn append_event(ctx: &DemoContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    if !ctx.state_dir.exists() {
        fs::create_dir_all(&ctx.state_dir).map_err(|e| {
            DemoError::UserError(format!(
                "failed to create state directory '{}': {}",
                ctx.state_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            DemoError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        DemoError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        DemoError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Read the last `limit` parseable events, oldest first.
///
/// A missing history file is an empty history. Lines that fail to parse are
/// skipped.
pub fn read_recent_events(ctx: &DemoContext, limit: usize) -> Result<Vec<Event>> {
    let events_file = ctx.events_file();
    if !events_file.exists() {
        return Ok(Vec::new());
    }

    let file = fs::File::open(&events_file).map_err(|e| {
        DemoError::UserError(format!(
            "failed to open events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    let mut recent = VecDeque::with_capacity(limit.min(1024));
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            DemoError::UserError(format!(
                "failed to read events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(&line) {
            Ok(event) => {
                if recent.len() == limit {
                    recent.pop_front();
                }
                if limit > 0 {
                    recent.push_back(event);
                }
            }
            Err(e) => debug!(line = index + 1, error = %e, "skipping malformed history line"),
        }
    }

    Ok(recent.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_context() -> (TempDir, DemoContext) {
        let temp_dir = TempDir::new().unwrap();
        let ctx = DemoContext::resolve_from(temp_dir.path()).unwrap();
        (temp_dir, ctx)
    }

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::RunStart);

        assert_eq!(event.action, EventAction::RunStart);
        assert!(event.actor.contains('@'));
        assert!(event.agent.is_none());
        assert!(event.details.is_object());
    }

    #[test]
    fn test_event_serialization_is_single_line() {
        let event = Event::new(EventAction::RunComplete)
            .with_agent("HR Assistant")
            .with_details(json!({"status": "success", "exit_code": 0}));

        let line = event.to_ndjson_line().unwrap();
        assert!(!line.contains('\n'));

        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["action"], "run_complete");
        assert_eq!(value["agent"], "HR Assistant");
        assert_eq!(value["details"]["exit_code"], 0);
    }

    #[test]
    fn test_event_without_agent_omits_field() {
        let line = Event::new(EventAction::LockClear).to_ndjson_line().unwrap();
        assert!(!line.contains("\"agent\""));
    }

    #[test]
    fn test_event_action_display_matches_serde() {
        for action in [
            EventAction::RunStart,
            EventAction::RunComplete,
            EventAction::Export,
            EventAction::LockClear,
        ] {
            let serialized = serde_json::to_string(&action).unwrap();
            assert_eq!(serialized, format!("\"{}\"", action));
        }
    }

    #[test]
    fn test_append_event_creates_state_dir_and_file() {
        let (_temp_dir, ctx) = create_test_context();
        assert!(!ctx.state_dir.exists());

        append_event(&ctx, &Event::new(EventAction::RunStart)).unwrap();

        let content = std::fs::read_to_string(ctx.events_file()).unwrap();
        assert!(content.ends_with('\n'));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_read_recent_events_returns_tail_in_order() {
        let (_temp_dir, ctx) = create_test_context();
        for i in 0..5 {
            let event = Event::new(EventAction::RunStart).with_details(json!({"n": i}));
            append_event(&ctx, &event).unwrap();
        }

        let events = read_recent_events(&ctx, 2).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].details["n"], 3);
        assert_eq!(events[1].details["n"], 4);
    }

    #[test]
    fn test_read_recent_events_skips_malformed_lines() {
        let (_temp_dir, ctx) = create_test_context();
        append_event(&ctx, &Event::new(EventAction::RunStart)).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(ctx.events_file())
            .unwrap();
        writeln!(file, "{{not json").unwrap();
        append_event(&ctx, &Event::new(EventAction::Export)).unwrap();

        let events = read_recent_events(&ctx, 10).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].action, EventAction::Export);
    }

    #[test]
    fn test_read_recent_events_missing_file_is_empty() {
        let (_temp_dir, ctx) = create_test_context();
        assert!(read_recent_events(&ctx, 10).unwrap().is_empty());
    }

    #[test]
    fn test_read_recent_events_zero_limit() {
        let (_temp_dir, ctx) = create_test_context();
        append_event(&ctx, &Event::new(EventAction::RunStart)).unwrap();
        assert!(read_recent_events(&ctx, 0).unwrap().is_empty());
    }
}
