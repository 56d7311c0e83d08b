//! Terminal status of an agent run.

use crate::agent::ValidationError;
use crate::exit_codes;
use std::time::Duration;

/// How a run ended. Set exactly once, after the child has terminated or
/// failed to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// The agent exited with code 0.
    Success,
    /// The agent ran but exited with a nonzero code.
    NonZeroExit(i32),
    /// The script failed pre-flight validation; nothing was spawned.
    Invalid(ValidationError),
    /// The interpreter or the script vanished before the spawn.
    NotFound(String),
    /// The run exceeded its deadline and the agent was killed.
    TimedOut(Duration),
    /// Anything else that went wrong while spawning or streaming.
    UnexpectedError(String),
}

impl RunStatus {
    /// Whether the agent completed with exit code 0.
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success)
    }

    /// The agent's own exit code, when it exited normally.
    pub fn child_exit_code(&self) -> Option<i32> {
        match self {
            RunStatus::Success => Some(0),
            RunStatus::NonZeroExit(code) => Some(*code),
            _ => None,
        }
    }

    /// Stable snake_case label, used in the run history.
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::NonZeroExit(_) => "nonzero_exit",
            RunStatus::Invalid(_) => "invalid",
            RunStatus::NotFound(_) => "not_found",
            RunStatus::TimedOut(_) => "timed_out",
            RunStatus::UnexpectedError(_) => "unexpected_error",
        }
    }

    /// Exit code the CLI reports for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Success => exit_codes::SUCCESS,
            RunStatus::Invalid(_) => exit_codes::VALIDATION_FAILURE,
            _ => exit_codes::AGENT_FAILURE,
        }
    }

    /// The final transcript line describing this outcome.
    pub fn summary_line(&self) -> String {
        match self {
            RunStatus::Success => "[SUCCESS] Agent completed successfully (exit code: 0)".to_string(),
            RunStatus::NonZeroExit(code) => {
                format!("[WARNING] Agent completed with exit code: {}", code)
            }
            RunStatus::Invalid(err) => format!("[ERROR] {}", err),
            RunStatus::NotFound(cause) => {
                format!("[ERROR] Interpreter or agent file not found: {}", cause)
            }
            RunStatus::TimedOut(limit) => format!(
                "[TIMEOUT] Agent processing timeout - terminated after {}",
                format_limit(*limit)
            ),
            RunStatus::UnexpectedError(message) => format!("[ERROR] Unexpected error: {}", message),
        }
    }
}

fn format_limit(limit: Duration) -> String {
    if limit.subsec_millis() == 0 {
        format!("{}s", limit.as_secs())
    } else {
        format!("{}ms", limit.as_millis())
    }
}
