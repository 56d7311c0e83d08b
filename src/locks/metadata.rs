//! Run lock metadata.

use crate::error::{DemoError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Age after which a run lock is reported as stale.
pub const STALE_AFTER_MINUTES: i64 = 60;

/// Metadata stored in the run lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Holder of the lock (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the holder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    pub created_at: DateTime<Utc>,

    /// Name of the agent being run.
    pub agent: String,
}

impl LockMetadata {
    /// Metadata for a run of `agent` by this process, stamped now.
    pub fn new(agent: &str) -> Self {
        Self {
            owner: owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            agent: agent.to_string(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DemoError::UserError(format!(
                "failed to read run lock '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            DemoError::UserError(format!(
                "failed to parse run lock '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DemoError::UserError(format!("failed to serialize run lock metadata: {}", e))
        })
    }

    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Age as a short human-readable string (`5m`, `2h 10m`, `1d 3h`).
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age().num_minutes() > STALE_AFTER_MINUTES
    }

    /// One-line description of the holder, used in lock errors.
    pub fn describe(&self) -> String {
        let pid = self
            .pid
            .map(|p| format!(", pid {}", p))
            .unwrap_or_default();
        format!(
            "'{}' started {} ago by {}{}",
            self.agent,
            self.age_string(),
            self.owner,
            pid
        )
    }
}

/// `user@host` for the current process.
pub fn owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
