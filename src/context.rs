//! Working-directory context resolution for agent-demo.
//!
//! Agent scripts are resolved relative to the directory the harness was
//! started from, and all harness state (config, run lock, run history) lives
//! in a `.agent-demo/` directory underneath it. Every command resolves a
//! `DemoContext` first so those paths are computed in exactly one place.

use crate::error::{DemoError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// State directory name, relative to the working directory.
pub const STATE_DIR_NAME: &str = ".agent-demo";

/// Default agents registry file, relative to the working directory.
pub const AGENTS_FILE_NAME: &str = "agents.yaml";

/// Resolved paths for one agent-demo invocation. All paths are absolute.
#[derive(Debug, Clone)]
pub struct DemoContext {
    /// Directory agent scripts are resolved against and children run in.
    pub work_dir: PathBuf,

    /// Harness state directory (default: `{work_dir}/.agent-demo/`).
    pub state_dir: PathBuf,
}

impl DemoContext {
    /// Resolve the context from the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            DemoError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd)
    }

    /// Resolve the context from a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(DemoError::UserError(format!(
                "working directory '{}' does not exist or is not a directory",
                dir.display()
            )));
        }

        let work_dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            env::current_dir()
                .map_err(|e| {
                    DemoError::UserError(format!("failed to get current working directory: {}", e))
                })?
                .join(dir)
        };
        let state_dir = work_dir.join(STATE_DIR_NAME);

        Ok(Self {
            work_dir,
            state_dir,
        })
    }

    /// Default path of the harness config file.
    pub fn config_path(&self) -> PathBuf {
        self.state_dir.join("config.yaml")
    }

    /// Default path of the agents registry file.
    pub fn agents_path(&self) -> PathBuf {
        self.work_dir.join(AGENTS_FILE_NAME)
    }

    /// Path of the run history log.
    pub fn events_file(&self) -> PathBuf {
        self.state_dir.join("events.ndjson")
    }

    /// Path of the single-flight run lock.
    pub fn run_lock_path(&self) -> PathBuf {
        self.state_dir.join("run.lock")
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
