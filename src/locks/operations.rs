//! Run lock acquisition, inspection, and clearing.

use super::guard::LockGuard;
use super::metadata::LockMetadata;
use crate::context::DemoContext;
use crate::error::{DemoError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The current holder of the run lock.
#[derive(Debug, Clone)]
pub struct RunLockInfo {
    pub path: PathBuf,
    pub metadata: LockMetadata,
    pub is_stale: bool,
}

impl std::fmt::Display for RunLockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "run lock held for {}{}",
            self.metadata.describe(),
            if self.is_stale { " (STALE)" } else { "" }
        )
    }
}

/// Create the lock file exclusively and write its metadata.
fn acquire_lock(lock_path: &Path, metadata: &LockMetadata) -> Result<LockGuard> {
    if let Some(parent) = lock_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            DemoError::UserError(format!(
                "failed to create state directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                let holder = match LockMetadata::from_file(lock_path) {
                    Ok(meta) => format!("another run is active: {}", meta.describe()),
                    Err(_) => "another run is active".to_string(),
                };
                DemoError::LockError(format!(
                    "{}\nLock: {}\nIf no run is active, clear it with `agent-demo unlock --force`.",
                    holder,
                    lock_path.display()
                ))
            } else {
                DemoError::LockError(format!(
                    "failed to acquire run lock '{}': {}",
                    lock_path.display(),
                    e
                ))
            }
        })?;

    let json = metadata.to_json()?;
    file.write_all(json.as_bytes()).map_err(|e| {
        let _ = fs::remove_file(lock_path);
        DemoError::LockError(format!("failed to write run lock metadata: {}", e))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(lock_path);
        DemoError::LockError(format!("failed to sync run lock: {}", e))
    })?;

    debug!(path = %lock_path.display(), agent = %metadata.agent, "run lock acquired");
    Ok(LockGuard::new(lock_path.to_path_buf()))
}

/// Acquire the run lock for a run of `agent`.
///
/// # Returns
///
/// * `Ok(LockGuard)` - The lock, released on drop
/// * `Err(DemoError::LockError)` - Another run holds it (exit code 4)
pub fn acquire_run_lock(ctx: &DemoContext, agent: &str) -> Result<LockGuard> {
    acquire_lock(&ctx.run_lock_path(), &LockMetadata::new(agent))
}

/// Read the current run lock, if any.
pub fn read_run_lock(ctx: &DemoContext) -> Result<Option<RunLockInfo>> {
    let path = ctx.run_lock_path();
    if !path.exists() {
        return Ok(None);
    }

    let metadata = LockMetadata::from_file(&path)?;
    let is_stale = metadata.is_stale();
    Ok(Some(RunLockInfo {
        path,
        metadata,
        is_stale,
    }))
}

/// Remove the run lock.
///
/// Refused unless `force` is set, since the holder may still be running.
/// An unparseable lock file is removed as well when forced.
pub fn clear_run_lock(ctx: &DemoContext, force: bool) -> Result<Option<RunLockInfo>> {
    let path = ctx.run_lock_path();
    if !path.exists() {
        return Err(DemoError::UserError(format!(
            "no run lock exists at: {}",
            path.display()
        )));
    }

    let info = read_run_lock(ctx);
    if !force {
        let holder = match &info {
            Ok(Some(info)) => info.to_string(),
            _ => format!("run lock at {}", path.display()),
        };
        return Err(DemoError::UserError(format!(
            "refusing to clear {} without --force",
            holder
        )));
    }

    fs::remove_file(&path).map_err(|e| {
        DemoError::UserError(format!(
            "failed to clear run lock '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(info.ok().flatten())
}
