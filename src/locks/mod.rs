//! Single-flight run lock for agent-demo.
//!
//! Only one agent run may be active per state directory. The run lock is a
//! file at `.agent-demo/run.lock`, created with **create_new** semantics so
//! that exactly one process can hold it.
//!
//! # Lock Metadata
//!
//! The lock file contains JSON metadata:
//! - `owner`: who holds the lock (e.g., `user@HOST`)
//! - `pid`: the process ID of the holder
//! - `created_at`: RFC3339 timestamp
//! - `agent`: the agent being run
//!
//! # RAII Guards
//!
//! The lock is released when its guard is dropped. A failed delete during
//! drop is logged as a warning and never panics.

mod guard;
mod metadata;
mod operations;

#[cfg(test)]
mod tests;

pub use guard::LockGuard;
pub use metadata::{LockMetadata, STALE_AFTER_MINUTES, owner_string};
pub use operations::{RunLockInfo, acquire_run_lock, clear_run_lock, read_run_lock};
