//! Agent subprocess dispatch and execution.
//!
//! This module provides subprocess execution for agents with:
//!
//! - Pre-flight validation before anything is spawned
//! - A controlled child environment (UTF-8 I/O, fixed hash seed, module path)
//! - Merged stdout/stderr read line by line and sanitized as it arrives
//! - An optional deadline with process termination
//! - A worker thread publishing lines on a channel for a display loop

mod executor;
mod settings;
mod status;
mod stream;

pub use executor::{PREAMBLE_RULE, execute_run};
pub use settings::LaunchSettings;
pub use status::RunStatus;
pub use stream::{RunStream, RunUpdate, spawn_run};
