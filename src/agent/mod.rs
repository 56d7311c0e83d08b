//! Agent registry and execution subsystem.
//!
//! - **Registry**: the ordered table of demo agents (built in or `agents.yaml`)
//! - **Validate**: advisory pre-flight checks on an agent script
//! - **Dispatch**: subprocess execution with live, sanitized output streaming
//!
//! Agents are opaque scripts. The harness never interprets their output beyond
//! sanitizing it for display; the exit code is the only structured result.

pub mod dispatch;
mod registry;
mod validate;

// Re-export public API
pub use dispatch::{LaunchSettings, RunStatus, RunStream, RunUpdate, spawn_run};
pub use registry::{AgentDescriptor, AgentRegistry};
pub use validate::{PREFIX_CHECK_BYTES, ValidationError, validate_script};
