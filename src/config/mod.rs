//! Configuration model for agent-demo.
//!
//! This module defines the Config struct that represents `.agent-demo/config.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
