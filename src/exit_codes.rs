//! Exit code constants for the agent-demo CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown agent, bad config)
//! - 2: Validation failure (agent script missing, wrong type, unreadable)
//! - 3: Agent failure (nonzero exit, not found at spawn, timeout, unexpected error)
//! - 4: Lock acquisition failure (another run is active)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown agent, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Validation failure: the agent script did not pass pre-flight checks.
pub const VALIDATION_FAILURE: i32 = 2;

/// Agent failure: the run started but did not complete successfully.
pub const AGENT_FAILURE: i32 = 3;

/// Lock acquisition failure: a run is already active.
pub const LOCK_FAILURE: i32 = 4;
