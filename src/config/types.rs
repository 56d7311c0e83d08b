//! Defaults and limits for the agent-demo configuration.

/// Default interpreter used to launch agent scripts.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Default extension (no leading dot) an agent script must carry.
pub const DEFAULT_SCRIPT_EXTENSION: &str = "py";

/// Default environment variable holding the interpreter's module search path.
pub const DEFAULT_MODULE_PATH_VAR: &str = "PYTHONPATH";

/// Character cap of the transcript buffer before it is truncated.
pub const DEFAULT_OUTPUT_MAX_CHARS: usize = 15_000;

/// Number of newest lines kept when the transcript buffer is truncated.
pub const DEFAULT_OUTPUT_KEEP_LINES: usize = 100;

pub(crate) fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_string()
}
pub(crate) fn default_script_extension() -> String {
    DEFAULT_SCRIPT_EXTENSION.to_string()
}
pub(crate) fn default_module_path_var() -> String {
    DEFAULT_MODULE_PATH_VAR.to_string()
}
pub(crate) fn default_output_max_chars() -> usize {
    DEFAULT_OUTPUT_MAX_CHARS
}
pub(crate) fn default_output_keep_lines() -> usize {
    DEFAULT_OUTPUT_KEEP_LINES
}
