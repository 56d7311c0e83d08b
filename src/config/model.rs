//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for the agent-demo harness.
///
/// This struct represents the contents of `.agent-demo/config.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Launch settings
    // =========================================================================
    /// Interpreter command used to launch agent scripts (default: "python3").
    ///
    /// May carry its own arguments (e.g. `"python3 -X utf8"`); the script path
    /// is always appended as the final argument.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Extension (no leading dot) an agent script must have (default: "py").
    #[serde(default = "default_script_extension")]
    pub script_extension: String,

    /// Environment variable holding the interpreter's module search path.
    #[serde(default = "default_module_path_var")]
    pub module_path_var: String,

    /// Directory prepended to the module search path.
    /// Relative paths are resolved against the working directory; unset means
    /// the working directory itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_dir: Option<PathBuf>,

    /// Extra environment variables for every agent process, applied last.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    /// Optional run deadline in seconds. Unset means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    // =========================================================================
    // Transcript settings
    // =========================================================================
    /// Character cap of the transcript buffer.
    #[serde(default = "default_output_max_chars")]
    pub output_max_chars: usize,

    /// Lines kept when the transcript buffer is truncated.
    #[serde(default = "default_output_keep_lines")]
    pub output_keep_lines: usize,

    /// Directory transcripts are exported to (default: working directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            script_extension: default_script_extension(),
            module_path_var: default_module_path_var(),
            module_dir: None,
            environment: BTreeMap::new(),
            timeout_seconds: None,
            output_max_chars: default_output_max_chars(),
            output_keep_lines: default_output_keep_lines(),
            export_dir: None,
        }
    }
}
