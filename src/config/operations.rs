//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{DemoError, Result};
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(DemoError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DemoError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from a YAML file, falling back to defaults when the file
    /// does not exist. A file that exists but is invalid is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| DemoError::UserError(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DemoError::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `interpreter` must parse into at least one word
    /// - `script_extension` must be non-empty and have no leading dot
    /// - `module_path_var` must be non-empty
    /// - `output_max_chars` and `output_keep_lines` must be positive
    /// - `timeout_seconds`, when set, must be positive
    pub fn validate(&self) -> Result<()> {
        self.interpreter_command()?;

        if self.script_extension.is_empty() {
            return Err(DemoError::UserError(
                "config validation failed: script_extension must not be empty".to_string(),
            ));
        }
        if self.script_extension.starts_with('.') {
            return Err(DemoError::UserError(format!(
                "config validation failed: script_extension must not have a leading dot (found '{}'). Use '{}' instead.",
                self.script_extension,
                self.script_extension.trim_start_matches('.')
            )));
        }

        if self.module_path_var.trim().is_empty() {
            return Err(DemoError::UserError(
                "config validation failed: module_path_var must not be empty".to_string(),
            ));
        }

        if self.output_max_chars == 0 {
            return Err(DemoError::UserError(
                "config validation failed: output_max_chars must be greater than 0".to_string(),
            ));
        }
        if self.output_keep_lines == 0 {
            return Err(DemoError::UserError(
                "config validation failed: output_keep_lines must be greater than 0".to_string(),
            ));
        }

        if self.timeout_seconds == Some(0) {
            return Err(DemoError::UserError(
                "config validation failed: timeout_seconds must be greater than 0 when set"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Split the interpreter setting into program and leading arguments.
    pub fn interpreter_command(&self) -> Result<Vec<String>> {
        let words = shell_words::split(&self.interpreter).map_err(|e| {
            DemoError::UserError(format!(
                "failed to parse interpreter '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                self.interpreter, e
            ))
        })?;

        if words.is_empty() {
            return Err(DemoError::UserError(
                "config validation failed: interpreter must not be empty".to_string(),
            ));
        }

        Ok(words)
    }

    /// The run deadline, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
