//! Advisory pre-flight validation of agent scripts.
//!
//! Checks run in order and stop at the first failure:
//! 1. the path exists,
//! 2. it carries the expected script extension,
//! 3. a short prefix can be read.
//!
//! Passing validation does not guarantee a successful spawn; the file can
//! still vanish before the process starts.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of bytes read to prove a script is readable.
pub const PREFIX_CHECK_BYTES: usize = 100;

/// Why an agent script failed validation. Every message names the path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Agent file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("File '{}' is not a recognized script (expected a .{} file)", .path.display(), .expected)]
    NotAScript { path: PathBuf, expected: String },

    #[error("Cannot read file '{}': {}", .path.display(), .cause)]
    Unreadable { path: PathBuf, cause: String },
}

/// Validate that `path` is an existing, readable script with `extension`
/// (no leading dot).
pub fn validate_script(path: &Path, extension: &str) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::NotFound(path.to_path_buf()));
    }

    if path.extension().and_then(|e| e.to_str()) != Some(extension) {
        return Err(ValidationError::NotAScript {
            path: path.to_path_buf(),
            expected: extension.to_string(),
        });
    }

    let unreadable = |e: std::io::Error| ValidationError::Unreadable {
        path: path.to_path_buf(),
        cause: e.to_string(),
    };
    let mut file = File::open(path).map_err(unreadable)?;
    let mut prefix = [0u8; PREFIX_CHECK_BYTES];
    file.read(&mut prefix).map_err(unreadable)?;

    Ok(())
}
