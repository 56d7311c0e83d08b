//! Transcript export to a timestamped plain-text file.

use super::OutputBuffer;
use crate::error::Result;
use crate::fs::atomic_write_file;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// File name for a transcript exported at `stamp`:
/// `agent_demo_output_<YYYYMMDD_HHMMSS>.txt`.
pub fn transcript_file_name(stamp: NaiveDateTime) -> String {
    format!("agent_demo_output_{}.txt", stamp.format("%Y%m%d_%H%M%S"))
}

/// Write the buffer contents verbatim into `dir` and return the file path.
pub fn export_transcript(buffer: &OutputBuffer, dir: &Path, stamp: NaiveDateTime) -> Result<PathBuf> {
    let path = dir.join(transcript_file_name(stamp));
    atomic_write_file(&path, &buffer.contents())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_transcript_file_name_format() {
        assert_eq!(
            transcript_file_name(stamp()),
            "agent_demo_output_20261019_090507.txt"
        );
    }

    #[test]
    fn test_export_writes_buffer_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let mut buffer = OutputBuffer::default();
        buffer.push("[START] Executing finance-agent.py...");
        buffer.push("");
        buffer.push("[SUCCESS] Agent completed successfully (exit code: 0)");

        let path = export_transcript(&buffer, temp_dir.path(), stamp()).unwrap();

        assert_eq!(
            path,
            temp_dir.path().join("agent_demo_output_20261019_090507.txt")
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), buffer.contents());
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("exports");
        let mut buffer = OutputBuffer::default();
        buffer.push("hello");

        let path = export_transcript(&buffer, &dir, stamp()).unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello\n");
    }
}
