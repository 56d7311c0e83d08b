//! Transcript handling for agent runs.
//!
//! - **Sanitize**: ASCII-safe replacement of decorative symbols
//! - **Buffer**: bounded, FIFO-truncated transcript text
//! - **Export**: timestamped plain-text artifact of a transcript

mod buffer;
mod export;
mod sanitize;

pub use buffer::OutputBuffer;
pub use export::{export_transcript, transcript_file_name};
pub use sanitize::{sanitize, sanitize_bytes};
