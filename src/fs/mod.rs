//! Filesystem utilities for agent-demo.
//!
//! Exported transcripts are written atomically so a reader never sees a
//! half-written file.

pub mod atomic;

pub use atomic::atomic_write_file;
