//! Bounded transcript buffer.
//!
//! Lines are appended with a trailing newline. Once the buffer grows past its
//! character cap, a single truncation pass keeps only the newest lines. The
//! oldest output is always the first to go.

use std::collections::VecDeque;

/// Append-only transcript text with a character cap.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    lines: VecDeque<String>,
    /// Size in characters, counting one separator per line.
    chars: usize,
    max_chars: usize,
    keep_lines: usize,
}

impl OutputBuffer {
    /// Create an empty buffer.
    ///
    /// `max_chars` is the cap that triggers truncation; `keep_lines` is how
    /// many of the newest lines survive it. Both are clamped to at least 1.
    pub fn new(max_chars: usize, keep_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            chars: 0,
            max_chars: max_chars.max(1),
            keep_lines: keep_lines.max(1),
        }
    }

    /// Append a line plus separator. Returns `true` if the append truncated
    /// older output.
    pub fn push(&mut self, line: &str) -> bool {
        self.chars += line.chars().count() + 1;
        self.lines.push_back(line.to_string());

        if self.chars > self.max_chars {
            self.truncate();
            true
        } else {
            false
        }
    }

    fn truncate(&mut self) {
        while self.lines.len() > self.keep_lines {
            self.pop_oldest();
        }

        // Long lines can keep the buffer over the cap even after the line cut.
        while self.chars > self.max_chars && self.lines.len() > 1 {
            self.pop_oldest();
        }

        if self.chars > self.max_chars
            && let Some(only) = self.lines.back_mut()
        {
            let keep = self.max_chars - 1;
            let total = only.chars().count();
            let tail: String = only.chars().skip(total - keep).collect();
            *only = tail;
            self.chars = keep + 1;
        }
    }

    fn pop_oldest(&mut self) {
        if let Some(old) = self.lines.pop_front() {
            self.chars -= old.chars().count() + 1;
        }
    }

    /// The transcript text, verbatim.
    pub fn contents(&self) -> String {
        let mut out = String::with_capacity(self.chars);
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Iterate over the buffered lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Size in characters, including line separators.
    pub fn char_len(&self) -> usize {
        self.chars
    }

    /// Number of buffered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        use crate::config::types::{DEFAULT_OUTPUT_KEEP_LINES, DEFAULT_OUTPUT_MAX_CHARS};
        Self::new(DEFAULT_OUTPUT_MAX_CHARS, DEFAULT_OUTPUT_KEEP_LINES)
    }
}
