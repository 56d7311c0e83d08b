//! Run sessions: the transcript and outcome of one agent run.
//!
//! A `RunSession` is owned by exactly one caller. It is mutable while its run
//! is active and frozen once `finish` records the status. The `SessionSlot`
//! holds the latest session and refuses to start another while it runs.

use crate::agent::{AgentDescriptor, RunStatus, RunUpdate};
use crate::error::{DemoError, Result};
use crate::transcript::OutputBuffer;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Transcript and outcome of a single run.
#[derive(Debug)]
pub struct RunSession {
    agent: AgentDescriptor,
    buffer: OutputBuffer,
    status: Option<RunStatus>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    started: Instant,
    elapsed: Option<Duration>,
}

impl RunSession {
    /// Start a session for `agent` with the given buffer.
    ///
    /// The buffer is seeded with the initialising line.
    pub fn start(agent: AgentDescriptor, mut buffer: OutputBuffer) -> Self {
        buffer.push(&format!("[START] Initialising {}...", agent.name));
        Self {
            agent,
            buffer,
            status: None,
            started_at: Utc::now(),
            finished_at: None,
            started: Instant::now(),
            elapsed: None,
        }
    }

    /// Append a transcript line. Ignored once the session has finished.
    pub fn push_line(&mut self, line: &str) {
        if self.is_running() {
            self.buffer.push(line);
        }
    }

    /// Record the terminal status. Fails if a status was already recorded.
    pub fn finish(&mut self, status: RunStatus) -> Result<()> {
        if let Some(existing) = &self.status {
            return Err(DemoError::UserError(format!(
                "run of '{}' already finished ({})",
                self.agent.name,
                existing.label()
            )));
        }
        self.elapsed = Some(self.started.elapsed());
        self.finished_at = Some(Utc::now());
        self.status = Some(status);
        Ok(())
    }

    /// Apply one update from a run stream.
    pub fn apply(&mut self, update: RunUpdate) -> Result<()> {
        match update {
            RunUpdate::Line(line) => {
                self.push_line(&line);
                Ok(())
            }
            RunUpdate::Finished(status) => self.finish(status),
        }
    }

    pub fn agent(&self) -> &AgentDescriptor {
        &self.agent
    }

    pub fn buffer(&self) -> &OutputBuffer {
        &self.buffer
    }

    pub fn status(&self) -> Option<&RunStatus> {
        self.status.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.status.is_none()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Wall-clock run time: final once finished, running total otherwise.
    pub fn duration(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.started.elapsed())
    }
}

/// Holds at most one session and enforces single-flight runs.
#[derive(Debug)]
pub struct SessionSlot {
    current: Option<RunSession>,
    max_chars: usize,
    keep_lines: usize,
}

impl SessionSlot {
    pub fn new(max_chars: usize, keep_lines: usize) -> Self {
        Self {
            current: None,
            max_chars,
            keep_lines,
        }
    }

    /// Start a new session for `agent`, replacing a finished one.
    ///
    /// Rejected with `DemoError::RunActive` while the current session runs.
    pub fn begin(&mut self, agent: AgentDescriptor) -> Result<&mut RunSession> {
        if let Some(current) = &self.current
            && current.is_running()
        {
            return Err(DemoError::RunActive(current.agent.name.clone()));
        }

        let buffer = OutputBuffer::new(self.max_chars, self.keep_lines);
        Ok(self.current.insert(RunSession::start(agent, buffer)))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentRegistry;
    use crate::exit_codes;

    fn hr_agent() -> AgentDescriptor {
        AgentRegistry::builtin()
            .lookup("HR Assistant")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_start_seeds_initialising_line() {
        let session = RunSession::start(hr_agent(), OutputBuffer::default());
        assert!(session.is_running());
        assert_eq!(
            session.buffer().contents(),
            "[START] Initialising HR Assistant...\n"
        );
        assert!(session.finished_at().is_none());
    }

    #[test]
    fn test_finish_is_set_once() {
        let mut session = RunSession::start(hr_agent(), OutputBuffer::default());
        session.finish(RunStatus::NonZeroExit(2)).unwrap();

        assert!(!session.is_running());
        assert_eq!(session.status(), Some(&RunStatus::NonZeroExit(2)));
        assert!(session.finished_at().is_some());

        let err = session.finish(RunStatus::Success).unwrap_err();
        assert!(err.to_string().contains("already finished"));
        assert_eq!(session.status(), Some(&RunStatus::NonZeroExit(2)));
    }

    #[test]
    fn test_finished_session_is_frozen() {
        let mut session = RunSession::start(hr_agent(), OutputBuffer::default());
        session.apply(RunUpdate::Line("hello".to_string())).unwrap();
        session.apply(RunUpdate::Finished(RunStatus::Success)).unwrap();
        let frozen = session.buffer().contents();

        session.push_line("late line");
        assert_eq!(session.buffer().contents(), frozen);
        assert_eq!(session.buffer().line_count(), 2);
    }

    #[test]
    fn test_begin_rejected_while_running() {
        let mut slot = SessionSlot::new(1000, 10);
        slot.begin(hr_agent()).unwrap();

        let err = slot.begin(hr_agent()).unwrap_err();
        assert!(matches!(err, DemoError::RunActive(ref name) if name == "HR Assistant"));
        assert_eq!(err.exit_code(), exit_codes::LOCK_FAILURE);
    }

    #[test]
    fn test_begin_allowed_after_finish() {
        let mut slot = SessionSlot::new(1000, 10);
        let first = slot.begin(hr_agent()).unwrap();
        first.push_line("first run output");
        first.finish(RunStatus::Success).unwrap();

        let session = slot.begin(hr_agent()).unwrap();
        assert!(session.is_running());
        assert_eq!(
            session.buffer().contents(),
            "[START] Initialising HR Assistant...\n"
        );
    }
}
