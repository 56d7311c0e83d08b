//! Background runs delivered as an ordered stream of updates.

use super::executor::execute_run;
use super::settings::LaunchSettings;
use super::status::RunStatus;
use crate::agent::AgentDescriptor;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// One update from a running agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunUpdate {
    /// A transcript line, already sanitized.
    Line(String),
    /// The run has ended. Always the last update.
    Finished(RunStatus),
}

/// Handle to a run executing on a worker thread.
///
/// Iterating yields every transcript line in order followed by exactly one
/// `RunUpdate::Finished`, after which the iterator is exhausted.
pub struct RunStream {
    rx: Receiver<RunUpdate>,
    worker: Option<JoinHandle<()>>,
    pending: VecDeque<RunUpdate>,
    done: bool,
}

/// Start `agent` on a worker thread and return its update stream.
pub fn spawn_run(agent: AgentDescriptor, settings: LaunchSettings) -> RunStream {
    let (tx, rx) = mpsc::channel();
    let fallback_tx = tx.clone();

    let spawned = thread::Builder::new()
        .name(format!("agent-run:{}", agent.name))
        .spawn(move || {
            let mut emit = |line: String| {
                // A dropped receiver means the caller stopped listening.
                let _ = tx.send(RunUpdate::Line(line));
            };
            let status = execute_run(&agent, &settings, &mut emit);
            let _ = tx.send(RunUpdate::Finished(status));
        });

    let worker = match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!(error = %e, "failed to start run worker thread");
            let status =
                RunStatus::UnexpectedError(format!("failed to start run worker thread: {}", e));
            let _ = fallback_tx.send(RunUpdate::Line(status.summary_line()));
            let _ = fallback_tx.send(RunUpdate::Finished(status));
            None
        }
    };
    drop(fallback_tx);

    RunStream {
        rx,
        worker,
        pending: VecDeque::new(),
        done: false,
    }
}

impl RunStream {
    /// The worker vanished without reporting a status (it panicked).
    fn recover_lost_worker(&mut self) {
        let reason = match self.worker.take().map(JoinHandle::join) {
            Some(Err(payload)) => payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string()),
            _ => "run worker exited without a status".to_string(),
        };
        error!(reason = %reason, "run worker terminated abnormally");

        let status = RunStatus::UnexpectedError(reason);
        self.pending.push_back(RunUpdate::Line(status.summary_line()));
        self.pending.push_back(RunUpdate::Finished(status));
    }
}

impl Iterator for RunStream {
    type Item = RunUpdate;

    fn next(&mut self) -> Option<RunUpdate> {
        if let Some(update) = self.pending.pop_front() {
            if matches!(update, RunUpdate::Finished(_)) {
                self.done = true;
            }
            return Some(update);
        }
        if self.done {
            return None;
        }

        match self.rx.recv() {
            Ok(RunUpdate::Finished(status)) => {
                self.done = true;
                if let Some(worker) = self.worker.take() {
                    let _ = worker.join();
                }
                debug!(status = status.label(), "run stream finished");
                Some(RunUpdate::Finished(status))
            }
            Ok(update) => Some(update),
            Err(_) => {
                self.recover_lost_worker();
                self.next()
            }
        }
    }
}
