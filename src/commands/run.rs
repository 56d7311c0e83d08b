//! Implementation of the `agent-demo run` command.
//!
//! Runs one agent under the run lock and streams its transcript to `out` as
//! lines arrive, then prints the status bar and optionally exports the
//! transcript.
//!
//! Pre-run problems (unknown agent, held lock, bad timeout) are errors. Once
//! the run starts, every outcome is a `RunStatus` and the command's exit code
//! follows from it.

use super::{Harness, record};
use crate::agent::{RunStatus, RunUpdate, spawn_run};
use crate::cli::RunArgs;
use crate::config::Config;
use crate::context::{DemoContext, resolve_path};
use crate::error::{DemoError, Result};
use crate::events::{Event, EventAction};
use crate::locks::acquire_run_lock;
use crate::session::RunSession;
use crate::transcript::export_transcript;
use chrono::Local;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Execute the `agent-demo run` command, writing the transcript to `out`.
///
/// The run lock is held until the run has finished and its completion is
/// recorded, even if writing to `out` fails part way through.
///
/// # Returns
///
/// * `Ok(code)` - The run happened; `code` is the status's exit code
/// * `Err(DemoError::LockError)` - Another run holds the run lock (exit code 4)
/// * `Err(DemoError::RunActive)` - A run of this process is still active (exit code 4)
/// * `Err(DemoError::UserError)` - Unknown agent, invalid options, or the
///   transcript could not be written to `out`
pub fn cmd_run(harness: &mut Harness, args: RunArgs, out: &mut dyn Write) -> Result<i32> {
    let agent = harness.registry.lookup(&args.agent)?.clone();

    let mut settings = harness.launch_settings()?;
    if let Some(seconds) = args.timeout {
        if seconds == 0 {
            return Err(DemoError::UserError(
                "--timeout must be greater than zero".to_string(),
            ));
        }
        settings.timeout = Some(Duration::from_secs(seconds));
    }

    let lock = acquire_run_lock(&harness.ctx, &agent.name)?;
    debug!(lock = %lock.path().display(), agent = %agent.name, "run lock acquired");

    let ctx = &harness.ctx;
    let config = &harness.config;
    let session = harness.sessions.begin(agent.clone())?;
    let mut sink = TranscriptSink::new(out);

    if !args.no_status_bar {
        sink.line(&status_bar(&format!("[RUNNING] Agent Processing: {}", agent.name)));
    }
    for line in session.buffer().lines() {
        sink.line(line);
    }

    record(
        ctx,
        Event::new(EventAction::RunStart)
            .with_agent(&agent.name)
            .with_details(json!({
                "script": agent.executable_path.display().to_string(),
                "interpreter": settings.interpreter_display(),
                "timeout_secs": settings.timeout.map(|t| t.as_secs()),
            })),
    );
    info!(agent = %agent.name, "starting run");

    // Drain to the end even if `out` broke: the run must finish under the lock.
    for update in spawn_run(agent, settings) {
        if let RunUpdate::Line(line) = &update {
            sink.line(line);
        }
        session.apply(update)?;
    }

    let status = session.status().cloned().unwrap_or_else(|| {
        RunStatus::UnexpectedError("run ended without a status".to_string())
    });
    record_completion(ctx, session, &status);

    if args.export || args.export_dir.is_some() {
        export(ctx, config, session, args.export_dir, &mut sink)?;
    }

    if !args.no_status_bar {
        sink.line(&status_bar(&format!(
            "[READY] {} finished: {} in {}",
            session.agent().name,
            status.label(),
            format_duration(session.duration())
        )));
    }

    let written = sink.finish();
    if let Err(e) = lock.release() {
        warn!(error = %e, "run lock was not released");
    }
    written?;
    Ok(status.exit_code())
}

fn record_completion(ctx: &DemoContext, session: &RunSession, status: &RunStatus) {
    record(
        ctx,
        Event::new(EventAction::RunComplete)
            .with_agent(&session.agent().name)
            .with_details(json!({
                "status": status.label(),
                "exit_code": status.child_exit_code(),
                "started_at": session.started_at().to_rfc3339(),
                "finished_at": session.finished_at().map(|t| t.to_rfc3339()),
                "duration_ms": session.duration().as_millis() as u64,
                "lines": session.buffer().line_count(),
            })),
    );
}

fn export(
    ctx: &DemoContext,
    config: &Config,
    session: &RunSession,
    dir_override: Option<PathBuf>,
    sink: &mut TranscriptSink<'_>,
) -> Result<()> {
    let dir = dir_override
        .or_else(|| config.export_dir.clone())
        .map(|dir| resolve_path(&ctx.work_dir, &dir))
        .unwrap_or_else(|| ctx.work_dir.clone());

    let path = export_transcript(session.buffer(), &dir, Local::now().naive_local())?;
    sink.line(&format!("Transcript exported to {}", path.display()));

    record(
        ctx,
        Event::new(EventAction::Export)
            .with_agent(&session.agent().name)
            .with_details(json!({
                "path": path.display().to_string(),
                "chars": session.buffer().char_len(),
            })),
    );
    Ok(())
}

/// Terminal output for a run. After the first write error it stops writing
/// and keeps that error for `finish`.
struct TranscriptSink<'a> {
    out: &'a mut dyn Write,
    error: Option<DemoError>,
}

impl<'a> TranscriptSink<'a> {
    fn new(out: &'a mut dyn Write) -> Self {
        Self { out, error: None }
    }

    fn line(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|()| self.out.flush()) {
            warn!(error = %e, "failed to write transcript output; run continues");
            self.error = Some(DemoError::UserError(format!("failed to write output: {}", e)));
        }
    }

    fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// The status bar shown around a run.
fn status_bar(state: &str) -> String {
    format!(
        "Status: {} | Time: {} | Platform: {} | Encoding: UTF-8",
        state,
        Local::now().format("%H:%M:%S"),
        std::env::consts::OS
    )
}

fn format_duration(duration: Duration) -> String {
    format!("{:.1}s", duration.as_secs_f64())
}
