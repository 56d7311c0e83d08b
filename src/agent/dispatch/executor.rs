//! Agent subprocess executor.
//!
//! Runs one agent script to completion: validation, preamble, spawn, merged
//! line streaming with sanitization, optional deadline, and classification of
//! the outcome. Every outcome, including failures, is reported as transcript
//! lines through `emit` plus a returned `RunStatus`; nothing here returns `Err`.

use super::settings::LaunchSettings;
use super::status::RunStatus;
use crate::agent::{AgentDescriptor, validate_script};
use crate::transcript::sanitize_bytes;
use std::io::{self, BufRead, BufReader, PipeReader};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[cfg(unix)]
use std::os::unix::process::CommandExt;

/// Rule printed between the preamble and the agent's own output.
pub const PREAMBLE_RULE: &str =
    "------------------------------------------------------------";

/// Poll interval while waiting for exit under a deadline.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Upper bound on the interpreter `--version` check.
const VERSION_PROBE_LIMIT: Duration = Duration::from_secs(5);

/// How long to wait for the output pipe to close after a kill.
const READER_GRACE: Duration = Duration::from_secs(2);

/// Execute an agent run, emitting transcript lines as they are produced.
///
/// # Arguments
///
/// * `agent` - The agent to run
/// * `settings` - Interpreter, environment and deadline settings
/// * `emit` - Receives each transcript line (preamble, sanitized output, status)
///
/// # Returns
///
/// The terminal `RunStatus`. For `RunStatus::Invalid` exactly one line has been
/// emitted and no process was spawned; for every other status the last emitted
/// line is `status.summary_line()`.
pub fn execute_run(
    agent: &AgentDescriptor,
    settings: &LaunchSettings,
    emit: &mut dyn FnMut(String),
) -> RunStatus {
    let script = settings.resolve_script(&agent.executable_path);

    if let Err(err) = validate_script(&script, &settings.script_extension) {
        debug!(agent = %agent.name, error = %err, "agent failed validation");
        let status = RunStatus::Invalid(err);
        emit(status.summary_line());
        return status;
    }

    // The deadline covers the preamble's version check as well as the run.
    let deadline = settings
        .timeout
        .map(|limit| Deadline { at: Instant::now() + limit, limit });

    emit_preamble(agent, settings, deadline, emit);

    let status = stream_child(&script, settings, deadline, emit);
    info!(agent = %agent.name, status = status.label(), "agent run finished");
    emit(status.summary_line());
    status
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    limit: Duration,
}

fn emit_preamble(
    agent: &AgentDescriptor,
    settings: &LaunchSettings,
    deadline: Option<Deadline>,
    emit: &mut dyn FnMut(String),
) {
    emit(format!(
        "[START] Executing {}...",
        agent.executable_path.display()
    ));

    let probe_until = Instant::now() + VERSION_PROBE_LIMIT;
    let probe_until = deadline.map_or(probe_until, |d| d.at.min(probe_until));
    emit(format!(
        "[INFO] Environment: {}",
        probe_interpreter_version(settings, probe_until).unwrap_or_else(|| "unknown".to_string())
    ));
    emit(format!("[INFO] Platform: {}", std::env::consts::OS));
    emit(format!(
        "[INFO] Working Directory: {}",
        settings.work_dir.display()
    ));
    emit(PREAMBLE_RULE.to_string());
}

/// Ask the interpreter for its version string: the first non-empty line of
/// its `--version` output. Gives up at `until`.
fn probe_interpreter_version(settings: &LaunchSettings, until: Instant) -> Option<String> {
    let (program, args) = settings.interpreter.split_first()?;
    let mut command = Command::new(program);
    command
        .args(args)
        .arg("--version")
        .current_dir(&settings.work_dir);

    let mut child = MergedChild::spawn(command).ok()?;
    let mut version = None;
    loop {
        match child.lines.recv_timeout(until.saturating_duration_since(Instant::now())) {
            Ok(raw) => {
                if version.is_none() {
                    let line = String::from_utf8_lossy(trim_line_ending(&raw)).trim().to_string();
                    if !line.is_empty() {
                        version = Some(line);
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                debug!(program = %program, "interpreter version check timed out");
                child.kill();
                child.finish_reader(READER_GRACE);
                return None;
            }
        }
    }
    child.finish_reader(Duration::ZERO);

    match wait_for_exit(&mut child.process, Some(until)) {
        Ok(Some(exit)) if exit.success() => version,
        Ok(None) => {
            child.kill();
            None
        }
        _ => None,
    }
}

/// Spawn the child, stream its merged output and classify the exit.
fn stream_child(
    script: &Path,
    settings: &LaunchSettings,
    deadline: Option<Deadline>,
    emit: &mut dyn FnMut(String),
) -> RunStatus {
    let Some((program, interpreter_args)) = settings.interpreter.split_first() else {
        return RunStatus::UnexpectedError("interpreter command is empty".to_string());
    };

    let environment = match settings.child_environment() {
        Ok(vars) => vars,
        Err(e) => {
            return RunStatus::UnexpectedError(format!(
                "failed to build {} for '{}': {}",
                settings.module_path_var,
                settings.module_dir.display(),
                e
            ));
        }
    };

    let mut command = Command::new(program);
    command
        .args(interpreter_args)
        .arg(script)
        .current_dir(&settings.work_dir)
        .envs(environment);

    let start_time = Instant::now();
    let mut child = match MergedChild::spawn(command) {
        Ok(child) => child,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(program = %program, script = %script.display(), "spawn failed: not found");
            return RunStatus::NotFound(format!("{} ({})", e, program));
        }
        Err(e) => {
            return RunStatus::UnexpectedError(format!(
                "failed to execute '{} {}': {}",
                settings.interpreter_display(),
                script.display(),
                e
            ));
        }
    };
    debug!(pid = child.process.id(), script = %script.display(), "agent process spawned");

    loop {
        let next = match deadline {
            Some(d) => child
                .lines
                .recv_timeout(d.at.saturating_duration_since(Instant::now())),
            None => child.lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match next {
            Ok(raw) => emit(sanitize_bytes(trim_line_ending(&raw))),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                let limit = deadline.map(|d| d.limit).unwrap_or_default();
                warn!(pid = child.process.id(), ?limit, "agent exceeded deadline; killing");
                child.kill();
                for raw in child.finish_reader(READER_GRACE) {
                    emit(sanitize_bytes(trim_line_ending(&raw)));
                }
                return RunStatus::TimedOut(limit);
            }
        }
    }
    child.finish_reader(Duration::ZERO);

    // EOF on the pipe does not mean the process has exited.
    match wait_for_exit(&mut child.process, deadline.map(|d| d.at)) {
        Ok(Some(exit)) => {
            debug!(?exit, elapsed = ?start_time.elapsed(), "agent process exited");
            classify_exit(exit)
        }
        Ok(None) => {
            child.kill();
            RunStatus::TimedOut(deadline.map(|d| d.limit).unwrap_or_default())
        }
        Err(e) => RunStatus::UnexpectedError(format!("failed to check process status: {}", e)),
    }
}

/// A child whose stdout and stderr share one pipe, read line by line.
///
/// Both descriptors refer to the same pipe, so lines arrive in the order the
/// child wrote them. On Unix the child leads its own process group.
struct MergedChild {
    process: Child,
    lines: Receiver<Vec<u8>>,
    reader: Option<JoinHandle<()>>,
}

impl MergedChild {
    fn spawn(mut command: Command) -> io::Result<Self> {
        let (pipe_reader, pipe_writer) = io::pipe()?;
        command
            .stdin(Stdio::null())
            .stdout(pipe_writer.try_clone()?)
            .stderr(pipe_writer);

        #[cfg(unix)]
        {
            command.process_group(0);
        }

        let process = command.spawn()?;
        // The command still holds the write ends; the reader sees EOF only once they close.
        drop(command);

        let (tx, rx) = mpsc::channel();
        let reader = spawn_line_reader(pipe_reader, tx);
        Ok(Self {
            process,
            lines: rx,
            reader: Some(reader),
        })
    }

    /// Kill the child (and on Unix its whole process group) and reap it.
    fn kill(&mut self) {
        #[cfg(unix)]
        unix_process::kill_process_group(self.process.id());
        // On Unix this is SIGKILL; on Windows it is TerminateProcess.
        let _ = self.process.kill();
        let _ = self.process.wait();
    }

    /// Wait up to `grace` for the pipe to close, then join the reader.
    ///
    /// Returns lines still in flight. If something outside the process group
    /// keeps the pipe open, the reader is left detached.
    fn finish_reader(&mut self, grace: Duration) -> Vec<Vec<u8>> {
        let until = Instant::now() + grace;
        let mut rest = Vec::new();
        loop {
            match self
                .lines
                .recv_timeout(until.saturating_duration_since(Instant::now()))
            {
                Ok(raw) => rest.push(raw),
                Err(RecvTimeoutError::Disconnected) => {
                    if let Some(reader) = self.reader.take() {
                        let _ = reader.join();
                    }
                    return rest;
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        pid = self.process.id(),
                        "output pipe still open after kill; leaving reader detached"
                    );
                    return rest;
                }
            }
        }
    }
}

#[cfg(unix)]
mod unix_process {
    use libc::pid_t;
    use tracing::debug;

    /// Send SIGKILL to every process in the group led by `pgid`.
    pub fn kill_process_group(pgid: u32) {
        // SAFETY: kill(2) takes no pointers; a negative pid addresses the group.
        let rc = unsafe { libc::kill(-(pgid as pid_t), libc::SIGKILL) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            debug!(pgid, error = %err, "process group kill failed");
        }
    }
}

/// Forward raw lines from `pipe` into `tx` until EOF.
fn spawn_line_reader(pipe: PipeReader, tx: Sender<Vec<u8>>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut line = Vec::new();
        loop {
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(std::mem::take(&mut line)).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "agent output read error");
                    break;
                }
            }
        }
        debug!("agent output reader exiting");
    })
}

fn trim_line_ending(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}

/// Wait for the child to exit, polling if a deadline applies.
///
/// Returns `Ok(None)` if the deadline passed first.
fn wait_for_exit(child: &mut Child, deadline: Option<Instant>) -> io::Result<Option<ExitStatus>> {
    let Some(deadline) = deadline else {
        return child.wait().map(Some);
    };

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(EXIT_POLL_INTERVAL);
    }
}

fn classify_exit(exit: ExitStatus) -> RunStatus {
    match exit.code() {
        Some(0) => RunStatus::Success,
        Some(code) => RunStatus::NonZeroExit(code),
        None => RunStatus::UnexpectedError(format!("agent terminated without an exit code ({})", exit)),
    }
}
