//! # External Tool Runner
//!
//! Runs one external program to completion under a wall-clock budget.
//!
//! stdout and stderr are drained on their own threads so a chatty tool
//! cannot block on a full pipe while we wait for it. The child is polled
//! with `try_wait`; once the budget is spent it is killed and reaped.
//!
//! The budget also covers collecting output. A grandchild that inherited
//! the pipes keeps them open after the child exits; the drain is abandoned
//! at the deadline and the call reports a timeout.

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use nikzk_core::NikzkError;
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Failure to run an external tool to a usable result.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The program could not be started or waited on.
    #[error("failed to run `{tool}`: {source}")]
    Launch {
        /// Program name.
        tool: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The program exceeded its time budget and was killed.
    #[error("`{tool}` timed out after {seconds}s")]
    Timeout {
        /// Program name.
        tool: String,
        /// Budget in whole seconds.
        seconds: u64,
    },

    /// The program exited unsuccessfully or gave an unrecognized answer.
    #[error("`{tool}` failed: {diagnostic}")]
    Failed {
        /// Program name.
        tool: String,
        /// Last diagnostic line the program printed.
        diagnostic: String,
    },

    /// Scratch directory or file handling failed.
    #[error("scratch file error: {0}")]
    Scratch(#[from] std::io::Error),
}

impl From<ToolError> for NikzkError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Launch { tool, source } => NikzkError::ExternalToolFailure {
                tool,
                diagnostic: source.to_string(),
            },
            ToolError::Timeout { tool, seconds } => {
                NikzkError::ExternalToolTimeout { tool, seconds }
            }
            ToolError::Failed { tool, diagnostic } => {
                NikzkError::ExternalToolFailure { tool, diagnostic }
            }
            ToolError::Scratch(source) => NikzkError::ExternalToolFailure {
                tool: "scratch".to_string(),
                diagnostic: source.to_string(),
            },
        }
    }
}

/// Captured result of a finished tool.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Program name.
    pub tool: String,
    /// Exit status.
    pub status: ExitStatus,
    /// Everything written to stdout, lossily decoded.
    pub stdout: String,
    /// Everything written to stderr, lossily decoded.
    pub stderr: String,
}

impl ToolOutput {
    /// Last non-empty line of stderr, falling back to stdout, then to the
    /// exit status.
    pub fn diagnostic(&self) -> String {
        last_line(&self.stderr)
            .or_else(|| last_line(&self.stdout))
            .map(str::to_string)
            .unwrap_or_else(|| format!("exited with {}", self.status))
    }

    /// Turn a non-zero exit into [`ToolError::Failed`].
    pub fn ensure_success(self) -> Result<Self, ToolError> {
        if self.status.success() {
            Ok(self)
        } else {
            Err(ToolError::Failed {
                diagnostic: self.diagnostic(),
                tool: self.tool,
            })
        }
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rev().find(|line| !line.is_empty())
}

/// Display name for a program path.
pub fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .unwrap_or(program.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Run `program` with `args` in `cwd`, killing it after `timeout`.
///
/// # Errors
///
/// [`ToolError::Launch`] if it cannot be spawned, [`ToolError::Timeout`] if
/// it overruns or its output pipes are still open at the deadline. A
/// non-zero exit is *not* an error here; see
/// [`ToolOutput::ensure_success`].
pub fn run_tool<I, S>(
    program: &Path,
    args: I,
    cwd: &Path,
    timeout: Duration,
) -> Result<ToolOutput, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let tool = tool_name(program);
    let started = Instant::now();
    let deadline = started + timeout;

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ToolError::Launch {
            tool: tool.clone(),
            source,
        })?;

    tracing::debug!(tool = %tool, pid = child.id(), "external tool started");

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(timed_out(tool, timeout));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                let _ = child.kill();
                return Err(ToolError::Launch { tool, source });
            }
        }
    };

    // Reader threads still blocked on a pipe held by a grandchild are left
    // behind; they end when the last writer closes.
    let (stdout, stderr) = match (collect(stdout, deadline), collect(stderr, deadline)) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        _ => return Err(timed_out(tool, timeout)),
    };

    let output = ToolOutput {
        tool,
        status,
        stdout,
        stderr,
    };
    tracing::info!(
        tool = %output.tool,
        elapsed_ms = started.elapsed().as_millis() as u64,
        success = output.status.success(),
        "external tool finished"
    );
    Ok(output)
}

fn timed_out(tool: String, timeout: Duration) -> ToolError {
    tracing::warn!(
        tool = %tool,
        timeout_secs = timeout.as_secs(),
        "external tool exceeded its time budget"
    );
    ToolError::Timeout {
        tool,
        seconds: timeout.as_secs(),
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Wait for a drained stream until `deadline`. `None` means the pipe was
/// still open when the budget ran out.
fn collect(stream: Option<Receiver<String>>, deadline: Instant) -> Option<String> {
    let Some(rx) = stream else {
        return Some(String::new());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(text) => Some(text),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh() -> &'static Path {
        Path::new("/bin/sh")
    }

    #[test]
    fn captures_both_streams() {
        let dir = std::env::temp_dir();
        let out = run_tool(
            sh(),
            ["-c", "echo out; echo err >&2"],
            &dir,
            Duration::from_secs(10),
        )
        .unwrap();
        assert!(out.status.success());
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
        assert_eq!(out.tool, "sh");
    }

    #[test]
    fn failure_reports_last_stderr_line() {
        let dir = std::env::temp_dir();
        let out = run_tool(
            sh(),
            ["-c", "echo first >&2; echo 'Error: last' >&2; exit 3"],
            &dir,
            Duration::from_secs(10),
        )
        .unwrap();
        match out.ensure_success() {
            Err(ToolError::Failed { tool, diagnostic }) => {
                assert_eq!(tool, "sh");
                assert_eq!(diagnostic, "Error: last");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn overrun_is_killed() {
        let dir = std::env::temp_dir();
        let started = Instant::now();
        let err = run_tool(sh(), ["-c", "exec sleep 30"], &dir, Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { seconds: 1, .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn missing_program_is_launch_error() {
        let dir = std::env::temp_dir();
        let err = run_tool(
            Path::new("/nonexistent/nikzk-tool"),
            std::iter::empty::<&str>(),
            &dir,
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Launch { ref tool, .. } if tool == "nikzk-tool"));
        let mapped: NikzkError = err.into();
        assert!(mapped.is_environmental());
    }

    #[test]
    fn timeout_maps_to_external_timeout() {
        let err: NikzkError = ToolError::Timeout {
            tool: "snarkjs".into(),
            seconds: 120,
        }
        .into();
        assert!(matches!(
            err,
            NikzkError::ExternalToolTimeout { ref tool, seconds: 120 } if tool == "snarkjs"
        ));
    }

    #[test]
    fn grandchild_holding_pipes_does_not_extend_budget() {
        let dir = std::env::temp_dir();
        let started = Instant::now();
        let err = run_tool(
            sh(),
            ["-c", "sleep 6 & echo done"],
            &dir,
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { seconds: 1, .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
