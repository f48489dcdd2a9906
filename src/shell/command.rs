//! Process execution with captured output and an optional deadline.

use crate::error::{DepguessError, Result};
use anyhow::{anyhow, Context};
use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// How long pipe readers get to drain after a timed-out child is killed.
const READER_GRACE: Duration = Duration::from_millis(250);

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the deadline expired and the child was killed.
    pub timed_out: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
            timed_out: false,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
            timed_out: false,
        }
    }

    /// Create a result for a child killed at its deadline.
    pub fn timeout(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: None,
            stdout,
            stderr,
            duration,
            success: false,
            timed_out: true,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Hand the child our stdin instead of an empty one.
    pub inherit_stdin: bool,

    /// Kill the child once this much time has passed (None = wait forever).
    pub timeout: Option<Duration>,
}

/// Render a program and its arguments the way a user would type them.
pub fn render_command<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.as_ref().to_string_lossy());
    }
    rendered
}

/// Execute `program` with `args`, capturing stdout and stderr.
///
/// Both pipes are drained on helper threads while the child runs, so a
/// child that writes more than a pipe buffer cannot stall. When
/// `options.timeout` expires the child is killed and reaped before this
/// returns, and whatever output it produced so far is kept.
///
/// A program that cannot be found yields
/// [`DepguessError::ExecutableNotFound`]; one that cannot be started,
/// waited on or killed for any other reason yields
/// [`DepguessError::CommandFailed`].
pub fn execute<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    options: &CommandOptions,
) -> Result<CommandResult> {
    let start = Instant::now();

    let rendered = render_command(program, args);
    let failed = |message: String| DepguessError::CommandFailed {
        command: rendered.clone(),
        message,
    };

    let mut cmd = Command::new(program);
    cmd.args(args);

    if options.inherit_stdin {
        cmd.stdin(Stdio::inherit());
    } else {
        cmd.stdin(Stdio::null());
    }
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    debug!(command = %rendered, "spawning child process");
    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DepguessError::ExecutableNotFound {
                path: program.to_path_buf(),
            }
        } else {
            failed(format!("could not start: {}", e))
        }
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_sink = Arc::new(Mutex::new(Vec::new()));
    let stderr_sink = Arc::new(Mutex::new(Vec::new()));
    let stdout_handle = spawn_reader(stdout, Arc::clone(&stdout_sink));
    let stderr_handle = spawn_reader(stderr, Arc::clone(&stderr_sink));

    let status = match options.timeout {
        Some(limit) => match child.wait_timeout(limit) {
            Ok(Some(status)) => Some(status),
            Ok(None) => {
                warn!(timeout_secs = limit.as_secs_f64(), "command timed out, killing");
                kill_and_reap(&mut child).map_err(|e| failed(format!("could not stop: {}", e)))?;
                None
            }
            Err(e) => return Err(failed(format!("could not wait: {}", e))),
        },
        None => Some(
            child
                .wait()
                .map_err(|e| failed(format!("could not wait: {}", e)))?,
        ),
    };

    let duration = start.elapsed();

    let Some(status) = status else {
        // Grandchildren may still hold the pipes open; don't block on them.
        wait_for_readers(&[&stdout_handle, &stderr_handle], READER_GRACE);
        return Ok(CommandResult::timeout(
            snapshot(&stdout_sink),
            snapshot(&stderr_sink),
            duration,
        ));
    };

    join_reader(stdout_handle).context("join stdout")?;
    join_reader(stderr_handle).context("join stderr")?;

    let stdout = snapshot(&stdout_sink);
    let stderr = snapshot(&stderr_sink);

    debug!(exit_code = ?status.code(), "command finished");
    if status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(status.code(), stdout, stderr, duration))
    }
}

fn kill_and_reap(child: &mut Child) -> std::io::Result<()> {
    if let Err(e) = child.kill() {
        // Already exited between the deadline and the kill.
        if e.kind() != std::io::ErrorKind::InvalidInput {
            return Err(e);
        }
    }
    child.wait()?;
    Ok(())
}

fn spawn_reader<R: Read + Send + 'static>(
    mut reader: R,
    sink: Arc<Mutex<Vec<u8>>>,
) -> JoinHandle<std::io::Result<()>> {
    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                return Ok(());
            }
            if let Ok(mut out) = sink.lock() {
                out.extend_from_slice(&buf[..n]);
            }
        }
    })
}

fn join_reader(handle: JoinHandle<std::io::Result<()>>) -> anyhow::Result<()> {
    match handle.join() {
        Ok(result) => result.context("read child output"),
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn wait_for_readers(handles: &[&JoinHandle<std::io::Result<()>>], grace: Duration) {
    let deadline = Instant::now() + grace;
    while Instant::now() < deadline && !handles.iter().all(|h| h.is_finished()) {
        thread::sleep(Duration::from_millis(10));
    }
}

fn snapshot(sink: &Mutex<Vec<u8>>) -> String {
    sink.lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
