//! Child process execution.
//!
//! Commands are run directly (no intermediate shell) so arguments such as
//! inline Python snippets reach the program unmangled on every platform.

use crate::error::{CheckError, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a running command is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a spec with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build a spec from a word list (`["py", "-3"]`).
    ///
    /// Returns `None` for an empty list.
    pub fn from_words(words: &[String]) -> Option<Self> {
        let (program, args) = words.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The command line as it would be typed, space separated.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A `std::process::Command` for this spec with stdin closed.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd
    }
}

/// Result of executing a command to completion.
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
        }
    }

    /// Last non-blank line of stdout, trimmed.
    pub fn last_stdout_line(&self) -> Option<&str> {
        last_line(&self.stdout)
    }

    /// Last non-blank line of stderr, trimmed.
    pub fn last_stderr_line(&self) -> Option<&str> {
        last_line(&self.stderr)
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rfind(|l| !l.is_empty())
}

/// Runs short-lived commands to completion.
///
/// The probes go through this trait so tests can substitute
/// [`MockRunner`](super::MockRunner) for real processes.
pub trait CommandRunner {
    /// Run `spec`, capturing stdout and stderr.
    ///
    /// A non-zero exit is a successful `Ok` with `success == false`;
    /// `Err` means the command could not be run or exceeded `timeout`.
    fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<CommandResult>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<CommandResult> {
        run_with_timeout(spec, timeout)
    }
}

/// Run a command, killing it if it outlives `timeout`.
pub fn run_with_timeout(spec: &CommandSpec, timeout: Duration) -> Result<CommandResult> {
    let start = Instant::now();
    let command = spec.display();
    tracing::debug!("Running `{}` (timeout {:?})", command, timeout);

    let mut child = spec
        .to_command()
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CheckError::SpawnFailed {
            command: command.clone(),
            source,
        })?;

    let stdout_handle = child.stdout.take().map(read_to_string_in_background);
    let stderr_handle = child.stderr.take().map(read_to_string_in_background);

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!("`{}` timed out after {:?}", command, start.elapsed());
            return Err(CheckError::Timeout {
                command,
                timeout_secs: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = join_output(stdout_handle);
    let stderr = join_output(stderr_handle);
    let duration = start.elapsed();

    tracing::debug!(
        "`{}` exited with {:?} after {:?}",
        command,
        status.code(),
        duration
    );

    if status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

fn read_to_string_in_background<R>(mut reader: R) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_output(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
