//! Ownership of the spawned server process.
//!
//! [`ServerProcess`] holds the child from launch until it has been reaped.
//! Its output is drained on background threads so a chatty server never
//! blocks on a full pipe, and dropping the handle kills the child if
//! [`ServerProcess::shutdown`] was never called.

use std::io::{BufRead, BufReader, Read};
use std::process::{Child, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{CheckError, Result};
use crate::shell::CommandSpec;

/// How often a terminating process is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long to wait for the output readers to reach EOF after the
/// process has exited.
const OUTPUT_SETTLE: Duration = Duration::from_secs(1);

/// How the process ended up stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownOutcome {
    /// It had already exited; only reaped.
    AlreadyExited,
    /// It exited after the termination signal.
    Terminated,
    /// It ignored the termination signal and was force-killed.
    Killed,
}

/// Captured output of one stream.
struct OutputCapture {
    buffer: Arc<Mutex<String>>,
    reader: Option<JoinHandle<()>>,
}

impl OutputCapture {
    fn start<R>(stream: Option<R>) -> Self
    where
        R: Read + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(String::new()));
        let reader = stream.map(|stream| {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                let reader = BufReader::new(stream);
                for line in reader.lines().map_while(std::result::Result::ok) {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.push_str(&line);
                        buf.push('\n');
                    }
                }
            })
        });
        Self { buffer, reader }
    }

    fn is_finished(&self) -> bool {
        self.reader.as_ref().is_none_or(JoinHandle::is_finished)
    }

    fn snapshot(&self) -> String {
        self.buffer
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default()
    }
}

/// A running server child process.
pub struct ServerProcess {
    child: Child,
    command: String,
    stdout: OutputCapture,
    stderr: OutputCapture,
    exit: Option<ExitStatus>,
}

impl ServerProcess {
    /// Launch `spec` without waiting for it, capturing stdout and stderr.
    pub fn spawn(spec: &CommandSpec) -> Result<Self> {
        let command = spec.display();
        tracing::debug!("Spawning `{}`", command);

        let mut child = spec
            .to_command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CheckError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

        let stdout = OutputCapture::start(child.stdout.take());
        let stderr = OutputCapture::start(child.stderr.take());
        tracing::debug!("`{}` running as pid {}", command, child.id());

        Ok(Self {
            child,
            command,
            stdout,
            stderr,
            exit: None,
        })
    }

    /// OS process id.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Exit status if the process has exited, without blocking.
    pub fn exit_status(&mut self) -> Option<ExitStatus> {
        if self.exit.is_none() {
            match self.child.try_wait() {
                Ok(status) => self.exit = status,
                Err(e) => tracing::debug!("try_wait on pid {} failed: {}", self.id(), e),
            }
        }
        self.exit
    }

    /// Whether the process is still running.
    pub fn is_running(&mut self) -> bool {
        self.exit_status().is_none()
    }

    /// Everything the process has written to stderr so far.
    pub fn captured_stderr(&mut self) -> String {
        self.settle_output();
        self.stderr.snapshot()
    }

    /// If the process has exited, give the readers a moment to drain the pipes.
    fn settle_output(&mut self) {
        if self.exit_status().is_none() {
            return;
        }
        let start = Instant::now();
        while !(self.stdout.is_finished() && self.stderr.is_finished())
            && start.elapsed() < OUTPUT_SETTLE
        {
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Stop the process: terminate, wait up to `grace`, then force-kill.
    pub fn shutdown(&mut self, grace: Duration) -> Result<ShutdownOutcome> {
        if self.exit_status().is_some() {
            return Ok(ShutdownOutcome::AlreadyExited);
        }

        tracing::debug!("Terminating `{}` (pid {})", self.command, self.id());
        self.terminate()?;

        let start = Instant::now();
        while start.elapsed() < grace {
            if self.exit_status().is_some() {
                return Ok(ShutdownOutcome::Terminated);
            }
            thread::sleep(POLL_INTERVAL);
        }
        if self.exit_status().is_some() {
            return Ok(ShutdownOutcome::Terminated);
        }

        tracing::debug!("pid {} still running after {:?}, killing", self.id(), grace);
        self.kill()?;
        Ok(ShutdownOutcome::Killed)
    }

    /// Force-kill and reap.
    fn kill(&mut self) -> Result<()> {
        match self.child.kill() {
            Ok(()) => {}
            // Exited between the last poll and the kill.
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e.into()),
        }
        self.exit = Some(self.child.wait()?);
        Ok(())
    }

    /// Ask the process to exit.
    #[cfg(unix)]
    fn terminate(&mut self) -> Result<()> {
        let pid = libc::pid_t::try_from(self.id())
            .map_err(|_| anyhow::anyhow!("pid {} out of range", self.id()))?;
        // SAFETY: kill(2) with a pid we own and a valid signal number has no
        // memory-safety requirements.
        let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            // ESRCH: already gone, reaped by the next poll.
            if err.raw_os_error() != Some(libc::ESRCH) {
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Ask the process to exit.
    ///
    /// Windows has no graceful signal for console processes that were not
    /// started in their own group, so this is `TerminateProcess`.
    #[cfg(not(unix))]
    fn terminate(&mut self) -> Result<()> {
        match self.child.kill() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        if self.exit_status().is_none() {
            tracing::debug!("Killing `{}` (pid {}) on drop", self.command, self.id());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

impl std::fmt::Debug for ServerProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerProcess")
            .field("pid", &self.child.id())
            .field("command", &self.command)
            .field("exit", &self.exit)
            .finish()
    }
}

/// Render an exit status the way it is reported: the code, or the signal.
pub fn describe_exit(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return code.to_string();
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal {}", signal);
        }
    }
    "unknown".to_string()
}
