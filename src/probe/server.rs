//! Server startup probe.
//!
//! Launches `chroma run` against a scratch directory, waits a fixed grace
//! period, then polls the heartbeat once (v2, falling back to v1). There is
//! no readiness loop beyond that single wait.

use serde::Serialize;
use std::thread;

use crate::config::CheckConfig;
use crate::shell::CommandSpec;
use crate::ui::Reporter;

use super::heartbeat::{HeartbeatClient, HeartbeatOutcome};
use super::process::{describe_exit, ServerProcess};
use super::scratch::ScratchDir;

/// How the server probe ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServerOutcome {
    /// A heartbeat path answered 200.
    Healthy { path: String },
    /// The server answered with something other than 200.
    UnexpectedStatus {
        code: u16,
        server_exit: Option<ExitReport>,
    },
    /// Nothing answered on the heartbeat paths.
    Unreachable {
        error: String,
        server_exit: Option<ExitReport>,
    },
    /// The scratch directory or the process could not be set up.
    LaunchFailed { error: String },
}

impl ServerOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ServerOutcome::Healthy { .. })
    }
}

/// Diagnostics from a server that exited before it could be probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitReport {
    /// Exit code, or the terminating signal.
    pub code: String,
    /// Everything the server wrote to stderr.
    pub stderr: String,
}

/// Result of the server probe, including the resources the caller must clean up.
///
/// Field order is drop order: the process is stopped before its data
/// directory is removed.
#[derive(Debug)]
pub struct ServerProbe {
    pub outcome: ServerOutcome,
    pub process: Option<ServerProcess>,
    pub scratch: Option<ScratchDir>,
}

impl ServerProbe {
    pub fn passed(&self) -> bool {
        self.outcome.is_healthy()
    }

    fn launch_failed(
        reporter: &mut dyn Reporter,
        error: String,
        scratch: Option<ScratchDir>,
    ) -> Self {
        reporter.fail(&format!("Failed to start ChromaDB server: {}", error));
        Self {
            outcome: ServerOutcome::LaunchFailed { error },
            process: None,
            scratch,
        }
    }
}

/// The server invocation: `<server> run --path <dir> --host <host> --port <port>`.
pub fn server_command(config: &CheckConfig) -> CommandSpec {
    CommandSpec::new(&config.server_command).args([
        "run".to_string(),
        "--path".to_string(),
        config.data_dir.to_string_lossy().into_owned(),
        "--host".to_string(),
        config.host.clone(),
        "--port".to_string(),
        config.port.to_string(),
    ])
}

/// Launch the server and check that it answers its heartbeat.
pub fn probe_server(config: &CheckConfig, reporter: &mut dyn Reporter) -> ServerProbe {
    reporter.message("");
    reporter.message("Testing ChromaDB server startup...");

    let scratch = match ScratchDir::create(&config.data_dir) {
        Ok(scratch) => scratch,
        Err(e) => return ServerProbe::launch_failed(reporter, e.to_string(), None),
    };

    let client = match HeartbeatClient::new(config.base_url(), config.request_timeout()) {
        Ok(client) => client,
        Err(e) => return ServerProbe::launch_failed(reporter, e.to_string(), Some(scratch)),
    };

    let spec = server_command(config);
    reporter.message(&format!("Starting server with command: {}", spec.display()));

    let mut process = match ServerProcess::spawn(&spec) {
        Ok(process) => process,
        Err(e) => return ServerProbe::launch_failed(reporter, e.to_string(), Some(scratch)),
    };

    reporter.message("Waiting for server to start...");
    let mut spinner = reporter.start_spinner("Waiting for server to start");
    thread::sleep(config.startup_wait());
    spinner.finish();

    let outcome = match client.check() {
        HeartbeatOutcome::Healthy { path } => {
            tracing::debug!("Heartbeat answered on {}", path);
            reporter.ok("ChromaDB server is running and responding");
            ServerOutcome::Healthy { path }
        }
        HeartbeatOutcome::UnexpectedStatus { code, .. } => {
            reporter.fail(&format!("Server responded with status code: {}", code));
            ServerOutcome::UnexpectedStatus {
                code,
                server_exit: report_early_exit(&mut process, reporter),
            }
        }
        HeartbeatOutcome::Unreachable { error, .. } => {
            tracing::debug!("Heartbeat unreachable: {}", error);
            reporter.fail("Could not connect to ChromaDB server");
            ServerOutcome::Unreachable {
                error,
                server_exit: report_early_exit(&mut process, reporter),
            }
        }
    };

    ServerProbe {
        outcome,
        process: Some(process),
        scratch: Some(scratch),
    }
}

/// If the server already exited, print and return its exit code and stderr.
fn report_early_exit(
    process: &mut ServerProcess,
    reporter: &mut dyn Reporter,
) -> Option<ExitReport> {
    let status = process.exit_status()?;
    let report = ExitReport {
        code: describe_exit(status),
        stderr: process.captured_stderr().trim_end().to_string(),
    };

    reporter.message(&format!("Server process exited with code: {}", report.code));
    if !report.stderr.is_empty() {
        reporter.message(&format!("Server error output: {}", report.stderr));
    }
    Some(report)
}
