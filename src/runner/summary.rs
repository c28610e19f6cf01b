//! Run summary and exit codes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::probe::{LauncherStatus, ModuleStatus, ServerOutcome, ShutdownOutcome};

/// Every required check passed.
pub const EXIT_SUCCESS: i32 = 0;

/// The module probe or the server probe failed.
pub const EXIT_FAILURE: i32 = 1;

/// The configuration could not be loaded.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub module: ModuleStatus,
    pub launcher: LauncherStatus,
    /// `None` when the run stopped before the server probe.
    pub server: Option<ServerOutcome>,
    /// How the server process was stopped, if one was started.
    pub server_shutdown: Option<ShutdownOutcome>,
    pub passed: bool,
    pub exit_code: i32,
    pub checked_at: DateTime<Utc>,
}

impl CheckSummary {
    /// Build a summary; pass/fail is derived from the module and server results.
    ///
    /// The launcher result never affects the outcome.
    pub fn new(
        module: ModuleStatus,
        launcher: LauncherStatus,
        server: Option<ServerOutcome>,
        server_shutdown: Option<ShutdownOutcome>,
    ) -> Self {
        let passed =
            module.is_found() && server.as_ref().is_some_and(ServerOutcome::is_healthy);
        Self {
            module,
            launcher,
            server,
            server_shutdown,
            passed,
            exit_code: if passed { EXIT_SUCCESS } else { EXIT_FAILURE },
            checked_at: Utc::now(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| anyhow::Error::from(e).into())
    }
}
