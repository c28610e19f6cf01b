//! Configuration schema.
//!
//! [`CheckConfig`] is the fully resolved configuration a run works from.
//! [`ConfigOverlay`] is a partial layer (a YAML file, or the command line)
//! that is merged on top of it; see [`super::merger`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default bind host for the test server.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port for the test server.
pub const DEFAULT_PORT: u16 = 8000;

/// Default scratch directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "test_chromadb_data";

/// Default Python module to probe.
pub const DEFAULT_MODULE: &str = "chromadb";

/// Default server executable.
pub const DEFAULT_SERVER_COMMAND: &str = "chroma";

/// Resolved configuration for a check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckConfig {
    /// Python interpreter used for the module probe.
    pub python: String,

    /// Python module that must be importable.
    pub module: String,

    /// Server executable, invoked as `<server_command> run ...`.
    pub server_command: String,

    /// Host the server binds to and the heartbeat is polled on.
    pub host: String,

    /// Port the server binds to and the heartbeat is polled on.
    pub port: u16,

    /// Scratch directory handed to the server as its data path.
    pub data_dir: PathBuf,

    /// Fixed wait between launching the server and polling it.
    pub startup_wait_secs: u64,

    /// Timeout for each heartbeat request.
    pub request_timeout_secs: u64,

    /// Timeout for the alternate launcher probe.
    pub launcher_timeout_secs: u64,

    /// Timeout for the module probe.
    pub module_timeout_secs: u64,

    /// Wait between the termination signal and the force-kill.
    pub kill_grace_ms: u64,

    /// Alternate interpreter launcher.
    ///
    /// `None` auto-detects from the platform, an empty list disables the
    /// launcher probe, anything else is used verbatim (e.g. `["py", "-3"]`).
    pub launcher: Option<Vec<String>>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            python: default_python().to_string(),
            module: DEFAULT_MODULE.to_string(),
            server_command: DEFAULT_SERVER_COMMAND.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            startup_wait_secs: 3,
            request_timeout_secs: 2,
            launcher_timeout_secs: 5,
            module_timeout_secs: 30,
            kill_grace_ms: 1000,
            launcher: None,
        }
    }
}

impl CheckConfig {
    pub fn startup_wait(&self) -> Duration {
        Duration::from_secs(self.startup_wait_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn launcher_timeout(&self) -> Duration {
        Duration::from_secs(self.launcher_timeout_secs)
    }

    pub fn module_timeout(&self) -> Duration {
        Duration::from_secs(self.module_timeout_secs)
    }

    pub fn kill_grace(&self) -> Duration {
        Duration::from_millis(self.kill_grace_ms)
    }

    /// Base URL of the server under test, without a trailing slash.
    ///
    /// IPv6 literals are bracketed (`http://[::1]:8000`).
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

/// A partial configuration layer.
///
/// Every field is optional; `None` leaves the underlying value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverlay {
    pub python: Option<String>,
    pub module: Option<String>,
    pub server_command: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub startup_wait_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub launcher_timeout_secs: Option<u64>,
    pub module_timeout_secs: Option<u64>,
    pub kill_grace_ms: Option<u64>,
    pub launcher: Option<Vec<String>>,
}

/// Interpreter name used when none is configured.
///
/// Windows installs register `python`; most Unix distributions only ship
/// `python3` on PATH.
pub fn default_python() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}
