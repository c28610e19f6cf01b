//! CLI argument definitions.
//!
//! Every setting can come from a flag or a `CHROMA_CHECK_*` environment
//! variable; both land in the highest-priority config layer.

use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigOverlay;

/// chroma-check - Verify that ChromaDB is installed and its server starts.
#[derive(Debug, Parser)]
#[command(name = "chroma-check")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides ./chroma-check.yml)
    #[arg(short, long, env = "CHROMA_CHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Python interpreter used for the import check
    #[arg(long, env = "CHROMA_CHECK_PYTHON")]
    pub python: Option<String>,

    /// Module to import
    #[arg(long, env = "CHROMA_CHECK_MODULE")]
    pub module: Option<String>,

    /// Server executable, invoked as `<server> run ...`
    #[arg(long = "server", env = "CHROMA_CHECK_SERVER")]
    pub server_command: Option<String>,

    /// Host the test server binds to
    #[arg(long, env = "CHROMA_CHECK_HOST")]
    pub host: Option<String>,

    /// Port the test server binds to
    #[arg(short, long, env = "CHROMA_CHECK_PORT")]
    pub port: Option<u16>,

    /// Scratch data directory for the test server
    #[arg(long, env = "CHROMA_CHECK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seconds to wait after launching the server
    #[arg(long, value_name = "SECS", env = "CHROMA_CHECK_STARTUP_WAIT")]
    pub startup_wait: Option<u64>,

    /// Per-request heartbeat timeout in seconds
    #[arg(long, value_name = "SECS", env = "CHROMA_CHECK_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Launcher probe timeout in seconds
    #[arg(long, value_name = "SECS", env = "CHROMA_CHECK_LAUNCHER_TIMEOUT")]
    pub launcher_timeout: Option<u64>,

    /// Module probe timeout in seconds
    #[arg(long, value_name = "SECS", env = "CHROMA_CHECK_MODULE_TIMEOUT")]
    pub module_timeout: Option<u64>,

    /// Milliseconds between terminate and force-kill
    #[arg(long, value_name = "MS", env = "CHROMA_CHECK_KILL_GRACE_MS")]
    pub kill_grace_ms: Option<u64>,

    /// Alternate launcher to probe, e.g. "py -3"
    #[arg(long, env = "CHROMA_CHECK_LAUNCHER", conflicts_with = "no_launcher")]
    pub launcher: Option<String>,

    /// Skip the alternate launcher probe
    #[arg(long)]
    pub no_launcher: bool,

    /// Print a JSON summary instead of the report
    #[arg(long)]
    pub json: bool,

    /// Only print status lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// The settings given on the command line or in the environment.
    pub fn overlay(&self) -> ConfigOverlay {
        let launcher = if self.no_launcher {
            Some(Vec::new())
        } else {
            self.launcher
                .as_deref()
                .map(|words| words.split_whitespace().map(str::to_string).collect())
        };

        ConfigOverlay {
            python: self.python.clone(),
            module: self.module.clone(),
            server_command: self.server_command.clone(),
            host: self.host.clone(),
            port: self.port,
            data_dir: self.data_dir.clone(),
            startup_wait_secs: self.startup_wait,
            request_timeout_secs: self.request_timeout,
            launcher_timeout_secs: self.launcher_timeout,
            module_timeout_secs: self.module_timeout,
            kill_grace_ms: self.kill_grace_ms,
            launcher,
        }
    }
}
