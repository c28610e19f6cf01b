//! Check run orchestration.

use crate::config::CheckConfig;
use crate::probe::{
    probe_launcher, probe_module, probe_server, LauncherStatus, ServerProbe, ShutdownOutcome,
};
use crate::shell::{AlternateLauncher, CommandRunner};
use crate::ui::Reporter;

use super::summary::CheckSummary;

const TITLE: &str = "ChromaDB Installation and Functionality Test";

/// What a working install lets the application do.
const CAPABILITIES: [&str; 3] = [
    "- Start ChromaDB server using: chroma run",
    "- Use semantic search features",
    "- Store and query document embeddings",
];

/// Runs the probes in order and prints the report.
pub struct Checker<'a> {
    config: &'a CheckConfig,
    runner: &'a dyn CommandRunner,
    launcher: Option<AlternateLauncher>,
}

impl<'a> Checker<'a> {
    /// Create a checker. The alternate launcher comes from the config, or
    /// from the platform when the config leaves it unset.
    pub fn new(config: &'a CheckConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            launcher: AlternateLauncher::resolve(config.launcher.as_deref()),
        }
    }

    /// Replace the resolved launcher.
    pub fn with_launcher(mut self, launcher: Option<AlternateLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn launcher(&self) -> Option<&AlternateLauncher> {
        self.launcher.as_ref()
    }

    /// Run every check and return the summary.
    ///
    /// A missing module ends the run before anything is launched. Once the
    /// server has been started it is always stopped, and its data directory
    /// removed, before this returns.
    pub fn run(&self, reporter: &mut dyn Reporter) -> CheckSummary {
        reporter.rule();
        reporter.message(TITLE);
        reporter.rule();
        reporter.message("");

        let module = probe_module(self.runner, self.config, reporter);
        if !module.is_found() {
            reporter.message("");
            reporter.warning(
                "ChromaDB module not installed. The application will not be able to use semantic search features.",
            );
            return CheckSummary::new(module, LauncherStatus::NotApplicable, None, None);
        }

        let launcher = probe_launcher(
            self.runner,
            self.launcher.as_ref(),
            self.config,
            reporter,
        );
        if launcher.needs_warning() {
            if let Some(alt) = &self.launcher {
                reporter.warning(&format!(
                    "{} launcher may have issues, but direct python execution works",
                    alt.name()
                ));
            }
        }

        let probe = probe_server(self.config, reporter);
        let outcome = probe.outcome.clone();
        let shutdown = self.cleanup(probe, reporter);

        let summary = CheckSummary::new(module, launcher, Some(outcome), shutdown);
        self.footer(&summary, reporter);
        summary
    }

    /// Stop the server and remove its data directory.
    fn cleanup(&self, probe: ServerProbe, reporter: &mut dyn Reporter) -> Option<ShutdownOutcome> {
        let ServerProbe {
            process, scratch, ..
        } = probe;

        let shutdown = process.and_then(|mut process| {
            reporter.message("");
            reporter.message("Stopping test server...");
            match process.shutdown(self.config.kill_grace()) {
                Ok(outcome) => {
                    tracing::debug!("Server {} stopped: {:?}", process.id(), outcome);
                    Some(outcome)
                }
                Err(e) => {
                    tracing::warn!("Failed to stop server {}: {}", process.id(), e);
                    None
                }
            }
        });

        drop(scratch);
        shutdown
    }

    fn footer(&self, summary: &CheckSummary, reporter: &mut dyn Reporter) {
        reporter.message("");
        reporter.rule();
        if summary.passed {
            reporter.success("All tests passed! ChromaDB is working correctly.");
            reporter.message("");
            reporter.message("The application should now be able to:");
            for line in CAPABILITIES {
                reporter.message(line);
            }
        } else {
            reporter.fail("Some tests failed. Please check the errors above.");
        }
    }
}
