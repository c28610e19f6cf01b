//! Alternate launcher probe.
//!
//! Where the environment offers a second way to start Python (the Windows
//! `py -3` launcher), check that it can import the module too. A failure
//! here is only ever a warning.

use serde::Serialize;

use crate::config::CheckConfig;
use crate::shell::{AlternateLauncher, CommandRunner, CommandSpec};
use crate::ui::Reporter;

/// Result of the launcher probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LauncherStatus {
    /// No alternate launcher on this platform.
    NotApplicable,
    /// The launcher imported the module.
    Works { launcher: String },
    /// The launcher ran but the import failed.
    Failed { launcher: String, reason: String },
    /// The launcher could not be run (missing, timed out).
    Unavailable { launcher: String, reason: String },
}

impl LauncherStatus {
    /// Whether this result should produce a warning.
    pub fn needs_warning(&self) -> bool {
        matches!(
            self,
            LauncherStatus::Failed { .. } | LauncherStatus::Unavailable { .. }
        )
    }
}

/// The launcher invocation: `<launcher> -c "import <module>; print(...)"`.
pub fn launcher_command(launcher: &AlternateLauncher, module: &str) -> CommandSpec {
    launcher.command([
        "-c".to_string(),
        format!("import {}; print('ChromaDB imported successfully')", module),
    ])
}

/// Run the import through `launcher`.
pub fn check_launcher(
    runner: &dyn CommandRunner,
    launcher: &AlternateLauncher,
    config: &CheckConfig,
) -> LauncherStatus {
    let name = launcher.name();
    let spec = launcher_command(launcher, &config.module);

    match runner.run(&spec, config.launcher_timeout()) {
        Ok(result) if result.success => LauncherStatus::Works { launcher: name },
        Ok(result) => LauncherStatus::Failed {
            launcher: name,
            reason: result.stderr.trim_end().to_string(),
        },
        Err(e) => LauncherStatus::Unavailable {
            launcher: name,
            reason: e.to_string(),
        },
    }
}

/// Run the launcher probe, if a launcher is available, and report it.
///
/// Prints nothing when there is no launcher.
pub fn probe_launcher(
    runner: &dyn CommandRunner,
    launcher: Option<&AlternateLauncher>,
    config: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> LauncherStatus {
    let Some(launcher) = launcher else {
        return LauncherStatus::NotApplicable;
    };

    reporter.message("");
    reporter.message(&format!("Testing {} launcher...", launcher.name()));

    let status = check_launcher(runner, launcher, config);
    match &status {
        LauncherStatus::NotApplicable => {}
        LauncherStatus::Works { launcher } => {
            reporter.ok(&format!("{} launcher works with ChromaDB", launcher));
        }
        LauncherStatus::Failed { launcher, reason } => {
            reporter.fail(&format!("{} launcher failed: {}", launcher, reason));
        }
        LauncherStatus::Unavailable { launcher, reason } => {
            reporter.fail(&format!(
                "{} launcher not available or failed: {}",
                launcher, reason
            ));
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{MockResponse, MockRunner};
    use crate::ui::{MockReporter, Status};
    use std::time::Duration;

    fn py() -> AlternateLauncher {
        AlternateLauncher::for_platform(true).unwrap()
    }

    #[test]
    fn no_launcher_is_a_silent_pass() {
        let runner = MockRunner::new();
        let mut reporter = MockReporter::new();

        let status = probe_launcher(&runner, None, &CheckConfig::default(), &mut reporter);

        assert_eq!(status, LauncherStatus::NotApplicable);
        assert!(!status.needs_warning());
        assert!(reporter.lines().is_empty());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn launcher_import_success() {
        let runner = MockRunner::new();
        runner.respond_exit("py", 0, "ChromaDB imported successfully\n", "");
        let mut reporter = MockReporter::new();

        let status = probe_launcher(&runner, Some(&py()), &CheckConfig::default(), &mut reporter);

        assert_eq!(
            status,
            LauncherStatus::Works {
                launcher: "py -3".to_string()
            }
        );
        assert!(reporter.contains("Testing py -3 launcher..."));
        assert!(reporter.contains("[OK] py -3 launcher works with ChromaDB"));

        let call = &runner.calls()[0];
        assert_eq!(call.args[0], "-3");
        assert_eq!(call.args[1], "-c");
        assert!(call.args[2].starts_with("import chromadb;"));
    }

    #[test]
    fn launcher_nonzero_exit_is_failure() {
        let runner = MockRunner::new();
        runner.respond_exit("py", 1, "", "No installed Python found!\n");
        let mut reporter = MockReporter::new();

        let status = probe_launcher(&runner, Some(&py()), &CheckConfig::default(), &mut reporter);

        assert!(status.needs_warning());
        assert_eq!(
            reporter.statuses(),
            vec![(
                Status::Fail,
                "py -3 launcher failed: No installed Python found!".to_string()
            )]
        );
    }

    #[test]
    fn launcher_missing_is_unavailable() {
        let runner = MockRunner::new();
        let mut reporter = MockReporter::new();

        let status = probe_launcher(&runner, Some(&py()), &CheckConfig::default(), &mut reporter);

        assert!(matches!(status, LauncherStatus::Unavailable { .. }));
        assert!(reporter.contains("[FAIL] py -3 launcher not available or failed:"));
    }

    #[test]
    fn launcher_timeout_is_unavailable() {
        let runner = MockRunner::new();
        runner.respond("py", MockResponse::Timeout);

        let status = check_launcher(&runner, &py(), &CheckConfig::default());

        match status {
            LauncherStatus::Unavailable { reason, .. } => assert!(reason.contains("timed out")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn launcher_uses_configured_timeout() {
        let config = CheckConfig::default();
        assert_eq!(config.launcher_timeout(), Duration::from_secs(5));
    }
}
