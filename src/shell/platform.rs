//! Platform capabilities.

use super::command::CommandSpec;

/// An alternate interpreter entry point, such as the Windows `py` launcher.
///
/// Whether one exists is a capability of the environment rather than a hard
/// platform branch: detection picks `py -3` on Windows, and configuration
/// can supply one anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLauncher {
    spec: CommandSpec,
}

impl AlternateLauncher {
    /// The launcher this platform offers, if any.
    pub fn detect() -> Option<Self> {
        Self::for_platform(cfg!(target_os = "windows"))
    }

    /// The launcher offered on Windows (`py -3`) or nothing elsewhere.
    pub fn for_platform(is_windows: bool) -> Option<Self> {
        if is_windows {
            Self::from_words(&["py".to_string(), "-3".to_string()])
        } else {
            None
        }
    }

    /// Build a launcher from its command words. Empty means "no launcher".
    pub fn from_words(words: &[String]) -> Option<Self> {
        CommandSpec::from_words(words).map(|spec| Self { spec })
    }

    /// Resolve the configured launcher.
    ///
    /// `None` auto-detects; `Some(words)` is used as-is, so an empty list
    /// turns the launcher probe off.
    pub fn resolve(configured: Option<&[String]>) -> Option<Self> {
        match configured {
            Some(words) => Self::from_words(words),
            None => Self::detect(),
        }
    }

    /// Human-readable name, e.g. `py -3`.
    pub fn name(&self) -> String {
        self.spec.display()
    }

    /// The launcher invocation with `args` appended.
    pub fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.clone().args(args)
    }
}

/// Check if running in a CI environment.
///
/// Used to suppress the startup spinner where nobody is watching.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    ci_detected(|name| std::env::var_os(name).is_some())
}

const CI_VARS: [&str; 6] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

fn ci_detected(is_set: impl Fn(&str) -> bool) -> bool {
    CI_VARS.iter().any(|name| is_set(name))
}
