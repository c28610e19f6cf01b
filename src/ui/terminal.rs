//! Console reporter.

use console::Term;
use std::io::Write;

use super::{
    should_use_colors, CheckTheme, OutputMode, ProgressSpinner, Reporter, SpinnerHandle, Status,
    RULE_WIDTH,
};

/// Writes the report to stdout.
pub struct ConsoleReporter {
    term: Term,
    theme: CheckTheme,
    mode: OutputMode,
    spinners: bool,
}

impl ConsoleReporter {
    /// Create a reporter, detecting color and spinner support.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            CheckTheme::new()
        } else {
            CheckTheme::plain()
        };
        let spinners = Term::stderr().is_term() && !crate::shell::is_ci();

        Self::with_theme(mode, theme, spinners)
    }

    /// Create a reporter with an explicit theme and spinner setting.
    pub fn with_theme(mode: OutputMode, theme: CheckTheme, spinners: bool) -> Self {
        Self {
            term: Term::stdout(),
            theme,
            mode,
            spinners,
        }
    }
}

impl Reporter for ConsoleReporter {
    fn message(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn status(&mut self, status: Status, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_status(status, msg)).ok();
        }
    }

    fn rule(&mut self) {
        if self.mode.shows_messages() {
            writeln!(self.term, "{}", self.theme.format_rule(RULE_WIDTH)).ok();
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.spinners && self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }
}

/// Create the console reporter for `mode`.
pub fn create_reporter(mode: OutputMode) -> Box<dyn Reporter> {
    Box::new(ConsoleReporter::new(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_reporter_accepts_all_calls() {
        let mut reporter =
            ConsoleReporter::with_theme(OutputMode::Silent, CheckTheme::plain(), false);
        reporter.message("hidden");
        reporter.fail("hidden");
        reporter.rule();
        let mut spinner = reporter.start_spinner("hidden");
        spinner.finish();
    }
}
