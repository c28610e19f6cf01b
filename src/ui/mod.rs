//! Console reporting.
//!
//! This module provides:
//! - [`Reporter`] trait so probes can be run against a mock in tests
//! - [`ConsoleReporter`] for real terminal output
//! - [`MockReporter`] which captures every line for assertions
//!
//! # Example
//!
//! ```
//! use chroma_check::ui::{create_reporter, OutputMode, Reporter};
//!
//! let mut reporter = create_reporter(OutputMode::Silent);
//! reporter.ok("ChromaDB module found: version 1.0.21");
//! ```

pub mod mock;
pub mod output;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::MockReporter;
pub use output::OutputMode;
pub use spinner::ProgressSpinner;
pub use terminal::{create_reporter, ConsoleReporter};
pub use theme::{should_use_colors, CheckTheme};

use std::fmt;

/// Outcome tag printed in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Fail,
    Warning,
    Success,
}

impl Status {
    /// The bracketed tag, e.g. `[OK]`.
    pub fn tag(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Fail => "[FAIL]",
            Status::Warning => "[WARNING]",
            Status::Success => "[SUCCESS]",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Sink for everything a check run prints.
pub trait Reporter {
    /// Informational line (progress narration, diagnostics).
    fn message(&mut self, msg: &str);

    /// Tagged status line.
    fn status(&mut self, status: Status, msg: &str);

    /// Horizontal rule framing the header and footer.
    fn rule(&mut self);

    /// Start an indicator for a wait the caller is about to perform.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    fn ok(&mut self, msg: &str) {
        self.status(Status::Ok, msg);
    }

    fn fail(&mut self, msg: &str) {
        self.status(Status::Fail, msg);
    }

    fn warning(&mut self, msg: &str) {
        self.status(Status::Warning, msg);
    }

    fn success(&mut self, msg: &str) {
        self.status(Status::Success, msg);
    }
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Remove the spinner from the screen.
    fn finish(&mut self);
}

/// Width of the `=` rule around the header and footer.
pub const RULE_WIDTH: usize = 60;
