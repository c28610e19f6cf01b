//! Mock reporter for testing.
//!
//! `MockReporter` implements the `Reporter` trait and captures every line
//! for later assertion.
//!
//! # Example
//!
//! ```
//! use chroma_check::ui::{MockReporter, Reporter};
//!
//! let mut reporter = MockReporter::new();
//! reporter.message("Testing ChromaDB module import...");
//! reporter.ok("ChromaDB module found: version 1.0.21");
//!
//! assert!(reporter.contains("[OK] ChromaDB module found"));
//! ```

use super::{Reporter, SpinnerHandle, Status};

/// A captured line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Message(String),
    Status(Status, String),
    Rule,
}

impl Line {
    /// The line as the console would print it, without styling.
    pub fn render(&self) -> String {
        match self {
            Line::Message(msg) => msg.clone(),
            Line::Status(status, msg) => format!("{} {}", status.tag(), msg),
            Line::Rule => "=".repeat(super::RULE_WIDTH),
        }
    }
}

/// Reporter that records lines instead of printing them.
#[derive(Debug, Default)]
pub struct MockReporter {
    lines: Vec<Line>,
    spinners: Vec<String>,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines in order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Captured lines rendered as plain text.
    pub fn rendered(&self) -> Vec<String> {
        self.lines.iter().map(Line::render).collect()
    }

    /// Whether any rendered line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.render().contains(needle))
    }

    /// Captured status lines only.
    pub fn statuses(&self) -> Vec<(Status, String)> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                Line::Status(status, msg) => Some((*status, msg.clone())),
                _ => None,
            })
            .collect()
    }

    /// Whether a line with `status` was reported.
    pub fn has_status(&self, status: Status) -> bool {
        self.statuses().iter().any(|(s, _)| *s == status)
    }

    /// Messages passed to `start_spinner`.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }
}

impl Reporter for MockReporter {
    fn message(&mut self, msg: &str) {
        self.lines.push(Line::Message(msg.to_string()));
    }

    fn status(&mut self, status: Status, msg: &str) {
        self.lines.push(Line::Status(status, msg.to_string()));
    }

    fn rule(&mut self) {
        self.lines.push(Line::Rule);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner)
    }
}

/// Spinner that does nothing.
#[derive(Debug)]
pub struct MockSpinner;

impl SpinnerHandle for MockSpinner {
    fn finish(&mut self) {}
}
