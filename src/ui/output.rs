//! Output mode.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Narration, status lines and the startup spinner.
    #[default]
    Normal,
    /// Status lines only.
    Quiet,
    /// Nothing (used when a JSON report replaces the console report).
    Silent,
}

impl OutputMode {
    /// Check if this mode shows informational lines and rules.
    pub fn shows_messages(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Check if this mode shows the startup spinner.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Check if this mode shows tagged status lines.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}
