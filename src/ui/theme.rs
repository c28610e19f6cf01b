//! Visual theme and styling.

use console::Style;

use super::Status;

/// Styles for the report.
///
/// Only the bracketed tag is colored; the message text stays plain so
/// logs copied from a terminal read the same as piped output.
#[derive(Debug, Clone)]
pub struct CheckTheme {
    /// Style for `[OK]` (green).
    pub ok: Style,
    /// Style for `[FAIL]` (red bold).
    pub fail: Style,
    /// Style for `[WARNING]` (orange).
    pub warning: Style,
    /// Style for `[SUCCESS]` (green bold).
    pub success: Style,
    /// Style for the header/footer rule (dim).
    pub rule: Style,
}

impl Default for CheckTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckTheme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            ok: Style::new().green(),
            fail: Style::new().red().bold(),
            warning: Style::new().color256(208),
            success: Style::new().green().bold(),
            rule: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            ok: Style::new(),
            fail: Style::new(),
            warning: Style::new(),
            success: Style::new(),
            rule: Style::new(),
        }
    }

    fn style_for(&self, status: Status) -> &Style {
        match status {
            Status::Ok => &self.ok,
            Status::Fail => &self.fail,
            Status::Warning => &self.warning,
            Status::Success => &self.success,
        }
    }

    /// Format a status line: styled tag, then the plain message.
    pub fn format_status(&self, status: Status, msg: &str) -> String {
        format!("{} {}", self.style_for(status).apply_to(status.tag()), msg)
    }

    /// Format the `=` rule.
    pub fn format_rule(&self, width: usize) -> String {
        format!("{}", self.rule.apply_to("=".repeat(width)))
    }
}

/// Check if colors should be used.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check if stdout is a TTY
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_formats_tag_and_message() {
        let theme = CheckTheme::plain();
        assert_eq!(
            theme.format_status(Status::Fail, "Could not connect"),
            "[FAIL] Could not connect"
        );
    }

    #[test]
    fn colored_theme_keeps_tag_text() {
        let theme = CheckTheme::new();
        let line = theme.format_status(Status::Ok, "ready");
        assert!(line.contains("[OK]"));
        assert!(line.ends_with("ready"));
    }

    #[test]
    fn plain_rule_is_equals_signs() {
        assert_eq!(CheckTheme::plain().format_rule(5), "=====");
    }

    #[test]
    fn default_impl_matches_new() {
        let _ = CheckTheme::default();
    }
}
