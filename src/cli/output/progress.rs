//! Spinner utilities using indicatif for terminal output
//!
//! Spinners draw to stderr and are hidden in JSON mode or when stderr is not
//! a terminal, so they never interleave with machine-readable output.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a spinner for an operation of unknown length
pub fn create_spinner(message: impl Into<String>, json_mode: bool) -> ProgressBar {
    if json_mode || !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Extension trait for finishing spinners with a status marker
pub trait ProgressBarExt {
    /// Finish with a success message (green checkmark)
    fn finish_success(&self, message: impl Into<String>);

    /// Finish with an error message (red X)
    fn finish_error(&self, message: impl Into<String>);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        self.finish_with_message(format!("{} {}", console::style("✓").green(), message.into()));
    }

    fn finish_error(&self, message: impl Into<String>) {
        self.finish_with_message(format!("{} {}", console::style("✗").red(), message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_hidden_in_json_mode() {
        let spinner = create_spinner("Building", true);
        assert!(spinner.is_hidden());
        spinner.finish_success("done");
        assert!(spinner.is_finished());
    }
}
