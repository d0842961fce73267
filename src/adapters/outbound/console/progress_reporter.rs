use crate::ports::outbound::ProgressReporter;
use owo_colors::OwoColorize;

/// StderrProgressReporter adapter printing status lines to stderr
///
/// stdout is reserved for the rendered report.
pub struct StderrProgressReporter;

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn report_error(&self, message: &str) {
        eprintln!("{}", message.yellow());
    }

    fn report_completion(&self, message: &str) {
        eprintln!();
        eprintln!("{}", message.green());
    }
}
