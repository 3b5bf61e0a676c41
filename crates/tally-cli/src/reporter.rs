//! Summary reporter - one line on stdout, failure details in the log

use colored::*;
use log::warn;
use tally_core::TestResult;

/// Prints the summary line
#[derive(Debug, Default)]
pub struct SummaryReporter {
    /// Disable colored output
    no_color: bool,
}

impl SummaryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Log each failure, then print the summary
    pub fn report(&self, result: &TestResult) {
        for record in result.failures() {
            warn!("{}: {}", record.case, record.failure);
        }

        println!("{}", self.render(result));
    }

    /// The summary line, colored green on success and red otherwise
    pub fn render(&self, result: &TestResult) -> String {
        let summary = result.summary();
        if self.no_color {
            return summary;
        }

        if result.is_success() {
            summary.green().to_string()
        } else {
            summary.red().bold().to_string()
        }
    }
}
