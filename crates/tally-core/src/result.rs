//! Result aggregation - run/failure counters and the summary line

use crate::failure::Failure;
use std::fmt;

/// A failure attributed to the case that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Name of the failed case
    pub case: String,
    /// What went wrong
    pub failure: Failure,
}

/// Counters accumulated across one or more test runs
///
/// Mutated by the executor through [`record_start`](Self::record_start) and
/// [`record_failure`](Self::record_failure); `fail_count() <= run_count()`
/// holds as long as every failure belongs to a started case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestResult {
    run_count: usize,
    fail_count: usize,
    failures: Vec<FailureRecord>,
}

impl TestResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a case as run
    pub fn record_start(&mut self) {
        self.run_count += 1;
    }

    /// Count a case as failed
    pub fn record_failure(&mut self) {
        self.fail_count += 1;
    }

    /// Count a case as failed and keep the reason
    pub fn record_failure_with(&mut self, case: &str, failure: Failure) {
        self.record_failure();
        self.failures.push(FailureRecord {
            case: case.to_string(),
            failure,
        });
    }

    /// `"<run> run, <failed> failed"`
    pub fn summary(&self) -> String {
        format!("{} run, {} failed", self.run_count, self.fail_count)
    }

    pub fn run_count(&self) -> usize {
        self.run_count
    }

    pub fn fail_count(&self) -> usize {
        self.fail_count
    }

    pub fn passed_count(&self) -> usize {
        self.run_count.saturating_sub(self.fail_count)
    }

    /// True when no started case failed
    pub fn is_success(&self) -> bool {
        self.fail_count == 0
    }

    /// Failure details, in the order they were recorded
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Fold another result's counts and failures into this one
    pub fn merge(&mut self, other: TestResult) {
        self.run_count += other.run_count;
        self.fail_count += other.fail_count;
        self.failures.extend(other.failures);
    }

    pub(crate) fn merged(mut self, other: TestResult) -> Self {
        self.merge(other);
        self
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} run, {} failed", self.run_count, self.fail_count)
    }
}
