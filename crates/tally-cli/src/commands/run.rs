//! Run command - execute the self-test suite and report the summary

use crate::reporter::SummaryReporter;
use anyhow::Result;
use log::info;
use tally_config::{Isolation, RunConfig};
use tally_core::selftest::self_test_suite;
use tally_core::{Executor, TestResult};

/// Arguments from the command line; `None`/`false` defer to configuration
#[derive(Debug, Default)]
pub struct RunArgs {
    /// Filter cases by name pattern
    pub filter: Option<String>,
    /// Override the isolation boundary
    pub isolation: Option<Isolation>,
    /// Force parallel execution
    pub parallel: bool,
    /// Force non-zero exit on failures
    pub strict: bool,
    /// Force colorless output
    pub no_color: bool,
}

/// What the caller should do after a run
#[derive(Debug)]
pub struct RunOutcome {
    pub result: TestResult,
    /// Process exit status to use, if not the default 0
    pub exit_code: Option<i32>,
}

/// Layer CLI flags over the loaded configuration
pub fn effective_config(args: &RunArgs, mut config: RunConfig) -> RunConfig {
    if let Some(isolation) = args.isolation {
        config.isolation = isolation;
    }
    config.parallel |= args.parallel;
    config.strict_exit |= args.strict;
    config.no_color |= args.no_color;
    config
}

/// Exit status for a finished run
pub fn exit_code(result: &TestResult, strict_exit: bool) -> Option<i32> {
    if strict_exit && !result.is_success() {
        Some(1)
    } else {
        None
    }
}

/// Run the self-test suite
pub fn run(args: RunArgs, config: RunConfig) -> Result<RunOutcome> {
    let config = effective_config(&args, config);
    info!(
        "isolation={} parallel={} strict_exit={}",
        config.isolation, config.parallel, config.strict_exit
    );

    let mut suite = self_test_suite();
    if let Some(pattern) = &args.filter {
        suite = suite.filter(pattern);
        info!("{} case(s) match '{}'", suite.len(), pattern);
    }

    let executor = Executor::from_config(&config);
    let mut result = TestResult::new();
    suite.run_with(&executor, &mut result);

    SummaryReporter::new()
        .with_no_color(config.no_color)
        .report(&result);

    Ok(RunOutcome {
        exit_code: exit_code(&result, config.strict_exit),
        result,
    })
}
