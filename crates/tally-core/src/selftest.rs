//! Self-test fixtures: the engine exercising itself
//!
//! [`WasRun`] is a case whose methods only leave a trace in its log.
//! [`TestCaseTest`] cases run `WasRun` instances through the executor and
//! [`check`] the trace and the summary line. [`self_test_suite`] assembles
//! the fixed suite the `tally` binary runs.

use crate::case::{CaseName, MethodTable, Registered};
use crate::check::check;
use crate::executor::{run_test, SET_UP, TEAR_DOWN};
use crate::result::TestResult;
use crate::suite::TestSuite;

/// A case that records which lifecycle steps ran
#[derive(Debug, Clone)]
pub struct WasRun {
    case: CaseName,
    /// Set by the test method
    pub was_run: bool,
    /// Set by `set_up`
    pub was_set_up: bool,
    /// Space-terminated trace of the steps, e.g. `"SetUp TestMethod TearDown "`
    pub log: String,
}

impl WasRun {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            case: CaseName::new(name),
            was_run: false,
            was_set_up: false,
            log: String::new(),
        }
    }

    fn set_up(&mut self) {
        self.was_run = false;
        self.was_set_up = true;
        self.log = "SetUp ".to_string();
    }

    fn test_method(&mut self) {
        self.was_run = true;
        self.log.push_str("TestMethod ");
    }

    fn test_broken_method(&mut self) {
        panic!("Broken Method");
    }

    fn tear_down(&mut self) {
        self.log.push_str("TearDown ");
    }
}

impl Registered for WasRun {
    fn case_name(&self) -> &CaseName {
        &self.case
    }

    fn register(methods: &mut MethodTable<Self>) {
        methods
            .register(SET_UP, WasRun::set_up)
            .register("test_method", WasRun::test_method)
            .register("test_broken_method", WasRun::test_broken_method)
            .register(TEAR_DOWN, WasRun::tear_down);
    }
}

/// Cases that check the engine against [`WasRun`]
#[derive(Debug, Clone)]
pub struct TestCaseTest {
    case: CaseName,
}

impl TestCaseTest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            case: CaseName::new(name),
        }
    }

    fn test_template_method(&mut self) {
        let mut test = WasRun::new("test_method");
        let mut result = TestResult::new();
        run_test(&mut test, &mut result);
        check(test.log == "SetUp TestMethod TearDown ");
    }

    fn test_result(&mut self) {
        let mut test = WasRun::new("test_method");
        let mut result = TestResult::new();
        run_test(&mut test, &mut result);
        check(result.summary() == "1 run, 0 failed");
    }

    fn test_failed_result(&mut self) {
        let mut test = WasRun::new("test_broken_method");
        let mut result = TestResult::new();
        run_test(&mut test, &mut result);
        check(result.summary() == "1 run, 1 failed");
    }

    fn test_failed_result_formatting(&mut self) {
        let mut result = TestResult::new();
        result.record_start();
        result.record_failure();
        check(result.summary() == "1 run, 1 failed");
    }

    fn test_suite(&mut self) {
        let mut suite = TestSuite::new();
        suite
            .add(WasRun::new("test_method"))
            .add(WasRun::new("test_broken_method"));
        let mut result = TestResult::new();
        suite.run(&mut result);
        check(result.summary() == "2 run, 1 failed");
    }

    fn test_tear_down_after_failure(&mut self) {
        let mut test = WasRun::new("test_broken_method");
        let mut result = TestResult::new();
        run_test(&mut test, &mut result);
        check(test.log == "SetUp TearDown ");
    }

    fn test_unresolved_method(&mut self) {
        let mut test = WasRun::new("test_no_such_method");
        let mut result = TestResult::new();
        run_test(&mut test, &mut result);
        check(result.summary() == "1 run, 1 failed");
        check(!test.was_run);
    }
}

impl Registered for TestCaseTest {
    fn case_name(&self) -> &CaseName {
        &self.case
    }

    fn register(methods: &mut MethodTable<Self>) {
        methods
            .register("test_template_method", TestCaseTest::test_template_method)
            .register("test_result", TestCaseTest::test_result)
            .register("test_failed_result", TestCaseTest::test_failed_result)
            .register(
                "test_failed_result_formatting",
                TestCaseTest::test_failed_result_formatting,
            )
            .register("test_suite", TestCaseTest::test_suite)
            .register(
                "test_tear_down_after_failure",
                TestCaseTest::test_tear_down_after_failure,
            )
            .register("test_unresolved_method", TestCaseTest::test_unresolved_method);
    }
}

/// Names of the self-test cases, in run order
pub const SELF_TESTS: &[&str] = &[
    "test_template_method",
    "test_result",
    "test_failed_result",
    "test_failed_result_formatting",
    "test_suite",
    "test_tear_down_after_failure",
    "test_unresolved_method",
];

/// The fixed suite run by the `tally` binary
pub fn self_test_suite() -> TestSuite {
    let mut suite = TestSuite::new();
    for name in SELF_TESTS {
        suite.add(TestCaseTest::new(*name));
    }
    suite
}
