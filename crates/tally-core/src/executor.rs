//! Test executor - run one case through set_up, test method, tear_down
//!
//! Every run is counted before anything else happens. The test method is
//! always guarded: a panic or an unresolved name becomes exactly one
//! recorded failure and the caller never sees it. Whether `set_up` and
//! `tear_down` are guarded too depends on the [`Isolation`] mode.

use crate::case::{Dispatch, TestCase};
use crate::failure::{panic_message, Failure};
use crate::result::TestResult;
use log::{debug, info};
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use tally_config::{Isolation, RunConfig};

/// Method name of the optional fixture hook run before the test method
pub const SET_UP: &str = "set_up";

/// Method name of the optional fixture hook run after the test method
pub const TEAR_DOWN: &str = "tear_down";

/// Executor with configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Executor {
    /// Which lifecycle steps are guarded
    isolation: Isolation,
    /// Whether suites run their cases on a thread pool
    parallel: bool,
}

impl Executor {
    /// Create an executor with default settings (lifecycle isolation, sequential)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an executor from run configuration
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            isolation: config.isolation,
            parallel: config.parallel,
        }
    }

    /// Set the failure isolation boundary
    pub fn with_isolation(mut self, isolation: Isolation) -> Self {
        self.isolation = isolation;
        self
    }

    /// Set whether suites run in parallel
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn isolation(&self) -> Isolation {
        self.isolation
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Run a single case, recording into `result`
    ///
    /// With [`Isolation::TestBody`] a panic in `set_up` or `tear_down`
    /// propagates to the caller after the run has been counted.
    pub fn run(&self, case: &mut dyn TestCase, result: &mut TestResult) {
        result.record_start();
        let name = case.name().to_string();
        debug!("running '{}'", name);

        match self.isolation {
            Isolation::TestBody => {
                case.dispatch(SET_UP);
            }
            Isolation::Lifecycle => {
                if let Err(message) = guarded(|| case.dispatch(SET_UP)) {
                    fail(result, &name, Failure::SetUp { message });
                    return;
                }
            }
        }

        let body_failed = match guarded(|| case.dispatch(&name)) {
            Ok(Dispatch::Invoked) => false,
            Ok(Dispatch::Unresolved) => {
                fail(result, &name, Failure::Unresolved { method: name.clone() });
                true
            }
            Err(message) => {
                fail(
                    result,
                    &name,
                    Failure::Panicked {
                        method: name.clone(),
                        message,
                    },
                );
                true
            }
        };

        match self.isolation {
            Isolation::TestBody => {
                case.dispatch(TEAR_DOWN);
            }
            Isolation::Lifecycle => {
                if let Err(message) = guarded(|| case.dispatch(TEAR_DOWN)) {
                    if body_failed {
                        // Already counted; one failure per case.
                        info!("'{}': tear_down also panicked: {}", name, message);
                    } else {
                        fail(result, &name, Failure::TearDown { message });
                    }
                }
            }
        }

        debug!("finished '{}'", name);
    }
}

/// Run `case` with the default executor
pub fn run_test(case: &mut dyn TestCase, result: &mut TestResult) {
    Executor::default().run(case, result);
}

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is inside a step the executor will recover
///
/// A panic hook can use this to stay quiet about panics that end up as
/// recorded failures while still reporting every other panic.
pub fn is_guarded() -> bool {
    GUARDED.with(Cell::get)
}

fn guarded<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    // Nested runs (a test that runs another case) restore the outer state.
    let outer = GUARDED.with(|flag| flag.replace(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    GUARDED.with(|flag| flag.set(outer));
    outcome.map_err(panic_message)
}

fn fail(result: &mut TestResult, name: &str, failure: Failure) {
    info!("'{}' failed: {}", name, failure);
    result.record_failure_with(name, failure);
}
