//! Test suite - an ordered collection of cases sharing one result

use crate::case::TestCase;
use crate::executor::Executor;
use crate::result::TestResult;
use log::debug;
use rayon::prelude::*;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Cases run in insertion order into a shared [`TestResult`]
#[derive(Default)]
pub struct TestSuite {
    cases: Vec<Box<dyn TestCase>>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a case; no deduplication or validation
    pub fn add<C: TestCase + 'static>(&mut self, case: C) -> &mut Self {
        self.cases.push(Box::new(case));
        self
    }

    /// Append an already boxed case
    pub fn add_boxed(&mut self, case: Box<dyn TestCase>) -> &mut Self {
        self.cases.push(case);
        self
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// The cases, in insertion order
    pub fn cases(&self) -> &[Box<dyn TestCase>] {
        &self.cases
    }

    pub fn get(&self, index: usize) -> Option<&dyn TestCase> {
        self.cases.get(index).map(|case| &**case)
    }

    /// Keep only cases whose name contains `pattern`
    pub fn filter(mut self, pattern: &str) -> Self {
        self.cases.retain(|case| case.name().contains(pattern));
        self
    }

    /// Run every case with the default executor
    pub fn run(&mut self, result: &mut TestResult) {
        self.run_with(&Executor::default(), result);
    }

    /// Run every case with `executor`
    ///
    /// Sequential runs follow insertion order. Parallel runs give each
    /// worker its own result and merge them into `result`; counts match a
    /// sequential run but the order of failure records does not.
    ///
    /// A panic that escapes the executor (a fixture hook under
    /// [`Isolation::TestBody`](crate::Isolation::TestBody)) reaches the
    /// caller in both modes, after everything recorded so far is in
    /// `result`. In parallel mode the remaining cases still run first.
    pub fn run_with(&mut self, executor: &Executor, result: &mut TestResult) {
        if executor.is_parallel() {
            self.run_parallel(executor, result)
        } else {
            self.run_sequential(executor, result)
        }
    }

    fn run_sequential(&mut self, executor: &Executor, result: &mut TestResult) {
        debug!("running {} case(s) sequentially", self.cases.len());
        for case in &mut self.cases {
            executor.run(&mut **case, result);
        }
    }

    fn run_parallel(&mut self, executor: &Executor, result: &mut TestResult) {
        debug!("running {} case(s) in parallel", self.cases.len());
        let partial = self
            .cases
            .par_iter_mut()
            .fold(Partial::default, |mut acc, case| {
                let run = panic::catch_unwind(AssertUnwindSafe(|| {
                    executor.run(&mut **case, &mut acc.result)
                }));
                if let Err(payload) = run {
                    acc.escaped.get_or_insert(payload);
                }
                acc
            })
            .reduce(Partial::default, Partial::merged);

        result.merge(partial.result);
        if let Some(payload) = partial.escaped {
            panic::resume_unwind(payload);
        }
    }
}

/// One worker's share of a parallel run
#[derive(Default)]
struct Partial {
    result: TestResult,
    /// First panic that escaped the executor on this worker
    escaped: Option<Box<dyn Any + Send>>,
}

impl Partial {
    fn merged(self, other: Partial) -> Self {
        Self {
            result: self.result.merged(other.result),
            escaped: self.escaped.or(other.escaped),
        }
    }
}

impl fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.cases.iter().map(|case| case.name()))
            .finish()
    }
}
