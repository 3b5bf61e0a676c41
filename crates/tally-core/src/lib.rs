//! Tally - a minimal xUnit-style test engine
//!
//! A [`TestCase`] carries the name of its test method. The [`Executor`]
//! resolves that name at run time through the case's [`MethodTable`],
//! brackets the call with the optional `set_up` / `tear_down` hooks,
//! catches panics, and records the outcome into a [`TestResult`].
//! A [`TestSuite`] runs its cases in insertion order into one shared result.
//!
//! ```
//! use tally_core::selftest::WasRun;
//! use tally_core::{TestResult, TestSuite};
//!
//! let mut suite = TestSuite::new();
//! suite.add(WasRun::new("test_method"));
//! suite.add(WasRun::new("test_broken_method"));
//!
//! let mut result = TestResult::new();
//! suite.run(&mut result);
//! assert_eq!(result.summary(), "2 run, 1 failed");
//! ```

pub mod case;
pub mod check;
pub mod executor;
pub mod failure;
pub mod result;
pub mod selftest;
pub mod suite;

pub use case::{CaseName, Dispatch, Method, MethodTable, Registered, TestCase};
pub use check::check;
pub use executor::{is_guarded, run_test, Executor, SET_UP, TEAR_DOWN};
pub use failure::Failure;
pub use result::{FailureRecord, TestResult};
pub use suite::TestSuite;
pub use tally_config::{Isolation, RunConfig};
