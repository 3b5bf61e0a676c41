//! Run settings (`[run]` table of tally.toml)

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which parts of a test case's lifecycle are guarded against panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Isolation {
    /// Only the test method is guarded. A panicking `set_up` or `tear_down`
    /// unwinds out of the executor.
    TestBody,
    /// `set_up`, the test method, and `tear_down` are all guarded; a case
    /// still records at most one failure.
    #[default]
    Lifecycle,
}

impl Isolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Isolation::TestBody => "test-body",
            Isolation::Lifecycle => "lifecycle",
        }
    }
}

impl fmt::Display for Isolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Isolation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "test-body" | "test_body" | "body" => Ok(Isolation::TestBody),
            "lifecycle" | "all" => Ok(Isolation::Lifecycle),
            other => Err(ConfigError::InvalidValue {
                field: "run.isolation".to_string(),
                reason: format!("expected 'test-body' or 'lifecycle', got '{}'", other),
            }),
        }
    }
}

/// Settings for one suite run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Failure isolation boundary
    pub isolation: Isolation,

    /// Run cases on a thread pool instead of in insertion order
    pub parallel: bool,

    /// Exit with a non-zero status when any case failed
    pub strict_exit: bool,

    /// Disable colored summary output
    pub no_color: bool,
}

impl RunConfig {
    /// Apply overrides from the process environment
    ///
    /// - `TALLY_ISOLATION=test-body|lifecycle`
    /// - `TALLY_PARALLEL=1`
    /// - `TALLY_STRICT=1`
    /// - `TALLY_NO_COLOR` or `NO_COLOR` (any non-empty value disables color)
    pub fn apply_env(self) -> ConfigResult<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` as the variable source
    pub fn apply_env_from<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(isolation) = lookup("TALLY_ISOLATION") {
            self.isolation = isolation.parse()?;
        }
        if let Some(parallel) = lookup("TALLY_PARALLEL") {
            self.parallel = parse_flag(&parallel);
        }
        if let Some(strict) = lookup("TALLY_STRICT") {
            self.strict_exit = parse_flag(&strict);
        }
        let set = |key: &str| lookup(key).is_some_and(|value| !value.is_empty());
        if set("TALLY_NO_COLOR") || set("NO_COLOR") {
            self.no_color = true;
        }
        Ok(self)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
