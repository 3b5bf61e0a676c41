//! Failure kinds recorded by the executor

use std::any::Any;
use thiserror::Error;

/// Why a test case was counted as failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The test method panicked
    #[error("'{method}' panicked: {message}")]
    Panicked { method: String, message: String },

    /// The case's name does not resolve to a registered method
    #[error("no test method named '{method}'")]
    Unresolved { method: String },

    /// `set_up` panicked; the test method and `tear_down` were skipped
    #[error("set_up panicked: {message}")]
    SetUp { message: String },

    /// `tear_down` panicked after a passing test method
    #[error("tear_down panicked: {message}")]
    TearDown { message: String },
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "test panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[test]
    fn test_panic_message_str() {
        let payload = panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload), "boom");
    }

    #[test]
    fn test_panic_message_formatted() {
        let payload = panic::catch_unwind(|| panic!("bad value {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload), "bad value 7");
    }

    #[test]
    fn test_panic_message_opaque_payload() {
        let payload = panic::catch_unwind(|| panic::panic_any(42_u32)).unwrap_err();
        assert_eq!(panic_message(payload), "test panicked");
    }

    #[test]
    fn test_display() {
        let failure = Failure::Unresolved {
            method: "test_missing".to_string(),
        };
        assert_eq!(failure.to_string(), "no test method named 'test_missing'");
    }
}
