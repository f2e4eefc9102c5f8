//! The value every action hands back to the interpreter.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::{FieldValue, ModuleId};

/// Pass/fail outcome of an action. Fail is normal control flow that drives
/// branching, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Pass,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "Pass"),
            Outcome::Fail => write!(f, "Fail"),
        }
    }
}

/// Result of one action invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub outcome: Outcome,
    pub message: String,
    /// Underlying cause for failures that wrap an error.
    pub cause: Option<String>,
    /// Fields a database query populated, null columns included.
    pub returned_fields: HashMap<ModuleId, Option<FieldValue>>,
}

impl ActionResult {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Pass,
            message: message.into(),
            cause: None,
            returned_fields: HashMap::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail,
            message: message.into(),
            cause: None,
            returned_fields: HashMap::new(),
        }
    }

    pub fn fail_with_cause(message: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            outcome: Outcome::Fail,
            message: message.into(),
            cause: Some(cause.to_string()),
            returned_fields: HashMap::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    pub fn failed(&self) -> bool {
        self.outcome == Outcome::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_result_has_no_cause() {
        let result = ActionResult::pass("done");
        assert!(result.passed());
        assert_eq!(result.message, "done");
        assert!(result.cause.is_none());
        assert!(result.returned_fields.is_empty());
    }

    #[test]
    fn fail_with_cause_records_source() {
        let result = ActionResult::fail_with_cause("query failed", "connection refused");
        assert!(result.failed());
        assert_eq!(result.cause.as_deref(), Some("connection refused"));
    }
}
