//! # Validation Result
//!
//! The single outcome type every validation entry point returns. It is
//! built once and never mutated: fields are private and there are no
//! setters.

use std::fmt;

use serde::Serialize;

/// Message carried by every passing result.
pub const VALID_MESSAGE: &str = "Valid!";

/// Prefix carried by every failing result.
pub const INVALID_PREFIX: &str = "Invalid: ";

/// Separator between individual failures in an aggregated message.
const FAILURE_SEPARATOR: &str = "; ";

/// Pass/fail outcome of a validation call with its diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    passed: bool,
    message: String,
}

impl ValidationResult {
    /// A passing result with the message `"Valid!"`.
    pub fn valid() -> Self {
        Self {
            passed: true,
            message: VALID_MESSAGE.to_string(),
        }
    }

    /// A failing result with the message `"Invalid: <detail>"`.
    pub fn invalid(detail: impl fmt::Display) -> Self {
        Self {
            passed: false,
            message: format!("{INVALID_PREFIX}{detail}"),
        }
    }

    /// Aggregate a list of failures: valid if empty, otherwise one invalid
    /// result listing every failure in order.
    pub fn from_failures<S: AsRef<str>>(failures: &[S]) -> Self {
        if failures.is_empty() {
            return Self::valid();
        }
        let joined = failures
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(FAILURE_SEPARATOR);
        Self::invalid(joined)
    }

    /// Whether validation passed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
