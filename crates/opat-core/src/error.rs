//! # Error Hierarchy
//!
//! Structured error types for the OPAT core, built with `thiserror`.
//! Every variant carries enough context to name the offending value.

use thiserror::Error;

/// Top-level error type for the OPAT core.
#[derive(Error, Debug)]
pub enum OpatError {
    /// A schema-valid value could not be converted into its typed form.
    #[error("cannot decode {kind}: {reason}")]
    Decode {
        /// The document kind that was being decoded.
        kind: String,
        /// Deserializer diagnostic.
        reason: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when constructing identifier newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier is empty.
    #[error("{kind} must not be empty")]
    Empty {
        /// Identifier type name.
        kind: &'static str,
    },

    /// The identifier contains whitespace.
    #[error("{kind} must not contain whitespace: {value:?}")]
    Whitespace {
        /// Identifier type name.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The identifier would not stay a single path segment.
    #[error("{kind} must not contain path separators or be only dots: {value:?}")]
    PathSegment {
        /// Identifier type name.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
}
