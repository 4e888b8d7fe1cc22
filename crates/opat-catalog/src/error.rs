//! Catalog-specific error types.
//!
//! Loader errors carry the path that failed. Composition failures carry the
//! name of every source that broke the composition, so no failure is
//! reported without saying where it came from.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading sources or persisting a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A file exists but is not well-formed YAML or JSON.
    #[error("file is not well-formed at {path}: {detail}")]
    Malformed { path: PathBuf, detail: String },

    /// The composed catalog could not be moved into place.
    #[error("failed to persist catalog to {path}: {reason}")]
    Persist { path: PathBuf, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A catalog could not be rendered as YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// A source document that failed its schema, with the validator's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Source label (`wcag-2.0`, `508`, `components`, `terms`, or a path).
    pub source_name: String,
    /// The validator's `Invalid: ...` message.
    pub message: String,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source '{}': {}", self.source_name, self.message)
    }
}

/// Why a composition produced no catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionFailure {
    /// One or more sources failed their schema.
    #[error("{}", join(failures))]
    SourcesInvalid { failures: Vec<SourceFailure> },

    /// The composition was handed the wrong number of standards sources.
    #[error("expected {expected} standards sources, found {found}")]
    SourceCount { expected: usize, found: usize },

    /// The merged catalog breaks a catalog invariant.
    #[error("{}", violations.join("; "))]
    InvariantViolated { violations: Vec<String> },
}

fn join(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
