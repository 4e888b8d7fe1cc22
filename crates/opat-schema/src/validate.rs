//! # Runtime Schema Validation
//!
//! Validates JSON/YAML values against JSON Schema (Draft 2020-12)
//! definitions. Schemas are registered by filename (e.g. `opat-1.0.0.json`)
//! and by their `$id`; `$ref`s between schemas resolve through a local
//! retriever over the same registry.
//!
//! ## Design
//!
//! [`SchemaValidator`] compiles every schema at construction time and keeps
//! the compiled validators, so a malformed schema surfaces as a construction
//! error rather than as a per-document failure. Validation itself never
//! errors: every outcome is a [`ValidationResult`].
//!
//! Violations are collected exhaustively (not just the first) and rendered
//! with the JSON Pointer of the offending field and the schema keyword it
//! broke.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

use opat_core::{Document, DocumentKind, ValidationResult};

use crate::bundled::BUNDLED_SCHEMAS;

/// URI prefix used by every OPAT schema `$id`.
const SCHEMA_URI_PREFIX: &str = "https://schemas.opat.dev/";

/// Diagnostic for a schema name that is not registered.
pub const SCHEMA_NOT_VALID: &str = "schema is not valid";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while building the schema registry or looking up a schema.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// A schema file could not be read or parsed.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoadError {
        /// Path or name of the schema.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A schema parsed but could not be compiled.
    #[error("failed to compile schema {schema_name}: {reason}")]
    SchemaCompileError {
        /// Schema filename.
        schema_name: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// The requested schema is not registered.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    /// I/O error while scanning the schema directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating field (empty for the document root).
    pub instance_path: String,
    /// JSON Pointer to the schema rule that failed.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// The schema keyword that failed (`required`, `enum`, `pattern`, ...).
    pub fn keyword(&self) -> &str {
        self.schema_path.rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "{path}: {}", self.message)?;
        match self.keyword() {
            "" => Ok(()),
            keyword => write!(f, " [{keyword}]"),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema retriever for $ref resolution
// ---------------------------------------------------------------------------

/// Resolves `$ref` URIs against the loaded schemas; never fetches remotely.
struct LocalSchemaRetriever {
    /// Map from URI (or bare filename) to schema JSON.
    schemas: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.schemas.get(uri_str) {
            return Ok(value.clone());
        }

        // Schemas without an `$id` get a default base; fall back on the
        // trailing filename.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        self.schemas
            .get(filename)
            .cloned()
            .ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

// ---------------------------------------------------------------------------
// SchemaValidator
// ---------------------------------------------------------------------------

/// A registry of compiled schemas.
///
/// Holds only immutable data after construction, so one instance can be
/// shared across threads validating documents in parallel.
pub struct SchemaValidator {
    /// Directory the schemas were loaded from; `None` for the bundled set.
    schema_dir: Option<PathBuf>,
    /// Parsed schema JSON by filename.
    schemas: HashMap<String, Value>,
    /// `$id` URI to filename.
    id_to_name: HashMap<String, String>,
    /// Compiled validators by filename.
    compiled: HashMap<String, Validator>,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_dir", &self.schema_dir)
            .field("schema_count", &self.schemas.len())
            .finish()
    }
}

impl SchemaValidator {
    /// Load and compile every `*.json` schema in `schema_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaLoadError`] if the directory or
    /// a schema file cannot be read or parsed, and
    /// [`SchemaValidationError::SchemaCompileError`] if a schema is invalid.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Result<Self, SchemaValidationError> {
        let schema_dir = schema_dir.into();
        let entries = std::fs::read_dir(&schema_dir).map_err(|e| {
            SchemaValidationError::SchemaLoadError {
                path: schema_dir.display().to_string(),
                reason: format!("cannot read schema directory: {e}"),
            }
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut named = Vec::with_capacity(paths.len());
        for path in &paths {
            let content = std::fs::read_to_string(path).map_err(|e| {
                SchemaValidationError::SchemaLoadError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            let value: Value = serde_json::from_str(&content).map_err(|e| {
                SchemaValidationError::SchemaLoadError {
                    path: path.display().to_string(),
                    reason: format!("invalid JSON: {e}"),
                }
            })?;
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                named.push((name.to_string(), value));
            }
        }

        Self::from_schemas(Some(schema_dir), named)
    }

    /// Build a registry from the schemas bundled into this crate.
    ///
    /// # Errors
    ///
    /// Fails only if a bundled schema is itself malformed.
    pub fn bundled() -> Result<Self, SchemaValidationError> {
        let mut named = Vec::with_capacity(BUNDLED_SCHEMAS.len());
        for (name, content) in BUNDLED_SCHEMAS {
            let value: Value = serde_json::from_str(content).map_err(|e| {
                SchemaValidationError::SchemaLoadError {
                    path: name.to_string(),
                    reason: format!("invalid JSON: {e}"),
                }
            })?;
            named.push((name.to_string(), value));
        }
        Self::from_schemas(None, named)
    }

    /// Build a registry from in-memory `(filename, schema)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaCompileError`] for the first
    /// schema (in input order) that does not compile.
    pub fn from_schemas(
        schema_dir: Option<PathBuf>,
        named: Vec<(String, Value)>,
    ) -> Result<Self, SchemaValidationError> {
        let mut schemas = HashMap::new();
        let mut id_to_name = HashMap::new();
        let mut by_uri: HashMap<String, Value> = HashMap::new();

        for (name, value) in &named {
            by_uri.insert(format!("{SCHEMA_URI_PREFIX}{name}"), value.clone());
            by_uri.insert(name.clone(), value.clone());
            if let Some(id) = value.get("$id").and_then(Value::as_str) {
                by_uri.insert(id.to_string(), value.clone());
                id_to_name.insert(id.to_string(), name.clone());
            }
        }

        let mut compiled = HashMap::new();
        for (name, value) in named {
            let retriever = LocalSchemaRetriever {
                schemas: by_uri.clone(),
            };
            let validator = jsonschema::options()
                .with_draft(jsonschema::Draft::Draft202012)
                .with_retriever(retriever)
                .build(&value)
                .map_err(|e| SchemaValidationError::SchemaCompileError {
                    schema_name: name.clone(),
                    reason: e.to_string(),
                })?;
            compiled.insert(name.clone(), validator);
            schemas.insert(name, value);
        }

        Ok(Self {
            schema_dir,
            schemas,
            id_to_name,
            compiled,
        })
    }

    /// The directory the schemas were loaded from, if any.
    pub fn schema_dir(&self) -> Option<&Path> {
        self.schema_dir.as_deref()
    }

    /// Number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Registered schema filenames, sorted.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn resolve_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.schemas.contains_key(name) {
            Some(name)
        } else {
            self.id_to_name.get(name).map(String::as_str)
        }
    }

    /// Look up a schema by filename or `$id`.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.resolve_name(name).and_then(|n| self.schemas.get(n))
    }

    /// Check `document` against the named schema and return every violation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaNotFound`] if no schema is
    /// registered under `schema_name`.
    pub fn check(
        &self,
        schema_name: &str,
        document: &Value,
    ) -> Result<Vec<Violation>, SchemaValidationError> {
        let validator = self
            .resolve_name(schema_name)
            .and_then(|n| self.compiled.get(n))
            .ok_or_else(|| SchemaValidationError::SchemaNotFound(schema_name.to_string()))?;

        Ok(validator
            .iter_errors(document)
            .map(|err| Violation {
                instance_path: err.instance_path.to_string(),
                schema_path: err.schema_path.to_string(),
                message: err.to_string(),
            })
            .collect())
    }

    /// Validate `document` against the named schema.
    ///
    /// Passing documents yield `"Valid!"`; failing ones list every violation
    /// after `"Invalid: "`. An unregistered schema name yields
    /// `"Invalid: schema is not valid"` whatever the document.
    pub fn validate(&self, document: &Value, schema_name: &str) -> ValidationResult {
        match self.check(schema_name, document) {
            Ok(violations) => {
                let rendered: Vec<String> = violations.iter().map(ToString::to_string).collect();
                ValidationResult::from_failures(&rendered)
            }
            Err(_) => ValidationResult::invalid(SCHEMA_NOT_VALID),
        }
    }

    /// Validate a raw value against the schema for `kind` and convert it to
    /// its typed [`Document`] variant.
    ///
    /// # Errors
    ///
    /// Returns the failing [`ValidationResult`] if the schema check fails or
    /// the schema-valid value does not decode.
    pub fn admit(&self, kind: DocumentKind, raw: &Value) -> Result<Document, ValidationResult> {
        let result = self.validate(raw, kind.schema_name());
        if !result.passed() {
            return Err(result);
        }
        Document::decode(kind, raw).map_err(ValidationResult::invalid)
    }
}
