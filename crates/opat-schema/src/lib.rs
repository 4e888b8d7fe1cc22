//! # opat-schema — Structural Validation
//!
//! Validates OPAT documents (conformance reports, catalogs and catalog data
//! sources) against the JSON Schema (Draft 2020-12) definitions in
//! `schemas/`.
//!
//! ## Responsibilities
//!
//! - **Registry:** load every schema from a directory, or use the copy
//!   bundled into the crate, and compile each one up front. A schema that
//!   does not parse or compile is reported at construction time.
//! - **Validation:** [`SchemaValidator::validate`] returns a
//!   [`ValidationResult`](opat_core::ValidationResult) aggregating every
//!   violation; an unknown schema name yields `"Invalid: schema is not valid"`.
//! - **Admission:** [`SchemaValidator::admit`] turns a raw value into a typed
//!   [`Document`](opat_core::Document) only after its schema passes.
//!
//! ## Crate Policy
//!
//! - Depends only on `opat-core` internally.
//! - Never touches the network: cross-schema `$ref`s resolve against the
//!   loaded registry.

pub mod bundled;
pub mod validate;

pub use bundled::BUNDLED_SCHEMAS;
pub use validate::{SchemaValidationError, SchemaValidator, Violation, SCHEMA_NOT_VALID};
