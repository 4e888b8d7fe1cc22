//! # opat-catalog — Composition and Conformance Validation
//!
//! Everything between raw files and a verdict:
//!
//! - **Loading** ([`parser`]): YAML/JSON files into `serde_json::Value`,
//!   with one "not well-formed" condition for any parse failure.
//! - **Composition** ([`composition`]): schema-checked data sources merged
//!   into one [`Catalog`](opat_core::Catalog).
//! - **Cross-validation** ([`cross_validation`]): every catalog reference in
//!   a conformance report resolved against a catalog.
//! - **Orchestration** ([`validation`]): schema check, then cross-validation,
//!   short-circuiting on the first failing stage.
//! - **Persistence** ([`persist`]): deterministic file naming and atomic
//!   YAML output.
//!
//! Nothing here prompts, prints, or reads configuration; that is the CLI's
//! job.

pub mod composition;
pub mod cross_validation;
pub mod error;
pub mod parser;
pub mod persist;
pub mod validation;

pub use composition::{CatalogComposer, SourceDocument, SourceSet, DEFAULT_PRODUCT_NAME};
pub use cross_validation::validate_against_catalog;
pub use error::{CatalogError, CatalogResult, CompositionFailure, SourceFailure};
pub use persist::{catalog_file_name, write_catalog};
pub use validation::{Outcome, Stage, ValidationOrchestrator};
