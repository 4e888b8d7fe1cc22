//! # opat-core — Foundational Types for the OPAT Toolchain
//!
//! Defines the data model shared by every other crate in the workspace:
//! catalog entities, conformance reports, identifier newtypes and the
//! uniform [`ValidationResult`]. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `StandardId`, `ChapterId`, `CriterionId`,
//!    `ComponentId` and `TermId` are distinct types validated at
//!    construction. A criterion id cannot be looked up where a term id is
//!    expected.
//!
//! 2. **No unvalidated data in typed form.** Raw YAML/JSON values travel as
//!    [`Document::Unvalidated`]. Typed variants are produced only by
//!    [`Document::decode`], which callers invoke after a schema check.
//!
//! 3. **Exhaustive selector mapping.** [`CatalogSelector::support`] maps every
//!    selector to either a supported [`Composition`] or `Unsupported`; adding
//!    a selector forces the mapping to be extended.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `opat-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod catalog;
pub mod document;
pub mod error;
pub mod identity;
pub mod result;
pub mod selector;

pub use catalog::{Catalog, Chapter, Component, Criterion, Level, Standard, Term};
pub use document::{
    Adherence, ChapterReport, ComponentReport, ComponentsSource, ConformanceDocument, Contact,
    CriterionReport, Document, DocumentKind, Product, StandardsSource, TermsSource,
};
pub use error::{IdError, OpatError};
pub use identity::{ChapterId, ComponentId, CriterionId, LanguageTag, StandardId, TermId};
pub use result::ValidationResult;
pub use selector::{CatalogSelector, Composition, SelectorError, Support};
