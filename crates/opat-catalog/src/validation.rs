//! # Validation Orchestrator
//!
//! Sequences the two validation stages for a conformance report:
//!
//! ```text
//! Start ──schema fails──────────────────────────────▶ Done (structural failure)
//!   │
//!   └─schema passes─▶ StructurallyValid ──no catalog──▶ Done ("Valid!")
//!                          │
//!                          └─catalog─▶ cross-validate ─▶ Done
//! ```
//!
//! The cross-validator never sees a report that failed its schema. A
//! supplied catalog is itself admitted through the catalog schema, and a
//! catalog failure is reported as `Invalid: catalog ...`.

use std::fmt;

use serde_json::Value;

use opat_core::result::INVALID_PREFIX;
use opat_core::{Catalog, DocumentKind, ValidationResult};
use opat_schema::SchemaValidator;

use crate::cross_validation::validate_against_catalog;

/// A stage of the validation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing checked yet.
    Start,
    /// The report passed its schema.
    StructurallyValid,
    /// A result has been produced.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::StructurallyValid => "structurally-valid",
            Self::Done => "done",
        })
    }
}

/// The result of a run and the stages it passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Stages in the order entered; always starts with `Start` and ends
    /// with `Done`.
    pub stages: Vec<Stage>,
    pub result: ValidationResult,
}

impl Outcome {
    /// The furthest stage reached before `Done`.
    pub fn reached(&self) -> Stage {
        self.stages
            .iter()
            .rev()
            .copied()
            .find(|stage| *stage != Stage::Done)
            .unwrap_or(Stage::Start)
    }
}

/// Runs structural then catalog validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidationOrchestrator<'a> {
    validator: &'a SchemaValidator,
}

impl<'a> ValidationOrchestrator<'a> {
    pub fn new(validator: &'a SchemaValidator) -> Self {
        Self { validator }
    }

    /// Validate `document`, and if `catalog` is given, cross-validate it.
    pub fn run(&self, document: &Value, catalog: Option<&Value>) -> ValidationResult {
        self.run_staged(document, catalog).result
    }

    /// Like [`Self::run`], also reporting how far the run progressed.
    pub fn run_staged(&self, document: &Value, catalog: Option<&Value>) -> Outcome {
        let mut stages = vec![Stage::Start];
        tracing::debug!(stage = %Stage::Start, "validating conformance report");

        let report = match self
            .validator
            .admit(DocumentKind::Conformance, document)
            .map(|d| d.into_conformance())
        {
            Ok(Some(report)) => report,
            Ok(None) => {
                return done(
                    stages,
                    ValidationResult::invalid("document is not a conformance report"),
                )
            }
            Err(result) => return done(stages, result),
        };

        stages.push(Stage::StructurallyValid);
        tracing::debug!(stage = %Stage::StructurallyValid, "conformance report passed its schema");

        let Some(raw_catalog) = catalog else {
            return done(stages, ValidationResult::valid());
        };
        let catalog = match self.admit_catalog(raw_catalog) {
            Ok(catalog) => catalog,
            Err(result) => return done(stages, result),
        };

        done(stages, validate_against_catalog(&report, &catalog))
    }

    /// Admit a raw catalog through the catalog schema and its invariants.
    ///
    /// # Errors
    ///
    /// Returns an `Invalid: catalog ...` result naming what failed.
    pub fn admit_catalog(&self, raw: &Value) -> Result<Catalog, ValidationResult> {
        let catalog = self
            .validator
            .admit(DocumentKind::Catalog, raw)
            .map_err(|result| catalog_failure(result.message()))?
            .into_catalog()
            .ok_or_else(|| catalog_failure("document is not a catalog"))?;

        let violations = catalog.invariant_violations();
        if !violations.is_empty() {
            return Err(catalog_failure(&violations.join("; ")));
        }
        Ok(catalog)
    }
}

fn done(mut stages: Vec<Stage>, result: ValidationResult) -> Outcome {
    stages.push(Stage::Done);
    tracing::debug!(stage = %Stage::Done, passed = result.passed(), "validation done");
    Outcome { stages, result }
}

fn catalog_failure(detail: &str) -> ValidationResult {
    let detail = detail.strip_prefix(INVALID_PREFIX).unwrap_or(detail);
    ValidationResult::invalid(format!("catalog {detail}"))
}
