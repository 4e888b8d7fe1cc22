//! # Catalog Cross-Validation
//!
//! Checks a structurally valid conformance report against a composed
//! catalog. Every check runs and every failure is reported:
//!
//! - each chapter key names a catalog chapter;
//! - each criterion `num` names a criterion of that chapter;
//! - an asserted criterion `level` equals the catalog's level;
//! - each component `name` names a catalog component applicable to both
//!   the criterion and the chapter;
//! - each adherence `level` names a catalog term.
//!
//! The catalog and the report are only read.

use opat_core::{Catalog, Chapter, ConformanceDocument, Criterion, CriterionReport, ValidationResult};

/// Validate every catalog-scoped reference in `document` against `catalog`.
pub fn validate_against_catalog(
    document: &ConformanceDocument,
    catalog: &Catalog,
) -> ValidationResult {
    let failures = reference_failures(document, catalog);
    if !failures.is_empty() {
        tracing::debug!(count = failures.len(), "catalog cross-validation failed");
    }
    ValidationResult::from_failures(&failures)
}

/// Every unresolved reference and mismatch in `document`.
///
/// Chapters are visited in sorted chapter-id order; criteria and components
/// within a chapter keep their report order.
pub fn reference_failures(document: &ConformanceDocument, catalog: &Catalog) -> Vec<String> {
    let mut failures = Vec::new();

    for (chapter_id, section) in &document.chapters {
        let chapter = catalog.chapter(chapter_id.as_str());
        if chapter.is_none() {
            failures.push(format!(
                "chapter '{chapter_id}' is not in the catalog (expected one of: {})",
                list(catalog.chapters.iter().map(|c| c.id.as_str()))
            ));
        }

        for entry in &section.criteria {
            let criterion = chapter.and_then(|c| c.criterion(entry.num.as_str()));
            if let Some(chapter) = chapter {
                match criterion {
                    Some(criterion) => check_level(chapter, criterion, entry, &mut failures),
                    None => failures.push(format!(
                        "criterion '{}' is not in chapter '{chapter_id}' of the catalog",
                        entry.num
                    )),
                }
            }
            check_components(catalog, chapter, criterion, entry, chapter_id.as_str(), &mut failures);
        }
    }

    failures
}

fn check_level(
    chapter: &Chapter,
    criterion: &Criterion,
    entry: &CriterionReport,
    failures: &mut Vec<String>,
) {
    let Some(found) = entry.level else {
        return;
    };
    match criterion.level {
        Some(expected) if expected == found => {}
        Some(expected) => failures.push(format!(
            "criterion '{}' in chapter '{}': expected level {expected}, found {found}",
            criterion.id, chapter.id
        )),
        None => failures.push(format!(
            "criterion '{}' in chapter '{}': expected no conformance level, found {found}",
            criterion.id, chapter.id
        )),
    }
}

fn check_components(
    catalog: &Catalog,
    chapter: Option<&Chapter>,
    criterion: Option<&Criterion>,
    entry: &CriterionReport,
    chapter_id: &str,
    failures: &mut Vec<String>,
) {
    let num = &entry.num;
    for report in &entry.components {
        let name = report.name.as_str();
        match catalog.component(name) {
            None => failures.push(format!(
                "component '{name}' (criterion '{num}', chapter '{chapter_id}') is not in the catalog (expected one of: {})",
                list(catalog.components.iter().map(|c| c.id.as_str()))
            )),
            Some(component) => {
                if let Some(criterion) = criterion {
                    if !criterion.applies_to(name) {
                        failures.push(format!(
                            "component '{name}' does not apply to criterion '{num}' in chapter '{chapter_id}' (expected one of: {})",
                            list(criterion.components.iter().map(|c| c.as_str()))
                        ));
                    }
                }
                if chapter.is_some() && !component.applies_to_chapter(chapter_id) {
                    failures.push(format!(
                        "component '{name}' is not applicable to chapter '{chapter_id}' (applicable chapters: {})",
                        list(component.applicability.iter().map(|c| c.as_str()))
                    ));
                }
            }
        }

        let level = report.adherence.level.as_str();
        if catalog.term(level).is_none() {
            failures.push(format!(
                "adherence level '{level}' for component '{name}' (criterion '{num}', chapter '{chapter_id}') is not a catalog term (expected one of: {})",
                list(catalog.terms.iter().map(|t| t.id.as_str()))
            ));
        }
    }
}

fn list<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(", ")
}
