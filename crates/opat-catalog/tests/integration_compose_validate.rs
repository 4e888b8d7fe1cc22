//! Integration test: compose the shipped 508 catalog from `catalog/data/`
//! and validate the conformance fixtures in `tests/fixtures/` against it.

use std::path::PathBuf;

use opat_catalog::{
    parser, write_catalog, CatalogComposer, CompositionFailure, SourceSet,
    ValidationOrchestrator,
};
use opat_core::{Catalog, Composition, LanguageTag};
use opat_schema::SchemaValidator;
use proptest::prelude::*;

/// Compute the repo root from the crate manifest directory.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/opat-catalog -> crates -> repo root
    dir.pop();
    dir.pop();
    dir
}

fn fixture(name: &str) -> PathBuf {
    repo_root().join("tests").join("fixtures").join(name)
}

fn validator() -> SchemaValidator {
    SchemaValidator::new(repo_root().join("schemas")).expect("failed to load schemas")
}

fn compose_shipped(validator: &SchemaValidator) -> Catalog {
    let sources = SourceSet::load(
        &repo_root().join("catalog").join("data"),
        Composition::Wcag20Section508,
    )
    .expect("failed to load catalog data");
    CatalogComposer::new(validator)
        .compose_set(Composition::Wcag20Section508, &sources)
        .unwrap_or_else(|e| panic!("composition failed: {e}"))
}

fn shipped_catalog_value() -> serde_json::Value {
    parser::load_document(&repo_root().join("catalog").join("2.4-edition-wcag-2.0-508.yaml"))
        .expect("failed to load shipped catalog")
}

#[test]
fn test_compose_matches_shipped_catalog() {
    let validator = validator();
    let composed = compose_shipped(&validator);
    let shipped: Catalog = serde_json::from_value(shipped_catalog_value()).unwrap();
    assert_eq!(composed, shipped);
    assert_eq!(composed.standards.len(), 2);
    assert_eq!(
        composed.title,
        "VPAT® 2.4 edition Revised Section 508 Edition"
    );
}

#[test]
fn test_compose_and_persist_is_idempotent() {
    let validator = validator();
    let dir = tempfile::tempdir().unwrap();

    let first = compose_shipped(&validator);
    let path = write_catalog(dir.path(), &first, None).unwrap();
    let first_bytes = std::fs::read(&path).unwrap();

    let second = compose_shipped(&validator);
    let again = write_catalog(dir.path(), &second, None).unwrap();
    assert_eq!(path, again);
    assert_eq!(std::fs::read(&again).unwrap(), first_bytes);
    assert_eq!(first.digest().unwrap(), second.digest().unwrap());

    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert_eq!(file_name, "2.4-edition-wcag-2.0-508.yaml");
}

#[test]
fn test_persisted_catalog_passes_catalog_schema() {
    let validator = validator();
    let dir = tempfile::tempdir().unwrap();
    let lang: LanguageTag = "en".parse().unwrap();
    let path = write_catalog(dir.path(), &compose_shipped(&validator), Some(&lang)).unwrap();
    let value = parser::load_document(&path).unwrap();
    let orchestrator = ValidationOrchestrator::new(&validator);
    assert!(orchestrator.admit_catalog(&value).is_ok());
}

#[test]
fn test_invalid_source_names_source_and_writes_nothing() {
    let validator = validator();
    let sources = SourceSet::load(&fixture("data-invalid"), Composition::Wcag20Section508).unwrap();
    let err = CatalogComposer::new(&validator)
        .compose_set(Composition::Wcag20Section508, &sources)
        .unwrap_err();
    match &err {
        CompositionFailure::SourcesInvalid { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].source_name, "wcag-2.0");
            assert!(failures[0].message.contains("title"));
        }
        other => panic!("expected SourcesInvalid, got {other:?}"),
    }
}

#[test]
fn test_sources_missing_referenced_component_fail() {
    let validator = validator();
    let mut sources = SourceSet::load(
        &repo_root().join("catalog").join("data"),
        Composition::Wcag20Section508,
    )
    .unwrap();
    sources.components.value["components"]
        .as_array_mut()
        .unwrap()
        .retain(|c| c["id"] != "authoring-tool");
    let err = CatalogComposer::new(&validator)
        .compose_set(Composition::Wcag20Section508, &sources)
        .unwrap_err();
    let CompositionFailure::InvariantViolated { violations } = &err else {
        panic!("expected InvariantViolated, got {err:?}");
    };
    assert!(!violations.is_empty());
    assert!(violations
        .iter()
        .all(|v| v.ends_with("references unknown component 'authoring-tool'")));
    assert!(violations.iter().any(|v| v.starts_with("criterion '504.2'")), "{err}");
}

#[test]
fn test_shipped_catalog_missing_component_is_rejected() {
    let validator = validator();
    let mut catalog = shipped_catalog_value();
    catalog["components"]
        .as_array_mut()
        .unwrap()
        .retain(|c| c["id"] != "authoring-tool");
    let err = ValidationOrchestrator::new(&validator)
        .admit_catalog(&catalog)
        .unwrap_err();
    assert!(err.message().starts_with("Invalid: catalog "), "{err}");
    assert!(err.message().contains("unknown component 'authoring-tool'"), "{err}");
}

#[test]
fn test_valid_fixture_passes_against_catalog() {
    let validator = validator();
    let doc = parser::load_document(&fixture("valid.yaml")).unwrap();
    let result = ValidationOrchestrator::new(&validator).run(&doc, Some(&shipped_catalog_value()));
    assert!(result.passed(), "{}", result.message());
    assert_eq!(result.message(), "Valid!");
}

#[test]
fn test_basic_fixture_fails_structurally() {
    let validator = validator();
    let doc = parser::load_document(&fixture("invalid-basic.yaml")).unwrap();
    let result = ValidationOrchestrator::new(&validator).run(&doc, Some(&shipped_catalog_value()));
    assert!(!result.passed());
    assert_eq!(result, validator.validate(&doc, "opat-1.0.0.json"));
    assert!(result.message().contains("/product"));
    assert!(result.message().contains("AAAA"));
}

#[test]
fn test_criteria_fixture_names_unknown_criterion() {
    let validator = validator();
    let doc = parser::load_document(&fixture("invalid-criteria.yaml")).unwrap();
    let orchestrator = ValidationOrchestrator::new(&validator);
    assert!(orchestrator.run(&doc, None).passed());

    let result = orchestrator.run(&doc, Some(&shipped_catalog_value()));
    assert!(!result.passed());
    assert!(result.message().contains("'1.1.9'"), "{}", result.message());
}

#[test]
fn test_components_fixture_reports_every_failure() {
    let validator = validator();
    let doc = parser::load_document(&fixture("invalid-components.yaml")).unwrap();
    let result =
        ValidationOrchestrator::new(&validator).run(&doc, Some(&shipped_catalog_value()));
    let message = result.message();
    assert!(message.contains("component 'kiosk'"), "{message}");
    assert!(message.contains("adherence level 'mostly-supports'"), "{message}");
    assert!(message.contains("does not apply to criterion '504.2'"), "{message}");
}

#[test]
fn test_level_fixture_reports_expected_and_found() {
    let validator = validator();
    let doc = parser::load_document(&fixture("invalid-level.yaml")).unwrap();
    let result =
        ValidationOrchestrator::new(&validator).run(&doc, Some(&shipped_catalog_value()));
    assert!(result.message().contains("expected level A, found AA"), "{result}");
    assert!(result.message().contains("expected no conformance level, found A"), "{result}");
}

#[test]
fn test_invalid_catalog_fixture_is_prefixed() {
    let validator = validator();
    let doc = parser::load_document(&fixture("valid.yaml")).unwrap();
    let catalog = parser::load_document(&fixture("catalog-invalid.yaml")).unwrap();
    let result = ValidationOrchestrator::new(&validator).run(&doc, Some(&catalog));
    assert!(result.message().starts_with("Invalid: catalog "), "{result}");
}

#[test]
fn test_not_yaml_fixture_is_malformed() {
    let err = parser::load_document(&fixture("not-yaml.yaml")).unwrap_err();
    assert!(matches!(err, opat_catalog::CatalogError::Malformed { .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Dropping any component the valid fixture references makes validation
    /// fail and name that component.
    #[test]
    fn prop_removed_component_is_named(idx in 0usize..4) {
        let referenced = ["web", "electronic-docs", "hardware", "authoring-tool"];
        let target = referenced[idx];
        let validator = validator();
        let doc = parser::load_document(&fixture("valid.yaml")).unwrap();
        let mut catalog = shipped_catalog_value();
        catalog["components"]
            .as_array_mut()
            .unwrap()
            .retain(|c| c["id"] != target);

        let result = ValidationOrchestrator::new(&validator).run(&doc, Some(&catalog));
        prop_assert!(!result.passed());
        let needle = format!("component '{target}'");
        prop_assert!(result.message().contains(&needle), "{}", result.message());
    }
}
