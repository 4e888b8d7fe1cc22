//! # Catalog Composition
//!
//! Merges independently authored data sources into one catalog:
//!
//! ```text
//! Catalog
//! ├── title:      "<product> 2.4 edition <primary source title>"
//! ├── standards:  source[0].standard ++ source[1].standard
//! ├── chapters:   source[0].chapters ++ source[1].chapters
//! ├── components: components source, verbatim
//! └── terms:      terms source, verbatim
//! ```
//!
//! Every source is admitted through its schema first. Any failing source
//! fails the whole composition and no partial catalog is returned. Each
//! standards source must contribute exactly one standard, so the catalog
//! carries one standard per standards file. After merging, chapter ids must
//! be unique across sources and the catalog must satisfy
//! [`Catalog::invariant_violations`].

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use opat_core::{
    Catalog, ComponentsSource, Composition, DocumentKind, StandardsSource, TermsSource,
};
use opat_schema::SchemaValidator;

use crate::error::{CatalogResult, CompositionFailure, SourceFailure};
use crate::parser;

/// Product name prefixed to every catalog title.
pub const DEFAULT_PRODUCT_NAME: &str = "VPAT®";

/// A raw source document with the label used in diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// Source label, e.g. `wcag-2.0` or a file path.
    pub label: String,
    /// Parsed, not yet schema-checked content.
    pub value: Value,
}

impl SourceDocument {
    pub fn new(label: impl Into<String>, value: Value) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Load a source from disk, labelled by its file stem.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let value = parser::load_document(path)?;
        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { label, value })
    }
}

/// The full set of raw sources for one composition.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSet {
    /// Standards sources, in composition order.
    pub standards: Vec<SourceDocument>,
    pub components: SourceDocument,
    pub terms: SourceDocument,
}

impl SourceSet {
    /// Load the data files a composition names from `data_dir`.
    ///
    /// # Errors
    ///
    /// Fails on the first data file that is missing or not well-formed.
    pub fn load(data_dir: &Path, composition: Composition) -> CatalogResult<Self> {
        let standards = composition
            .standards_files()
            .iter()
            .map(|file| SourceDocument::load(&data_dir.join(file)))
            .collect::<CatalogResult<Vec<_>>>()?;
        Ok(Self {
            standards,
            components: SourceDocument::load(&data_dir.join(composition.components_file()))?,
            terms: SourceDocument::load(&data_dir.join(composition.terms_file()))?,
        })
    }
}

/// Composes catalogs from schema-checked sources.
#[derive(Debug)]
pub struct CatalogComposer<'a> {
    validator: &'a SchemaValidator,
    product_name: String,
}

impl<'a> CatalogComposer<'a> {
    pub fn new(validator: &'a SchemaValidator) -> Self {
        Self {
            validator,
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
        }
    }

    /// Override the product name used in the catalog title.
    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = product_name.into();
        self
    }

    /// Compose a catalog from a loaded [`SourceSet`].
    pub fn compose_set(
        &self,
        composition: Composition,
        sources: &SourceSet,
    ) -> Result<Catalog, CompositionFailure> {
        self.compose(
            composition,
            &sources.standards,
            &sources.components,
            &sources.terms,
        )
    }

    /// Compose a catalog.
    ///
    /// # Errors
    ///
    /// - [`CompositionFailure::SourceCount`] if `standards` does not match
    ///   the composition's standards files.
    /// - [`CompositionFailure::SourcesInvalid`] naming every source that
    ///   failed its schema.
    /// - [`CompositionFailure::InvariantViolated`] for a standards source
    ///   contributing other than one standard, duplicate ids, or references
    ///   to components or chapters the catalog does not define.
    pub fn compose(
        &self,
        composition: Composition,
        standards: &[SourceDocument],
        components: &SourceDocument,
        terms: &SourceDocument,
    ) -> Result<Catalog, CompositionFailure> {
        let expected = composition.standards_files().len();
        if standards.len() != expected {
            return Err(CompositionFailure::SourceCount {
                expected,
                found: standards.len(),
            });
        }

        let mut failures = Vec::new();
        let admitted_standards: Vec<Option<StandardsSource>> = standards
            .iter()
            .map(|s| {
                self.admit(DocumentKind::StandardsSource, s, &mut failures)
                    .and_then(|d| d.into_standards())
            })
            .collect();
        let admitted_components: Option<ComponentsSource> = self
            .admit(DocumentKind::ComponentsSource, components, &mut failures)
            .and_then(|d| d.into_components());
        let admitted_terms: Option<TermsSource> = self
            .admit(DocumentKind::TermsSource, terms, &mut failures)
            .and_then(|d| d.into_terms());

        if !failures.is_empty() {
            return Err(CompositionFailure::SourcesInvalid { failures });
        }
        let (Some(components), Some(terms)) = (admitted_components, admitted_terms) else {
            return Err(CompositionFailure::SourcesInvalid { failures });
        };
        let standards_sources: Vec<StandardsSource> =
            admitted_standards.into_iter().flatten().collect();

        let mut violations = standard_counts(standards, &standards_sources);
        violations.extend(chapter_collisions(standards, &standards_sources));
        if !violations.is_empty() {
            return Err(CompositionFailure::InvariantViolated { violations });
        }

        let primary = &standards_sources[composition.primary_index()];
        let title = format!("{} 2.4 edition {}", self.product_name, primary.title);
        tracing::debug!(%title, primary = %standards[composition.primary_index()].label, "composing catalog");

        let mut catalog = Catalog {
            title,
            standards: Vec::new(),
            chapters: Vec::new(),
            components: components.components,
            terms: terms.terms,
        };
        for source in standards_sources {
            tracing::debug!(
                standards = source.standard.len(),
                chapters = source.chapters.len(),
                "merging standards source"
            );
            catalog.standards.extend(source.standard);
            catalog.chapters.extend(source.chapters);
        }

        let mut violations = Vec::new();
        if catalog.standards.len() != expected {
            violations.push(format!(
                "expected {expected} standards, found {}",
                catalog.standards.len()
            ));
        }
        violations.extend(catalog.invariant_violations());
        if !violations.is_empty() {
            return Err(CompositionFailure::InvariantViolated { violations });
        }

        tracing::debug!(
            standards = catalog.standards.len(),
            chapters = catalog.chapters.len(),
            components = catalog.components.len(),
            terms = catalog.terms.len(),
            "catalog composed"
        );
        Ok(catalog)
    }

    fn admit(
        &self,
        kind: DocumentKind,
        source: &SourceDocument,
        failures: &mut Vec<SourceFailure>,
    ) -> Option<opat_core::Document> {
        match self.validator.admit(kind, &source.value) {
            Ok(doc) => Some(doc),
            Err(result) => {
                tracing::debug!(source = %source.label, %kind, "source rejected");
                failures.push(SourceFailure {
                    source_name: source.label.clone(),
                    message: result.message().to_string(),
                });
                None
            }
        }
    }
}

/// Standards sources that do not contribute exactly one standard.
fn standard_counts(labels: &[SourceDocument], sources: &[StandardsSource]) -> Vec<String> {
    labels
        .iter()
        .zip(sources)
        .filter(|(_, source)| source.standard.len() != 1)
        .map(|(label, source)| {
            format!(
                "source '{}' contributes {} standards, expected 1",
                label.label,
                source.standard.len()
            )
        })
        .collect()
}

/// Chapter ids contributed by more than one standards source.
fn chapter_collisions(labels: &[SourceDocument], sources: &[StandardsSource]) -> Vec<String> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    let mut collisions = Vec::new();
    for (label, source) in labels.iter().zip(sources) {
        for chapter in &source.chapters {
            match seen.get(chapter.id.as_str()) {
                Some(first) if *first != label.label.as_str() => collisions.push(format!(
                    "duplicate chapter id '{}' in sources '{}' and '{}'",
                    chapter.id, first, label.label
                )),
                Some(_) => {}
                None => {
                    seen.insert(chapter.id.as_str(), label.label.as_str());
                }
            }
        }
    }
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> SchemaValidator {
        SchemaValidator::bundled().unwrap()
    }

    fn wcag() -> SourceDocument {
        SourceDocument::new(
            "wcag-2.0",
            json!({
                "title": "WCAG 2.0",
                "standard": [{ "id": "wcag-2.0", "name": "WCAG", "version": "2.0" }],
                "chapters": [{
                    "id": "success_criteria_level_a",
                    "title": "Table 1: Success Criteria, Level A",
                    "criteria": [
                        { "id": "1.1.1", "level": "A", "description": "Non-text Content" }
                    ]
                }]
            }),
        )
    }

    fn section508() -> SourceDocument {
        SourceDocument::new(
            "508",
            json!({
                "title": "Revised Section 508 Edition",
                "standard": [{ "id": "508", "name": "Revised Section 508", "version": "2017" }],
                "chapters": [{
                    "id": "functional_performance_criteria",
                    "title": "Chapter 3: Functional Performance Criteria",
                    "criteria": [{ "id": "302.1", "description": "Without Vision" }]
                }]
            }),
        )
    }

    fn components() -> SourceDocument {
        SourceDocument::new(
            "components",
            json!({ "components": [{ "id": "web", "name": "Web" }] }),
        )
    }

    fn terms() -> SourceDocument {
        SourceDocument::new(
            "terms",
            json!({ "terms": [{ "id": "supports", "definition": "Fully meets the criterion." }] }),
        )
    }

    fn compose(standards: &[SourceDocument]) -> Result<Catalog, CompositionFailure> {
        let v = validator();
        CatalogComposer::new(&v).compose(
            Composition::Wcag20Section508,
            standards,
            &components(),
            &terms(),
        )
    }

    #[test]
    fn composes_in_supplied_order_with_primary_title() {
        let catalog = compose(&[wcag(), section508()]).unwrap();
        assert_eq!(catalog.title, "VPAT® 2.4 edition Revised Section 508 Edition");
        assert_eq!(catalog.standard_ids(), vec!["wcag-2.0", "508"]);
        assert_eq!(catalog.chapters.len(), 2);
        assert_eq!(catalog.chapters[0].id.as_str(), "success_criteria_level_a");
        assert_eq!(catalog.components.len(), 1);
        assert_eq!(catalog.terms.len(), 1);
        assert!(catalog.invariant_violations().is_empty());
    }

    #[test]
    fn product_name_is_configurable() {
        let v = validator();
        let catalog = CatalogComposer::new(&v)
            .with_product_name("OPAT")
            .compose(
                Composition::Wcag20Section508,
                &[wcag(), section508()],
                &components(),
                &terms(),
            )
            .unwrap();
        assert_eq!(catalog.title, "OPAT 2.4 edition Revised Section 508 Edition");
    }

    #[test]
    fn wrong_source_count_is_rejected() {
        let err = compose(&[wcag()]).unwrap_err();
        assert_eq!(
            err,
            CompositionFailure::SourceCount {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn every_invalid_source_is_named() {
        let mut broken = section508();
        broken.value["standard"] = json!([]);
        let v = validator();
        let err = CatalogComposer::new(&v)
            .compose(
                Composition::Wcag20Section508,
                &[wcag(), broken],
                &components(),
                &SourceDocument::new("terms", json!({ "terms": "none" })),
            )
            .unwrap_err();
        let CompositionFailure::SourcesInvalid { failures } = &err else {
            panic!("expected SourcesInvalid, got {err:?}");
        };
        let names: Vec<&str> = failures.iter().map(|f| f.source_name.as_str()).collect();
        assert_eq!(names, vec!["508", "terms"]);
        assert!(failures.iter().all(|f| f.message.starts_with("Invalid: ")));
    }

    #[test]
    fn chapter_shared_between_sources_is_fatal() {
        let mut clash = section508();
        clash.value["chapters"][0]["id"] = json!("success_criteria_level_a");
        let err = compose(&[wcag(), clash]).unwrap_err();
        assert_eq!(
            err,
            CompositionFailure::InvariantViolated {
                violations: vec![
                    "duplicate chapter id 'success_criteria_level_a' in sources 'wcag-2.0' and '508'"
                        .to_string()
                ]
            }
        );
    }

    #[test]
    fn duplicate_criterion_within_chapter_is_fatal() {
        let mut dup = wcag();
        dup.value["chapters"][0]["criteria"] = json!([
            { "id": "1.1.1", "level": "A", "description": "Non-text Content" },
            { "id": "1.1.1", "level": "A", "description": "Again" }
        ]);
        let err = compose(&[dup, section508()]).unwrap_err();
        assert!(err.to_string().contains("duplicate criterion id '1.1.1'"), "{err}");
    }

    #[test]
    fn source_with_extra_standard_is_fatal() {
        let mut extra = section508();
        extra.value["standard"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "id": "extra", "name": "Extra", "version": "1" }));
        let err = compose(&[wcag(), extra]).unwrap_err();
        assert_eq!(
            err,
            CompositionFailure::InvariantViolated {
                violations: vec!["source '508' contributes 2 standards, expected 1".to_string()]
            }
        );
    }

    #[test]
    fn same_standard_from_both_sources_is_fatal() {
        let mut again = section508();
        again.value["standard"] = json!([{ "id": "wcag-2.0", "name": "WCAG", "version": "2.0" }]);
        let err = compose(&[wcag(), again]).unwrap_err();
        assert_eq!(
            err,
            CompositionFailure::InvariantViolated {
                violations: vec!["duplicate standard id 'wcag-2.0'".to_string()]
            }
        );
    }

    #[test]
    fn criterion_naming_undefined_component_is_fatal() {
        let mut dangling = section508();
        dangling.value["chapters"][0]["criteria"][0]["components"] = json!(["authoring-tool"]);
        let err = compose(&[wcag(), dangling]).unwrap_err();
        assert_eq!(
            err,
            CompositionFailure::InvariantViolated {
                violations: vec![
                    "criterion '302.1' in chapter 'functional_performance_criteria' references unknown component 'authoring-tool'"
                        .to_string()
                ]
            }
        );
    }

    #[test]
    fn component_applicable_to_undefined_chapter_is_fatal() {
        let v = validator();
        let components = SourceDocument::new(
            "components",
            json!({ "components": [
                { "id": "web", "name": "Web", "applicability": ["hardware"] }
            ] }),
        );
        let err = CatalogComposer::new(&v)
            .compose(
                Composition::Wcag20Section508,
                &[wcag(), section508()],
                &components,
                &terms(),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "component 'web' references unknown chapter 'hardware'"
        );
    }

    #[test]
    fn composition_is_deterministic() {
        let a = compose(&[wcag(), section508()]).unwrap();
        let b = compose(&[wcag(), section508()]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    }

    #[test]
    fn source_set_loads_named_files() {
        let dir = tempfile::tempdir().unwrap();
        for (name, doc) in [
            ("wcag-2.0.yaml", wcag()),
            ("508.yaml", section508()),
            ("components.yaml", components()),
            ("terms.yaml", terms()),
        ] {
            std::fs::write(dir.path().join(name), serde_yaml::to_string(&doc.value).unwrap())
                .unwrap();
        }
        let set = SourceSet::load(dir.path(), Composition::Wcag20Section508).unwrap();
        assert_eq!(set.standards[0].label, "wcag-2.0");
        assert_eq!(set.standards[1].label, "508");
        let v = validator();
        let catalog = CatalogComposer::new(&v)
            .compose_set(Composition::Wcag20Section508, &set)
            .unwrap();
        assert_eq!(catalog.standard_ids(), vec!["wcag-2.0", "508"]);
    }

    #[test]
    fn source_set_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceSet::load(dir.path(), Composition::Wcag20Section508).unwrap_err();
        assert!(matches!(err, crate::CatalogError::FileNotFound { .. }));
    }
}
