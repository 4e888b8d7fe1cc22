//! # Documents
//!
//! Conformance reports, catalog data sources, and the [`Document`] tagged
//! union that separates raw input from schema-checked, typed values.
//!
//! Raw YAML/JSON always enters as [`Document::Unvalidated`]. The only way to
//! obtain a typed variant is [`Document::decode`], which the schema crate
//! calls once the value has passed the schema registered for its
//! [`DocumentKind`].

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{Catalog, Chapter, Component, Level, Standard, Term};
use crate::error::OpatError;
use crate::identity::{ChapterId, ComponentId, CriterionId, TermId};

// ---------------------------------------------------------------------------
// Conformance report
// ---------------------------------------------------------------------------

/// The product a report describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product name.
    pub name: String,
    /// Product version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Product description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Contact details for a report's author or vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// How well a component adheres to a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adherence {
    /// Adherence level; must name a catalog term.
    pub level: TermId,
    /// Explanation of the adherence level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A component's entry under a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentReport {
    /// Component id; must name a catalog component.
    pub name: ComponentId,
    /// Adherence statement.
    pub adherence: Adherence,
}

/// A criterion entry in a report chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionReport {
    /// Criterion id within the enclosing chapter.
    pub num: CriterionId,
    /// Conformance level the report claims for the criterion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Per-component adherence.
    #[serde(default)]
    pub components: Vec<ComponentReport>,
}

/// One chapter of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub criteria: Vec<CriterionReport>,
}

/// A product's accessibility conformance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceDocument {
    /// Report title.
    pub title: String,
    /// Product under evaluation.
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_methods_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_disclaimer: Option<String>,
    /// Name of the catalog the report was written against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Chapters keyed by catalog chapter id.
    pub chapters: BTreeMap<ChapterId, ChapterReport>,
}

// ---------------------------------------------------------------------------
// Catalog data sources
// ---------------------------------------------------------------------------

/// A standards data file: one standard's metadata and its chapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardsSource {
    /// Source title (e.g. "Revised Section 508 Edition").
    pub title: String,
    /// Standards contributed by this source.
    pub standard: Vec<Standard>,
    /// Chapters contributed by this source.
    pub chapters: Vec<Chapter>,
}

/// The components data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentsSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub components: Vec<Component>,
}

/// The terms data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub terms: Vec<Term>,
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// The kinds of document the toolchain understands, each bound to one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// A conformance report.
    Conformance,
    /// A composed catalog.
    Catalog,
    /// A standards data source (standard metadata + chapters).
    StandardsSource,
    /// The components data source.
    ComponentsSource,
    /// The terms data source.
    TermsSource,
}

impl DocumentKind {
    /// Every kind, in registry order.
    pub const ALL: [DocumentKind; 5] = [
        Self::Conformance,
        Self::Catalog,
        Self::StandardsSource,
        Self::ComponentsSource,
        Self::TermsSource,
    ];

    /// Filename of the schema that gates this kind.
    pub fn schema_name(&self) -> &'static str {
        match self {
            Self::Conformance => "opat-1.0.0.json",
            Self::Catalog => "opat-catalog-1.0.0.json",
            Self::StandardsSource => "opat-catalog-standards-1.0.0.json",
            Self::ComponentsSource => "opat-catalog-components-1.0.0.json",
            Self::TermsSource => "opat-catalog-terms-1.0.0.json",
        }
    }

    /// Short human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conformance => "conformance report",
            Self::Catalog => "catalog",
            Self::StandardsSource => "standards source",
            Self::ComponentsSource => "components source",
            Self::TermsSource => "terms source",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document at some stage of admission.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Raw input that has not passed any schema.
    Unvalidated(Value),
    /// A standards source: carries both standard and chapter entities.
    Standards(StandardsSource),
    /// A components source.
    Components(ComponentsSource),
    /// A terms source.
    Terms(TermsSource),
    /// A composed catalog.
    Catalog(Catalog),
    /// A conformance report.
    Conformance(ConformanceDocument),
}

impl Document {
    /// Convert a schema-valid value into its typed variant.
    ///
    /// Callers must run the schema for `kind` first; this step only performs
    /// typed deserialization (including identifier validation).
    ///
    /// # Errors
    ///
    /// Returns [`OpatError::Decode`] if the value does not deserialize.
    pub fn decode(kind: DocumentKind, raw: &Value) -> Result<Self, OpatError> {
        Ok(match kind {
            DocumentKind::Conformance => Self::Conformance(decode_as(kind, raw)?),
            DocumentKind::Catalog => Self::Catalog(decode_as(kind, raw)?),
            DocumentKind::StandardsSource => Self::Standards(decode_as(kind, raw)?),
            DocumentKind::ComponentsSource => Self::Components(decode_as(kind, raw)?),
            DocumentKind::TermsSource => Self::Terms(decode_as(kind, raw)?),
        })
    }

    /// The kind of a typed document; `None` while unvalidated.
    pub fn kind(&self) -> Option<DocumentKind> {
        match self {
            Self::Unvalidated(_) => None,
            Self::Standards(_) => Some(DocumentKind::StandardsSource),
            Self::Components(_) => Some(DocumentKind::ComponentsSource),
            Self::Terms(_) => Some(DocumentKind::TermsSource),
            Self::Catalog(_) => Some(DocumentKind::Catalog),
            Self::Conformance(_) => Some(DocumentKind::Conformance),
        }
    }

    pub fn into_standards(self) -> Option<StandardsSource> {
        match self {
            Self::Standards(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_components(self) -> Option<ComponentsSource> {
        match self {
            Self::Components(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_terms(self) -> Option<TermsSource> {
        match self {
            Self::Terms(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_catalog(self) -> Option<Catalog> {
        match self {
            Self::Catalog(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_conformance(self) -> Option<ConformanceDocument> {
        match self {
            Self::Conformance(d) => Some(d),
            _ => None,
        }
    }
}

fn decode_as<T: DeserializeOwned>(kind: DocumentKind, raw: &Value) -> Result<T, OpatError> {
    T::deserialize(raw).map_err(|e| OpatError::Decode {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> Value {
        json!({
            "title": "Example Product Accessibility Conformance Report",
            "product": { "name": "Example", "version": "1.0" },
            "chapters": {
                "success_criteria_level_a": {
                    "criteria": [
                        {
                            "num": "1.1.1",
                            "level": "A",
                            "components": [
                                { "name": "web", "adherence": { "level": "supports" } }
                            ]
                        }
                    ]
                }
            }
        })
    }

    #[test]
    fn decode_conformance() {
        let doc = Document::decode(DocumentKind::Conformance, &report()).unwrap();
        assert_eq!(doc.kind(), Some(DocumentKind::Conformance));
        let report = doc.into_conformance().unwrap();
        let chapter = &report.chapters[&ChapterId::new("success_criteria_level_a").unwrap()];
        assert_eq!(chapter.criteria[0].num.as_str(), "1.1.1");
        assert_eq!(chapter.criteria[0].level, Some(Level::A));
        assert_eq!(
            chapter.criteria[0].components[0].adherence.level.as_str(),
            "supports"
        );
    }

    #[test]
    fn decode_rejects_whitespace_identifier() {
        let mut raw = report();
        raw["chapters"]["success_criteria_level_a"]["criteria"][0]["num"] = json!("1.1 .1");
        let err = Document::decode(DocumentKind::Conformance, &raw).unwrap_err();
        match err {
            OpatError::Decode { kind, reason } => {
                assert_eq!(kind, "conformance report");
                assert!(reason.contains("whitespace"), "{reason}");
            }
            other => panic!("expected Decode, got {other}"),
        }
    }

    #[test]
    fn decode_sources() {
        let terms = json!({ "terms": [ { "id": "supports", "definition": "Meets it." } ] });
        let doc = Document::decode(DocumentKind::TermsSource, &terms).unwrap();
        assert_eq!(doc.into_terms().unwrap().terms.len(), 1);

        let components = json!({ "components": [ { "id": "web", "name": "Web" } ] });
        let doc = Document::decode(DocumentKind::ComponentsSource, &components).unwrap();
        assert!(doc.clone().into_terms().is_none());
        assert_eq!(doc.into_components().unwrap().components[0].name, "Web");
    }

    #[test]
    fn unvalidated_has_no_kind() {
        assert_eq!(Document::Unvalidated(json!({})).kind(), None);
    }

    #[test]
    fn every_kind_has_distinct_schema() {
        let mut names: Vec<&str> = DocumentKind::ALL.iter().map(|k| k.schema_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DocumentKind::ALL.len());
    }
}
