//! # Catalog Entities
//!
//! A [`Catalog`] is the reference frame a conformance report is checked
//! against: the standards it covers, their chapters and criteria, the
//! product components a report may describe, and the terms used as
//! adherence levels.
//!
//! ## Invariants
//!
//! - Chapter ids are unique catalog-wide.
//! - Criterion ids are unique within their chapter.
//! - Standard, component and term ids are unique catalog-wide.
//! - Every component a criterion names exists in the catalog.
//! - Every chapter a component's applicability names exists in the catalog.
//!
//! [`Catalog::invariant_violations`] reports every breach; the composer
//! refuses to emit a catalog with any.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::OpatError;
use crate::identity::{ChapterId, ComponentId, CriterionId, StandardId, TermId};

/// WCAG conformance level of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Level A.
    A,
    /// Level AA.
    AA,
    /// Level AAA.
    AAA,
}

impl Level {
    /// Canonical string form, as written in catalogs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AA => "AA",
            Self::AAA => "AAA",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A standard contributing chapters to a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    /// Standard identifier (e.g. `wcag-2.0`).
    pub id: StandardId,
    /// Human-readable name.
    pub name: String,
    /// Published version.
    pub version: String,
    /// Canonical location of the standard text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A single success criterion or requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    /// Criterion identifier, unique within its chapter.
    pub id: CriterionId,
    /// Conformance level. Absent for requirements that carry no level
    /// (e.g. Section 508 technical requirements).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Criterion text.
    pub description: String,
    /// Short handle (e.g. "Non-text Content").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Link to the normative text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Components this criterion applies to. Empty means every component.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentId>,
}

impl Criterion {
    /// Whether a report may describe `component` under this criterion.
    pub fn applies_to(&self, component: &str) -> bool {
        self.components.is_empty() || self.components.iter().any(|c| c.as_str() == component)
    }
}

/// An ordered group of criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter identifier, unique within the catalog.
    pub id: ChapterId,
    /// Chapter heading.
    pub title: String,
    /// Display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Free-form chapter notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Criteria, in document order.
    pub criteria: Vec<Criterion>,
}

impl Chapter {
    /// Look up a criterion by id.
    pub fn criterion(&self, id: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id.as_str() == id)
    }
}

/// A reportable product component (web, software, documentation, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Component identifier.
    pub id: ComponentId,
    /// Human-readable name.
    pub name: String,
    /// Chapters this component may be reported under. Empty means every chapter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applicability: Vec<ChapterId>,
}

impl Component {
    /// Whether this component may be reported under `chapter`.
    pub fn applies_to_chapter(&self, chapter: &str) -> bool {
        self.applicability.is_empty() || self.applicability.iter().any(|c| c.as_str() == chapter)
    }
}

/// A defined term; term ids double as adherence levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term identifier (e.g. `partially-supports`).
    pub id: TermId,
    /// Display label (e.g. "Partially Supports").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Definition text.
    pub definition: String,
}

/// A composed catalog of standards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog title.
    pub title: String,
    /// Contributing standards, in composition order.
    pub standards: Vec<Standard>,
    /// Chapters from every standard, in composition order.
    pub chapters: Vec<Chapter>,
    /// Reportable components.
    pub components: Vec<Component>,
    /// Defined terms.
    pub terms: Vec<Term>,
}

impl Catalog {
    /// Look up a chapter by id.
    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id.as_str() == id)
    }

    /// Look up a component by id.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id.as_str() == id)
    }

    /// Look up a term by id.
    pub fn term(&self, id: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.id.as_str() == id)
    }

    /// Standard ids in composition order.
    pub fn standard_ids(&self) -> Vec<&str> {
        self.standards.iter().map(|s| s.id.as_str()).collect()
    }

    /// Report every breach of the catalog invariants.
    ///
    /// Returns an empty list for a well-formed catalog. Messages are in
    /// catalog order so the output is deterministic.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        let mut standards = HashSet::new();
        for standard in &self.standards {
            if !standards.insert(standard.id.as_str()) {
                violations.push(format!("duplicate standard id '{}'", standard.id));
            }
        }

        let mut chapters = HashSet::new();
        for chapter in &self.chapters {
            if !chapters.insert(chapter.id.as_str()) {
                violations.push(format!("duplicate chapter id '{}'", chapter.id));
            }
            let mut criteria = HashSet::new();
            for criterion in &chapter.criteria {
                if !criteria.insert(criterion.id.as_str()) {
                    violations.push(format!(
                        "duplicate criterion id '{}' in chapter '{}'",
                        criterion.id, chapter.id
                    ));
                }
            }
        }

        let mut components = HashSet::new();
        for component in &self.components {
            if !components.insert(component.id.as_str()) {
                violations.push(format!("duplicate component id '{}'", component.id));
            }
        }

        let mut terms = HashSet::new();
        for term in &self.terms {
            if !terms.insert(term.id.as_str()) {
                violations.push(format!("duplicate term id '{}'", term.id));
            }
        }

        for chapter in &self.chapters {
            for criterion in &chapter.criteria {
                for component in &criterion.components {
                    if !components.contains(component.as_str()) {
                        violations.push(format!(
                            "criterion '{}' in chapter '{}' references unknown component '{}'",
                            criterion.id, chapter.id, component
                        ));
                    }
                }
            }
        }

        for component in &self.components {
            for chapter in &component.applicability {
                if !chapters.contains(chapter.as_str()) {
                    violations.push(format!(
                        "component '{}' references unknown chapter '{}'",
                        component.id, chapter
                    ));
                }
            }
        }

        violations
    }

    /// SHA-256 digest (lowercase hex) of the catalog's JSON serialization.
    ///
    /// Every field serializes in declaration order and every collection is
    /// a `Vec`, so equal catalogs always produce equal digests.
    pub fn digest(&self) -> Result<String, OpatError> {
        let bytes = serde_json::to_vec(self)?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }
}
