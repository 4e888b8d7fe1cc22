//! # Catalog Selector
//!
//! The catalogs a build may be requested for, and which of them can
//! actually be composed today. [`CatalogSelector::support`] is an exhaustive
//! match: a new selector does not compile until it is mapped.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A catalog a build may be requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSelector {
    /// WCAG-only edition.
    Wcag,
    /// Revised Section 508 edition (WCAG 2.0 + Section 508).
    Section508,
    /// EU (EN 301 549) edition.
    Eu,
    /// International edition.
    Int,
}

/// A composition the composer knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Composition {
    /// WCAG 2.0 followed by Section 508; Section 508 supplies the title.
    Wcag20Section508,
}

/// Whether a selector can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// Build with the given composition.
    Supported(Composition),
    /// Not yet implemented; warn and write nothing.
    Unsupported,
}

/// An unrecognised selector string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} is not an available option")]
pub struct SelectorError(pub String);

impl CatalogSelector {
    /// Every selector, in CLI help order.
    pub const ALL: [CatalogSelector; 4] = [Self::Wcag, Self::Section508, Self::Eu, Self::Int];

    /// The selector as written on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wcag => "WCAG",
            Self::Section508 => "508",
            Self::Eu => "EU",
            Self::Int => "INT",
        }
    }

    /// Map the selector to its build support.
    pub fn support(&self) -> Support {
        match self {
            Self::Section508 => Support::Supported(Composition::Wcag20Section508),
            Self::Wcag | Self::Eu | Self::Int => Support::Unsupported,
        }
    }
}

impl fmt::Display for CatalogSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sel| sel.as_str() == s)
            .ok_or_else(|| SelectorError(s.to_string()))
    }
}

impl Composition {
    /// Data files for the standards sources, in composition order.
    pub fn standards_files(&self) -> &'static [&'static str] {
        match self {
            Self::Wcag20Section508 => &["wcag-2.0.yaml", "508.yaml"],
        }
    }

    /// Index into [`Self::standards_files`] of the source supplying the title.
    pub fn primary_index(&self) -> usize {
        match self {
            Self::Wcag20Section508 => 1,
        }
    }

    /// Data file for the components source.
    pub fn components_file(&self) -> &'static str {
        "components.yaml"
    }

    /// Data file for the terms source.
    pub fn terms_file(&self) -> &'static str {
        "terms.yaml"
    }
}
