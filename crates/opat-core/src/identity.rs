//! # Identity Newtypes
//!
//! String identifiers for catalog entries. Each is a distinct type, so a
//! [`ComponentId`] cannot be passed where a [`TermId`] is expected.
//!
//! ## Validation
//!
//! All identifiers share one rule: non-empty, no whitespace. Deserialization
//! goes through the same constructor, so a value that slipped past a schema
//! still cannot become a typed identifier.
//!
//! A [`LanguageTag`] also names a directory and a file-name suffix, so it
//! additionally rejects path separators and dot-only segments.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdError;

fn check_identifier(kind: &'static str, value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(IdError::Whitespace {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

macro_rules! string_identifier {
    ($(#[$meta:meta])* $ty:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $ty(String);

        impl $ty {
            /// Create a validated identifier.
            ///
            /// # Errors
            ///
            /// Returns [`IdError`] if the value is empty or contains whitespace.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                check_identifier(stringify!($ty), &value)?;
                Ok(Self(value))
            }

            /// Access the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_identifier!(
    /// Identifier of a standard (e.g. `wcag-2.0`, `508`).
    StandardId
);

string_identifier!(
    /// Identifier of a catalog chapter (e.g. `success_criteria_level_a`).
    ChapterId
);

string_identifier!(
    /// Identifier of a criterion, unique within its chapter (e.g. `1.1.1`).
    CriterionId
);

string_identifier!(
    /// Identifier of a reportable product component (e.g. `web`).
    ComponentId
);

string_identifier!(
    /// Identifier of a catalog term, used as an adherence level (e.g. `supports`).
    TermId
);

/// Language tag selecting a localized set of catalog sources (e.g. `fr`).
///
/// Used as a subdirectory of the data directory and as a catalog file-name
/// suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Create a validated language tag.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if the value is empty, contains whitespace or a
    /// path separator, or consists only of dots.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        check_identifier("LanguageTag", &value)?;
        if value.contains(['/', '\\']) || value.chars().all(|c| c == '.') {
            return Err(IdError::PathSegment {
                kind: "LanguageTag",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Access the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageTag {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
