//! # opat-cli — CLI Tool for the OPAT Toolchain
//!
//! Provides the `opat` command-line interface.
//!
//! ## Subcommands
//!
//! - `opat validate`: validate a conformance report against its schema and,
//!   optionally, a catalog.
//! - `opat catalog`: rebuild a catalog from its data sources.
//!
//! ```bash
//! opat validate -f tests/fixtures/valid.yaml
//! opat validate -f tests/fixtures/valid.yaml --cf catalog/2.4-edition-wcag-2.0-508.yaml
//! opat catalog -c 508 --yes
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` validation or composition failure, `2` operational error.

pub mod catalog;
pub mod config;
pub mod confirm;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use opat_schema::SchemaValidator;

/// Resolve a path that may be relative to the repository root.
///
/// If the path is absolute, returns it as-is. If relative and the file
/// exists relative to `repo_root`, uses that. Otherwise returns the path
/// relative to the current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Walk up from `start` to find the repository root.
///
/// The repo root is identified by the presence of both `schemas/` and
/// `catalog/` directories.
pub fn resolve_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join("schemas").is_dir() && dir.join("catalog").is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Build the schema registry from `schema_dir`, or from the bundled schemas
/// when no directory is configured.
pub fn load_validator(schema_dir: Option<&Path>) -> Result<SchemaValidator> {
    let validator = match schema_dir {
        Some(dir) => SchemaValidator::new(dir)
            .with_context(|| format!("failed to load JSON schemas from {}", dir.display()))?,
        None => SchemaValidator::bundled().context("failed to load bundled JSON schemas")?,
    };
    tracing::info!(
        schema_count = validator.schema_count(),
        bundled = schema_dir.is_none(),
        "loaded schema registry"
    );
    Ok(validator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_prefers_repo_relative() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("doc.yaml"), "title: x\n").unwrap();
        assert_eq!(
            resolve_path(Path::new("doc.yaml"), root.path()),
            root.path().join("doc.yaml")
        );
        assert_eq!(
            resolve_path(Path::new("absent.yaml"), root.path()),
            PathBuf::from("absent.yaml")
        );
    }

    #[test]
    fn resolve_repo_root_walks_up() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("schemas")).unwrap();
        std::fs::create_dir_all(root.path().join("catalog").join("data")).unwrap();
        let nested = root.path().join("catalog").join("data");
        assert_eq!(resolve_repo_root(&nested).as_deref(), Some(root.path()));
    }

    #[test]
    fn resolve_repo_root_needs_both_markers() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("schemas")).unwrap();
        let found = resolve_repo_root(root.path());
        assert_ne!(found.as_deref(), Some(root.path()));
    }

    #[test]
    fn bundled_validator_loads_without_directory() {
        let validator = load_validator(None).unwrap();
        assert_eq!(validator.schema_count(), opat_schema::BUNDLED_SCHEMAS.len());
    }

    #[test]
    fn missing_schema_directory_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let err = load_validator(Some(&root.path().join("nope"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load JSON schemas"));
    }
}
