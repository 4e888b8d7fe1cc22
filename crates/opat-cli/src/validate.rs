//! # Validate Subcommand
//!
//! Validates one conformance report: first against its JSON schema, then,
//! if `--catalog-file` is given, against that catalog.
//!
//! The verdict is printed to stdout when it passes and to stderr when it
//! fails. Input problems (missing or unparseable files) are verdicts too;
//! only unexpected I/O errors are operational errors.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use opat_catalog::{parser, CatalogError, ValidationOrchestrator};
use opat_core::ValidationResult;
use opat_schema::SchemaValidator;

use crate::config::Settings;

pub const FILE_NOT_FOUND: &str = "file does not exist";
pub const FILE_NOT_YAML: &str = "file is not in YAML format";
pub const CATALOG_NOT_FOUND: &str = "catalog file does not exist";
pub const CATALOG_NOT_YAML: &str = "catalog file is not in YAML format";

/// Arguments for the `opat validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Conformance report to validate (YAML or JSON).
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: PathBuf,

    /// Catalog to cross-validate the report against.
    #[arg(long = "catalog-file", visible_alias = "cf", value_name = "PATH")]
    pub catalog_file: Option<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_validate(args: &ValidateArgs, settings: &Settings) -> Result<u8> {
    let validator = crate::load_validator(settings.schema_dir.as_deref())?;

    let file = crate::resolve_path(&args.file, &settings.repo_root);
    let catalog_file = args
        .catalog_file
        .as_deref()
        .map(|p| crate::resolve_path(p, &settings.repo_root));

    let result = validate_files(&validator, &file, catalog_file.as_deref())?;
    if result.passed() {
        println!("{result}");
        Ok(0)
    } else {
        eprintln!("{result}");
        Ok(1)
    }
}

/// Validate the report at `file`, cross-validating against `catalog_file`
/// if given.
///
/// The catalog file is only read once the report has passed its schema.
pub fn validate_files(
    validator: &SchemaValidator,
    file: &Path,
    catalog_file: Option<&Path>,
) -> Result<ValidationResult> {
    let document = match parser::load_document(file) {
        Ok(document) => document,
        Err(CatalogError::FileNotFound { .. }) => return Ok(ValidationResult::invalid(FILE_NOT_FOUND)),
        Err(CatalogError::Malformed { detail, .. }) => {
            tracing::debug!(%detail, "report is not well-formed");
            return Ok(ValidationResult::invalid(FILE_NOT_YAML));
        }
        Err(e) => return Err(e.into()),
    };

    let orchestrator = ValidationOrchestrator::new(validator);
    let structural = orchestrator.run(&document, None);
    let Some(catalog_file) = catalog_file else {
        return Ok(structural);
    };
    if !structural.passed() {
        return Ok(structural);
    }

    let catalog = match parser::load_document(catalog_file) {
        Ok(catalog) => catalog,
        Err(CatalogError::FileNotFound { .. }) => {
            return Ok(ValidationResult::invalid(CATALOG_NOT_FOUND))
        }
        Err(CatalogError::Malformed { detail, .. }) => {
            tracing::debug!(%detail, "catalog is not well-formed");
            return Ok(ValidationResult::invalid(CATALOG_NOT_YAML));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(catalog = %catalog_file.display(), "cross-validating against catalog");

    Ok(orchestrator.run(&document, Some(&catalog)))
}
