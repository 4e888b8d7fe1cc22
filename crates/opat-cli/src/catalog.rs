//! # Catalog Subcommand
//!
//! Rebuilds a catalog from the data sources under the data directory and
//! writes it into the catalog directory. Only the `508` catalog can be
//! built; other selectors print a warning and write nothing.
//!
//! Progress goes to the `out` writer; warnings and failure reasons go to
//! the `err` writer.

use std::io::Write;

use anyhow::{Context, Result};
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::Args;

use opat_catalog::{write_catalog, CatalogComposer, SourceSet};
use opat_core::{CatalogSelector, LanguageTag, Support};

use crate::config::Settings;
use crate::confirm::Confirm;

/// Parse a selector through [`CatalogSelector`]'s `FromStr`, listing every
/// selector as a possible value in `--help`.
fn selector_parser() -> impl TypedValueParser<Value = CatalogSelector> {
    PossibleValuesParser::new(CatalogSelector::ALL.map(|sel| sel.as_str()))
        .try_map(|raw| raw.parse::<CatalogSelector>())
}

/// Arguments for the `opat catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Catalog to rebuild.
    #[arg(short = 'c', long, value_parser = selector_parser())]
    pub catalog: CatalogSelector,

    /// Language tag; sources are read from `<data-dir>/<lang>/`.
    #[arg(long, value_name = "TAG")]
    pub lang: Option<LanguageTag>,

    /// Rebuild without asking for confirmation.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Execute the catalog subcommand, printing progress to `out` and warnings
/// and failure reasons to `err`.
///
/// Returns exit code: 0 on success, unsupported selector or abort; 1 if the
/// catalog could not be composed.
pub fn run_catalog(
    args: &CatalogArgs,
    settings: &Settings,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<u8> {
    let selector = args.catalog;

    let composition = match selector.support() {
        Support::Supported(composition) => composition,
        Support::Unsupported => {
            tracing::debug!(%selector, "catalog selector not supported");
            writeln!(err, "{selector} is currently not supported.")?;
            return Ok(0);
        }
    };

    writeln!(
        out,
        "Warning: This will rebuild the following catalog: {selector}."
    )?;
    if !args.yes
        && !confirm
            .confirm(&format!("Confirm rebuild of {selector} catalog (y): "))
            .context("failed to read confirmation")?
    {
        writeln!(out, "Aborting...")?;
        return Ok(0);
    }
    writeln!(out, "Rebuilding...")?;

    let data_dir = match &args.lang {
        Some(lang) => settings.data_dir.join(lang.as_str()),
        None => settings.data_dir.clone(),
    };
    tracing::info!(data_dir = %data_dir.display(), "loading catalog sources");

    let validator = crate::load_validator(settings.schema_dir.as_deref())?;
    let composed = SourceSet::load(&data_dir, composition)
        .map_err(|e| e.to_string())
        .and_then(|sources| {
            CatalogComposer::new(&validator)
                .with_product_name(settings.product_name.as_str())
                .compose_set(composition, &sources)
                .map_err(|e| e.to_string())
        });

    let catalog = match composed {
        Ok(catalog) => catalog,
        Err(reason) => {
            writeln!(err, "{reason}")?;
            writeln!(out, "Failed to create catalog {selector}.")?;
            return Ok(1);
        }
    };

    let path = write_catalog(&settings.catalog_dir, &catalog, args.lang.as_ref())
        .context("failed to write catalog")?;
    tracing::info!(path = %path.display(), digest = %catalog.digest()?, "catalog rebuilt");
    writeln!(out, "Successfully created catalog {selector}.")?;
    Ok(0)
}
