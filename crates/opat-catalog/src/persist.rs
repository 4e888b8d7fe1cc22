//! Catalog persistence.
//!
//! A composed catalog is written as YAML to
//! `<dir>/2.4-edition-<standard ids joined by '-'>[-<lang>].yaml`. The file
//! is written to a temporary sibling and renamed into place, so a failed
//! write never leaves a partial catalog behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use opat_core::{Catalog, LanguageTag};

use crate::error::{CatalogError, CatalogResult};

/// Edition prefix of every persisted catalog file name.
pub const EDITION_PREFIX: &str = "2.4-edition";

/// File name for `catalog`, e.g. `2.4-edition-wcag-2.0-508.yaml`.
pub fn catalog_file_name(catalog: &Catalog, lang: Option<&LanguageTag>) -> String {
    let mut name = EDITION_PREFIX.to_string();
    for id in catalog.standard_ids() {
        name.push('-');
        name.push_str(id);
    }
    if let Some(lang) = lang {
        name.push('-');
        name.push_str(lang.as_str());
    }
    name.push_str(".yaml");
    name
}

/// Render `catalog` as YAML.
pub fn render_yaml(catalog: &Catalog) -> CatalogResult<String> {
    Ok(serde_yaml::to_string(catalog)?)
}

/// Write `catalog` into `dir` and return the path written.
pub fn write_catalog(
    dir: &Path,
    catalog: &Catalog,
    lang: Option<&LanguageTag>,
) -> CatalogResult<PathBuf> {
    let yaml = render_yaml(catalog)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(catalog_file_name(catalog, lang));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(yaml.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| CatalogError::Persist {
        path: path.clone(),
        reason: e.error.to_string(),
    })?;

    tracing::info!(path = %path.display(), bytes = yaml.len(), "catalog written");
    Ok(path)
}
