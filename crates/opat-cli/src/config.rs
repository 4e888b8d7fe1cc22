//! # Configuration
//!
//! `opat.yaml` settings and their resolution against CLI flags.
//!
//! Precedence, highest first: command-line flag, configuration file
//! (`--config`, or `opat.yaml` at the repository root), defaults derived
//! from the repository root. Relative paths in a configuration file are
//! resolved against the file's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use opat_catalog::DEFAULT_PRODUCT_NAME;

/// Name of the configuration file looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = "opat.yaml";

/// Contents of an `opat.yaml` file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpatConfig {
    /// Directory of JSON schemas.
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,
    /// Directory catalogs are written to.
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
    /// Directory of catalog data sources. Defaults to `<catalog_dir>/data`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Product name used in catalog titles.
    #[serde(default)]
    pub product_name: Option<String>,
}

impl OpatConfig {
    /// Read a configuration file, resolving its relative paths against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        let base = path.parent().unwrap_or(Path::new("."));
        for dir in [
            &mut config.schema_dir,
            &mut config.catalog_dir,
            &mut config.data_dir,
        ]
        .into_iter()
        .flatten()
        {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Load `--config` if given, else `opat.yaml` at the repo root if present.
    pub fn discover(explicit: Option<&Path>, repo_root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default = repo_root.join(CONFIG_FILE_NAME);
        if default.is_file() {
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }
}

/// Directory overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub schema_dir: Option<PathBuf>,
    pub catalog_dir: Option<PathBuf>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Repository root used for relative paths.
    pub repo_root: PathBuf,
    /// Schema directory; `None` selects the bundled schemas.
    pub schema_dir: Option<PathBuf>,
    /// Directory catalogs are written to.
    pub catalog_dir: PathBuf,
    /// Directory of catalog data sources.
    pub data_dir: PathBuf,
    /// Product name used in catalog titles.
    pub product_name: String,
}

impl Settings {
    /// Merge flags, configuration and repository defaults.
    pub fn resolve(overrides: Overrides, config: OpatConfig, repo_root: &Path) -> Self {
        let schema_dir = overrides
            .schema_dir
            .map(|p| crate::resolve_path(&p, repo_root))
            .or(config.schema_dir)
            .or_else(|| Some(repo_root.join("schemas")).filter(|d| d.is_dir()));

        let catalog_dir = overrides
            .catalog_dir
            .map(|p| crate::resolve_path(&p, repo_root))
            .or(config.catalog_dir)
            .unwrap_or_else(|| repo_root.join("catalog"));

        let data_dir = config
            .data_dir
            .unwrap_or_else(|| catalog_dir.join("data"));

        Self {
            repo_root: repo_root.to_path_buf(),
            schema_dir,
            catalog_dir,
            data_dir,
            product_name: config
                .product_name
                .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
        }
    }
}
