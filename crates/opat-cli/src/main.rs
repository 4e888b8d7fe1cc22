//! # opat CLI entry point
//!
//! Parses command-line arguments, resolves configuration and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use opat_cli::catalog::{run_catalog, CatalogArgs};
use opat_cli::config::{OpatConfig, Overrides, Settings};
use opat_cli::confirm::{AssumeYes, Confirm, Prompt};
use opat_cli::validate::{run_validate, ValidateArgs};

/// OPAT toolchain CLI
///
/// Validates accessibility conformance reports against the OPAT schema and
/// a composed catalog, and rebuilds catalogs from their data sources.
#[derive(Parser, Debug)]
#[command(name = "opat", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of JSON schemas (defaults to the bundled schemas).
    #[arg(long, global = true)]
    schema_dir: Option<PathBuf>,

    /// Directory catalogs are read from and written to.
    #[arg(long, global = true)]
    catalog_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a conformance report, optionally against a catalog.
    Validate(ValidateArgs),

    /// Rebuild a catalog from its data sources.
    Catalog(CatalogArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "opat CLI starting");

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let repo_root = opat_cli::resolve_repo_root(&cwd).unwrap_or_else(|| {
        tracing::debug!("Could not locate repository root; using current directory");
        cwd.clone()
    });
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let result = OpatConfig::discover(cli.config.as_deref(), &repo_root).and_then(|config| {
        let overrides = Overrides {
            schema_dir: cli.schema_dir,
            catalog_dir: cli.catalog_dir,
        };
        let settings = Settings::resolve(overrides, config, &repo_root);
        tracing::debug!(?settings, "resolved settings");

        match cli.command {
            Commands::Validate(args) => run_validate(&args, &settings),
            Commands::Catalog(args) => {
                let mut confirm: Box<dyn Confirm> = if args.yes {
                    Box::new(AssumeYes)
                } else {
                    Box::new(Prompt::stdio())
                };
                run_catalog(
                    &args,
                    &settings,
                    confirm.as_mut(),
                    &mut std::io::stdout(),
                    &mut std::io::stderr(),
                )
            }
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
