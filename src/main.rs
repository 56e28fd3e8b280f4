//! `pkgnorm` — clean, validate and query npm package documents.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and pick the normalizer and schema.
//! 3. Read raw documents ([`source`]).
//! 4. Wrap each in a [`Package`] and run the requested command.
//! 5. Exit `0`, or `1` when `check` finds an invalid document.

mod cli;
mod config;
mod report;
mod source;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ReportFormat};
use config::{load_config, Config};
use pkgnorm::{CheckResult, Normalizer, Package, PackageOptions, Schema};
use source::{expand_paths, load_document};

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    let normalizer = if cli.strict {
        Normalizer::strict()
    } else {
        config.normalizer()
    };
    let schema = if cli.strict && config.schema.path.is_none() {
        Schema::strict()
    } else {
        config.load_schema()?
    };

    match cli.command {
        Command::Clean {
            file,
            pick,
            omit,
            compact,
        } => {
            let options = select_fields(&config, pick, omit);
            let pkg = Package::with_schema(&load_document(&file)?, &options, &normalizer, schema);
            let json = if compact {
                serde_json::to_string(&pkg)?
            } else {
                serde_json::to_string_pretty(&pkg)?
            };
            println!("{}", json);
        }
        Command::Check {
            paths,
            report,
            verbose,
            quiet,
        } => {
            let mut results = Vec::new();
            for file in expand_paths(&paths)? {
                let pkg = Package::with_schema(
                    &load_document(&file)?,
                    &PackageOptions::default(),
                    &normalizer,
                    schema.clone(),
                );
                let result = check(&pkg, file.display().to_string());
                debug!(%result, "checked");
                results.push(result);
            }

            match report {
                ReportFormat::Terminal => report::terminal::render(&results, verbose, quiet)?,
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            }

            // Exit code: 1 if any document is invalid
            if results.iter().any(|r| !r.valid) {
                std::process::exit(1);
            }
        }
        Command::Deps { file, dev, all } => {
            let pkg = Package::with_schema(
                &load_document(&file)?,
                &PackageOptions::default(),
                &normalizer,
                schema,
            );
            let names = if all {
                pkg.all_dep_names()
            } else if dev {
                pkg.dev_dep_names()
            } else {
                pkg.dep_names()
            };
            for name in names {
                println!("{}", name);
            }
        }
        Command::Search { text, paths } => {
            for file in expand_paths(&paths)? {
                let pkg = Package::with_schema(
                    &load_document(&file)?,
                    &PackageOptions::default(),
                    &normalizer,
                    schema.clone(),
                );
                if pkg.mentions(&text) {
                    println!("{}", file.display());
                }
            }
        }
    }

    Ok(())
}

fn initialize_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "pkgnorm starting");
}

/// CLI flags replace the configured selection outright.
fn select_fields(
    config: &Config,
    pick: Option<pkgnorm::FieldList>,
    omit: Option<pkgnorm::FieldList>,
) -> PackageOptions {
    if pick.is_some() || omit.is_some() {
        PackageOptions { pick, omit }
    } else {
        config.output.clone()
    }
}

fn check(pkg: &Package, source: String) -> CheckResult {
    let errors = pkg.validation_errors();
    CheckResult {
        source,
        name: pkg.name().map(str::to_string),
        version: pkg.version().map(str::to_string),
        valid: errors.is_empty(),
        errors,
    }
}
