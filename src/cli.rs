use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pkgnorm::FieldList;

#[derive(Parser, Debug)]
#[command(
    name = "pkgnorm",
    about = "Normalize npm registry documents and package.json manifests",
    version
)]
pub struct Cli {
    /// Config file [default: ./.pkgnorm/config.toml, fallback ~/.config/pkgnorm/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Require `description` as well as `name` (overrides the config)
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the cleaned document as JSON
    Clean {
        /// Document to clean (`-` for stdin)
        file: PathBuf,

        /// Fields to keep, comma-delimited
        #[arg(long, value_name = "FIELDS")]
        pick: Option<FieldList>,

        /// Fields to drop, comma-delimited
        #[arg(long, value_name = "FIELDS", conflicts_with = "pick")]
        omit: Option<FieldList>,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Validate documents against the schema
    Check {
        /// Documents or directories of `*.json` documents
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Report format
        #[arg(long, default_value = "terminal", value_name = "FORMAT")]
        report: ReportFormat,

        /// Show valid documents too (not just invalid ones)
        #[arg(short, long)]
        verbose: bool,

        /// Only print summary line
        #[arg(short, long)]
        quiet: bool,
    },

    /// List dependency names
    Deps {
        /// Document to inspect (`-` for stdin)
        file: PathBuf,

        /// devDependencies instead of dependencies
        #[arg(long, conflicts_with = "all")]
        dev: bool,

        /// Both sections, merged and sorted
        #[arg(long)]
        all: bool,
    },

    /// Print the documents that mention TEXT anywhere (case-insensitive)
    Search {
        text: String,

        /// Documents or directories of `*.json` documents
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
