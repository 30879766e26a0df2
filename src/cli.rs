//! CLI definitions for Switchyard.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use switchyard_protocols::DefinitionKind;

/// Switchyard CLI.
#[derive(Parser)]
#[command(name = "switchyard")]
#[command(about = "Dispatch models, actions and skills to generation providers")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to config/switchyard.toml, then ~/.switchyard/config.toml)
    #[arg(short, long, global = true, env = "SWITCHYARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra JSON catalog of definitions to register (repeatable)
    #[arg(long, global = true)]
    pub catalog: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Resolve a name and dispatch it
    Run {
        /// Definition name, alias or `kind/name`
        name: String,

        /// Inputs as a JSON object
        #[arg(short, long, default_value = "{}")]
        inputs: String,

        /// Override the model's default provider
        #[arg(long)]
        provider: Option<String>,

        /// Poll budget per job in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Return right after submit instead of polling
        #[arg(long)]
        no_wait: bool,

        /// Keep running pipeline steps after one fails
        #[arg(long)]
        continue_on_error: bool,

        /// Directory local actions write files to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List registered definitions
    List {
        /// Only list one kind (model, action, skill)
        #[arg(long)]
        kind: Option<DefinitionKind>,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Search definitions by name and description
    Search {
        /// Case-insensitive substring
        query: String,

        /// Filter by declared input type
        #[arg(long)]
        input_type: Option<String>,

        /// Filter by declared output type
        #[arg(long)]
        output_type: Option<String>,

        /// Only models served by this provider
        #[arg(long)]
        provider: Option<String>,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show how a name resolves
    Resolve {
        /// Name to resolve
        name: String,

        /// Allow fuzzy matching
        #[arg(long)]
        fuzzy: bool,

        /// Kind to prefer when the name exists under several kinds
        #[arg(long)]
        prefer: Option<DefinitionKind>,
    },

    /// Show a definition in full
    Info {
        /// Definition name, alias or `kind/name`
        name: String,
    },

    /// List registered providers
    Providers,
}
