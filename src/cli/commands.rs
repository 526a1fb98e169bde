//! CLI commands and argument parsing

use crate::assets::AssetType;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Search and look up hosts, certificates and web properties
#[derive(Parser, Debug)]
#[command(name = "assetq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Organization ID sent with every request
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// Personal access token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Overall deadline for the command, in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Send progress messages to the log instead of stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a search query across all pages
    Search {
        /// Query expression
        query: String,

        /// Fields to return (comma-separated)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Results per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Maximum number of pages to request
        #[arg(long)]
        max_pages: Option<u32>,

        /// Search inside a collection
        #[arg(long)]
        collection: Option<String>,
    },

    /// Look up assets by identifier
    Lookup {
        /// Asset type: host, certificate or webproperty
        asset_type: AssetType,

        /// IPs, certificate fingerprints or host:port pairs
        #[arg(required = true)]
        ids: Vec<String>,

        /// Identifiers per request
        #[arg(long)]
        page_size: Option<u32>,

        /// Maximum number of requests
        #[arg(long)]
        max_pages: Option<u32>,

        /// View the assets as of this time (RFC 3339)
        #[arg(long)]
        at_time: Option<DateTime<Utc>>,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the merged configuration with secrets masked
    Show,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON document
    Json,
    /// Human-readable output
    Pretty,
}
