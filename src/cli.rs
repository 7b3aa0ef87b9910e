//! Command-line interface for claimdiff

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claimdiff")]
#[command(about = "A snapshot-based claims dataset ingestion and diff tool")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override workspace location
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize claimdiff workspace
    Init {
        /// Force initialization even if workspace exists
        #[arg(long)]
        force: bool,
    },

    /// Ingest a claims file (or pasted text) and store it as a new version
    Ingest {
        /// Input CSV/TSV file path (omit with --paste)
        input: Option<String>,

        /// Display name for the new version (defaults to the file name)
        #[arg(long)]
        name: Option<String>,

        /// Read tab/newline-delimited text from stdin instead of a file
        #[arg(long)]
        paste: bool,

        /// Validate and report without saving a version
        #[arg(long)]
        dry_run: bool,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// List all stored versions
    List {
        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Show version information
    Show {
        /// Version id, or the aliases "current"/"previous"
        version: String,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Compare two versions (first is the current side)
    Diff {
        /// Current-side version id or alias
        #[arg(default_value = "current")]
        version_a: String,

        /// Previous-side version id or alias
        #[arg(default_value = "previous")]
        version_b: String,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Custom output file for the comparison result (JSON)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show KPIs and top clients for the current version
    Stats {
        /// Trailing window length in days
        #[arg(long, default_value_t = crate::DEFAULT_WINDOW_DAYS)]
        days: i64,

        /// Number of top clients to report
        #[arg(long, default_value_t = crate::metrics::DEFAULT_TOP_CLIENTS)]
        top: usize,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse output format string
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}
