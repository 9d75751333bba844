use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::OutputFormat;
use crate::pipeline::{SortDirection, SortMode};

#[derive(Parser)]
#[command(name = "webtrack")]
#[command(about = "Browse, filter, and export per-user web activity reports.")]
#[command(version)]
pub struct Cli {
    /// Log filter for stderr output (e.g. "debug", "webtrack=trace"); RUST_LOG wins if set
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read reports from.
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    /// Read reports from a local JSON file ('-' for stdin) instead of the server
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Reports endpoint URL
    #[arg(long)]
    pub reports_url: Option<String>,

    /// Session file holding the login token
    #[arg(long, value_name = "FILE")]
    pub session_file: Option<PathBuf>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Only reports whose system name matches (case-insensitive)
    #[arg(long)]
    pub system: Option<String>,

    /// Only reports with a matching user name (case-insensitive)
    #[arg(long)]
    pub user: Option<String>,

    /// Only reports with a matching browser name (case-insensitive)
    #[arg(long)]
    pub browser: Option<String>,

    /// Only reports with at least one site visited for at least N minutes
    #[arg(long, value_name = "N")]
    pub min_minutes: Option<String>,

    /// Only reports dated on/after this date (YYYY-MM-DD or DD-MM-YYYY)
    #[arg(long)]
    pub from: Option<String>,

    /// Only reports dated on/before this date (YYYY-MM-DD or DD-MM-YYYY)
    #[arg(long)]
    pub to: Option<String>,

    /// Drop sites with no recorded time from the matching reports
    #[arg(long)]
    pub prune_idle: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "WEBTRACK_PASSWORD", hide_env_values = true)]
        password: String,

        /// Login endpoint URL
        #[arg(long)]
        login_url: Option<String>,

        /// User lookup endpoint URL
        #[arg(long)]
        users_url: Option<String>,

        /// Session file to write
        #[arg(long, value_name = "FILE")]
        session_file: Option<PathBuf>,
    },

    /// Forget the stored session
    Logout {
        /// Session file to clear
        #[arg(long, value_name = "FILE")]
        session_file: Option<PathBuf>,
    },

    /// Show who is logged in
    Whoami {
        /// Session file to inspect
        #[arg(long, value_name = "FILE")]
        session_file: Option<PathBuf>,
    },

    /// Show the report view as a table, CSV, or JSON
    Show {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Sort sites by time spent
        #[arg(long, value_enum)]
        sort: Option<SortDirection>,

        /// How sorting rearranges the report hierarchy
        #[arg(long, value_enum)]
        sort_mode: Option<SortMode>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,

        /// Show every row instead of a single page
        #[arg(long)]
        all: bool,

        /// Suppress the header rule and page footer
        #[arg(short, long)]
        quiet: bool,
    },

    /// Export the report view as CSV
    Export {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Sort sites by time spent
        #[arg(long, value_enum)]
        sort: Option<SortDirection>,

        /// How sorting rearranges the report hierarchy
        #[arg(long, value_enum)]
        sort_mode: Option<SortMode>,

        /// Output CSV file (default: report.csv). Use '-' for stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the sites with the most time spent across all reports
    Top {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of sites to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Suppress the header rule
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the resolved configuration
    Config,

    /// Generate shell completions
    #[cfg(feature = "completions")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
