//! CLI argument definitions for the Casebook client.

use std::path::PathBuf;

use casebook_cli::views::FilterArgs;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "casebook",
    version,
    about = "Casebook - list and edit case-management records from the terminal",
    long_about = "List and edit Casebook records (tasks, donations, work orders, \
                  financial entries, mentor teams) against a running backend.\n\n\
                  Settings are read from settings.toml in the platform config \
                  directory; flags override the file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the settings file).
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides the settings file).
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List records of a resource.
    List(ListArgs),

    /// Show one record.
    Show(TargetArgs),

    /// Create a record from a JSON body.
    Create(CreateArgs),

    /// Update a record from a JSON patch.
    Update(UpdateArgs),

    /// Delete a record.
    Delete(TargetArgs),

    /// Search interactively: every line read from stdin replaces the search text.
    Watch(WatchArgs),

    /// Print the effective settings, or write the defaults to the settings file.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Resource to list.
    #[arg(value_enum)]
    pub resource: ResourceArg,

    /// Free-text search.
    #[arg(long)]
    pub search: Option<String>,

    /// Status (tasks, work orders).
    #[arg(long)]
    pub status: Option<String>,

    /// Priority (tasks, work orders).
    #[arg(long)]
    pub priority: Option<String>,

    /// Category (tasks, financial entries).
    #[arg(long)]
    pub category: Option<String>,

    /// Donation kind or financial entry type.
    #[arg(long)]
    pub kind: Option<String>,

    /// Work order site.
    #[arg(long)]
    pub site: Option<String>,

    /// Donation campaign.
    #[arg(long)]
    pub campaign: Option<String>,

    /// Mentor team program.
    #[arg(long)]
    pub program: Option<String>,

    /// Financial period, e.g. 2026-09.
    #[arg(long)]
    pub period: Option<String>,

    /// Only active (true) or inactive (false) mentor teams.
    #[arg(long)]
    pub active: Option<bool>,

    /// Page number (1-based).
    #[arg(long)]
    pub page: Option<u32>,

    /// Items per page.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Print raw JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn filters(&self) -> FilterArgs {
        FilterArgs {
            search: self.search.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
            category: self.category.clone(),
            kind: self.kind.clone(),
            site: self.site.clone(),
            campaign: self.campaign.clone(),
            program: self.program.clone(),
            period: self.period.clone(),
            active: self.active,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Args)]
pub struct TargetArgs {
    #[arg(value_enum)]
    pub resource: ResourceArg,

    /// Record id.
    pub id: String,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(value_enum)]
    pub resource: ResourceArg,

    /// JSON body, e.g. '{"title":"Call landlord"}'.
    #[arg(long, value_name = "JSON")]
    pub data: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(value_enum)]
    pub resource: ResourceArg,

    /// Record id.
    pub id: String,

    /// JSON patch; absent fields are left unchanged.
    #[arg(long, value_name = "JSON")]
    pub data: String,
}

#[derive(Args)]
pub struct WatchArgs {
    #[arg(value_enum)]
    pub resource: ResourceArg,

    /// Debounce window for search edits, in milliseconds (overrides the settings file).
    #[arg(long = "debounce-ms", value_name = "MS")]
    pub debounce_ms: Option<u64>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the default settings to the settings file if it does not exist.
    #[arg(long)]
    pub init: bool,
}

/// Resources the CLI can address.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ResourceArg {
    Tasks,
    Donations,
    WorkOrders,
    FinancialEntries,
    MentorTeams,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
