//! Clap derive structures for the `gatelog` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gatelog_core::{StatusFilter, ThemeMode};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gatelog -- query a vehicle gate-log API from the command line
#[derive(Debug, Parser)]
#[command(
    name = "gatelog",
    version,
    about = "Inspect vehicle gate logs from the command line",
    long_about = "Read-only client for a vehicle gate-logging API.\n\n\
        Shows occupancy statistics, searches logged visits, exports CSV\n\
        and renders a static HTML snapshot of the dashboard.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// API base URL (overrides config), e.g. http://127.0.0.1:8000/api
    #[arg(long, short = 'a', env = "GATELOG_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GATELOG_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "GATELOG_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "GATELOG_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Self::Dark,
            ThemeArg::Light => Self::Light,
        }
    }
}

/// Parse `--status`, case-insensitively.
fn parse_status(raw: &str) -> Result<StatusFilter, String> {
    raw.parse()
        .map_err(|_| format!("unknown status '{raw}' (expected all, inside or exited)"))
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show entry statistics and current occupancy
    #[command(alias = "st")]
    Stats,

    /// List logged vehicle visits, newest first
    #[command(alias = "ls", alias = "v")]
    Vehicles(SearchArgs),

    /// Show every visit of one vehicle
    #[command(alias = "h")]
    History {
        /// Vehicle number, e.g. KA01AB1234
        vehicle_no: String,
    },

    /// Export logged visits to CSV
    Export(ExportArgs),

    /// Render a static HTML snapshot of the dashboard
    Report(ReportArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Search Arguments ──────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive text matched against number, visitor, phone and purpose
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Status filter: all, inside or exited
    #[arg(long, default_value = "all", value_parser = parse_status)]
    pub status: StatusFilter,
}

impl SearchArgs {
    pub fn query(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }
}

// ── Export / Report ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory for the CSV file (defaults to config export_dir, then cwd)
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// Write CSV to stdout instead of a file
    #[arg(long, conflicts_with = "dir")]
    pub stdout: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Output HTML file ("-" for stdout)
    #[arg(long, short = 'f', default_value = "gatelog-report.html")]
    pub file: PathBuf,

    /// Color scheme (defaults to the saved dashboard theme)
    #[arg(long)]
    pub theme: Option<ThemeArg>,

    #[command(flatten)]
    pub filter: SearchArgs,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value
    Set {
        /// Config key: api_base, timeout, refresh_interval, insecure, ca_cert, export_dir
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
