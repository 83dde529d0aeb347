//! CLI argument definitions for livemarket.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `constituents` | List index members, optionally filtered by name |
//! | `summary` | Price summary of one instrument |
//! | `history` | Price series of one instrument over a period |
//! | `dashboard` | Load everything the dashboard shows at once |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--log-format` | `text` | Diagnostics format on stderr (text, json) |
//! | `--origin` | `http://localhost:5173` | Where the data files are served |
//! | `--host` | origin host | Host used for deployment detection |
//! | `--base-path` | detected | Explicit data path prefix |
//! | `--timeout-ms` | `10000` | Request timeout in ms |
//! | `--delay-ms` | `0` | Simulated latency before parsing |
//!
//! # Examples
//!
//! ```bash
//! livemarket constituents --search banco --format table
//! livemarket history AGUAS-A --period 3M --pretty
//! livemarket --origin https://user.github.io dashboard --instrument BCI
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use livemarket_core::{DashboardConfig, Period, ValidationError};

#[derive(Debug, Parser)]
#[command(
    name = "livemarket",
    author,
    version,
    about = "Market dashboard data from the command line"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Format of diagnostics written to stderr. Verbosity follows `RUST_LOG`.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Scheme and authority the data files are served from.
    #[arg(long, global = true, default_value = "http://localhost:5173")]
    pub origin: String,

    /// Host used for deployment detection instead of the origin's.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Data path prefix, overriding deployment detection.
    #[arg(long, global = true)]
    pub base_path: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Simulated latency awaited after a successful response, in milliseconds.
    #[arg(long, global = true, default_value_t = 0)]
    pub delay_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn dashboard_config(&self) -> Result<DashboardConfig, ValidationError> {
        let mut config = DashboardConfig::for_origin(&self.origin)?
            .with_timeout_ms(self.timeout_ms)
            .with_artificial_delay_ms(self.delay_ms);
        if let Some(host) = &self.host {
            config = config.with_host(host);
        }
        if let Some(base_path) = &self.base_path {
            config = config.with_base_path(base_path.as_str());
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the index constituents.
    ///
    ///   livemarket constituents
    ///   livemarket constituents --search aguas
    Constituents(ConstituentsArgs),

    /// Fetch the price summary of an instrument.
    ///
    ///   livemarket summary
    ///   livemarket summary BCI
    Summary(SummaryArgs),

    /// Fetch the price history of an instrument and filter it by period.
    ///
    ///   livemarket history IPSA --period 1M
    ///   livemarket history IPSA --from-year 2020 --to-year 2023
    History(HistoryArgs),

    /// Load constituents, summary and history the way the dashboard does.
    ///
    ///   livemarket dashboard --instrument AGUAS-A --period 3M
    Dashboard(DashboardArgs),
}

#[derive(Debug, Args)]
pub struct ConstituentsArgs {
    /// Case-insensitive substring matched against short names.
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Instrument identifier; the configured default when omitted.
    pub instrument: Option<String>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Instrument identifier; the configured default when omitted.
    pub instrument: Option<String>,

    #[command(flatten)]
    pub window: WindowArgs,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Instrument to select after the initial load.
    #[arg(long)]
    pub instrument: Option<String>,

    /// Constituents search term.
    #[arg(long, default_value = "")]
    pub search: String,

    #[command(flatten)]
    pub window: WindowArgs,
}

/// Period selection shared by `history` and `dashboard`.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Lookback token: 1D, 1S, 1M, 3M, 6M, 1Y, 5Y or ALL.
    #[arg(long, conflicts_with_all = ["from_year", "to_year"])]
    pub period: Option<Period>,

    /// First calendar year of a custom range.
    #[arg(long, requires = "to_year")]
    pub from_year: Option<i32>,

    /// Last calendar year of a custom range.
    #[arg(long, requires = "from_year")]
    pub to_year: Option<i32>,
}
