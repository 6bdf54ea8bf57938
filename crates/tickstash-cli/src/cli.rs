//! CLI argument definitions for Tickstash.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `collect` | Run one collection for a ticker |
//! | `list` | Print every recorded quote entity |
//!
//! # Environment
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TICKSTASH_HOME` | `~/.tickstash` | Root directory for the structured store |
//! | `TICKSTASH_BUCKET` | unset | Destination bucket; unset disables publishing |
//! | `TICKSTASH_STORAGE_ENDPOINT` | `https://storage.googleapis.com` | Object-store endpoint |
//!
//! # Examples
//!
//! ```bash
//! # Collect today's quote for MSFT and publish the artifacts
//! TICKSTASH_BUCKET=my-bucket tickstash collect MSFT
//!
//! # Offline run with deterministic mock data
//! tickstash collect MSFT --mock --skip-upload
//!
//! # Read back everything recorded so far
//! tickstash list
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tickstash - periodic stock quote collector.
///
/// Each run fetches the latest daily snapshot for a ticker, stores it as an
/// immutable record, refreshes the local CSV history and price chart, and
/// publishes both artifacts to an object-store bucket.
#[derive(Debug, Parser)]
#[command(
    name = "tickstash",
    author,
    version,
    about = "Periodic stock quote collector"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one collection for a ticker.
    ///
    /// Fetches the latest daily snapshot, persists it, appends the CSV
    /// history, renders the price chart and uploads both artifacts.
    /// A provider with no data for the ticker ends the run cleanly.
    Collect(CollectArgs),

    /// Print every recorded quote entity.
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Ticker symbol to collect, e.g. MSFT.
    pub ticker: String,

    /// Directory for the CSV history and chart artifacts.
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Use deterministic mock data instead of the live provider.
    #[arg(long, default_value_t = false)]
    pub mock: bool,

    /// Destination bucket (overrides TICKSTASH_BUCKET).
    #[arg(long)]
    pub bucket: Option<String>,

    /// Object-store endpoint (overrides TICKSTASH_STORAGE_ENDPOINT).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Collect locally without uploading artifacts.
    #[arg(long, default_value_t = false)]
    pub skip_upload: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show entities for this ticker.
    #[arg(long)]
    pub ticker: Option<String>,
}
