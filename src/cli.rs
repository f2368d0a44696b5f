use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_CORE_URL, DEFAULT_POOLS_URL, DEFAULT_TIMEOUT_SECS};
use crate::view::{SortMode, Tab};

/// Fraxlytics: global state dashboard for Frax: collateral, core asset
/// metrics, and liquidity pools.
#[derive(Parser)]
#[command(name = "fraxlytics", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Log fetch and validation details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct SourceArgs {
    /// Combined-data endpoint (collateral + core metrics)
    #[arg(long, env = "FRAXLYTICS_CORE_URL", default_value = DEFAULT_CORE_URL, global = true)]
    pub core_url: String,

    /// Liquidity pools endpoint
    #[arg(long, env = "FRAXLYTICS_POOLS_URL", default_value = DEFAULT_POOLS_URL, global = true)]
    pub pools_url: String,

    /// HTTP timeout per request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,

    /// Drop malformed records instead of filling gaps
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch both datasets and render the dashboard
    Dashboard {
        /// Which view to show below the collateral banner
        #[arg(long, value_enum, default_value_t = Tab::Core)]
        tab: Tab,

        /// Case-insensitive substring to match against pool identifiers
        #[arg(long, default_value = "")]
        search: String,

        /// Only show pools on this chain (exact match)
        #[arg(long)]
        chain: Option<String>,

        /// Pool ordering
        #[arg(long, value_enum, default_value_t = SortMode::Default)]
        sort: SortMode,

        /// Reveal this many extra pages of pools
        #[arg(long, default_value = "0")]
        show_more: u32,

        /// Print the view model as JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// List the chains present in the pools feed, first-seen order
    Chains,

    /// Output the JSON schemas of the view model types
    Schema,
}
