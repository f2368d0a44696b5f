use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fraxlytics::config::DashboardConfig;
use fraxlytics::view::ViewState;
use fraxlytics::{chains, cli, dashboard, schema};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "fraxlytics=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = || {
        DashboardConfig::new(
            &cli.source.core_url,
            &cli.source.pools_url,
            cli.source.timeout_secs,
            cli.source.strict,
        )
        .context("invalid configuration")
    };

    match &cli.command {
        cli::Command::Dashboard {
            tab,
            search,
            chain,
            sort,
            show_more,
            json,
        } => {
            let state = (0..*show_more).fold(
                ViewState::default()
                    .with_tab(*tab)
                    .with_chain(chain.clone())
                    .with_search(search.as_str())
                    .with_sort(*sort),
                |state, _| state.show_more(),
            );
            dashboard::run(&config()?, &state, *json)
        }
        cli::Command::Chains => chains::run(&config()?),
        cli::Command::Schema => schema::run(),
    }
}
