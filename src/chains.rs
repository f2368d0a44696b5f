use anyhow::{Context, Result};

use crate::config::DashboardConfig;
use crate::fetch::{self, HttpSource};

/// Entry point for the `chains` command.
pub fn run(config: &DashboardConfig) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    rt.block_on(async {
        let source = HttpSource::new(config).context("creating HTTP client")?;
        let dataset = fetch::load_pools(&source, config.mode)
            .await
            .context("fetching liquidity pools")?;

        for chain in &dataset.chains {
            println!("{chain}");
        }
        Ok(())
    })
}
