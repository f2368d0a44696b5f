use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;

use crate::analytics::summarize;
use crate::config::DashboardConfig;
use crate::fetch::{self, CoreDataset, DatasetState, HttpSource, LoadHandle, PoolDataset};
use crate::model::{AnalyticsSummary, CollateralSnapshot};
use crate::pools::{PoolPage, pool_page};
use crate::render;
use crate::validate::DroppedRecord;
use crate::view::{Tab, ViewState};

/// Entry point for the `dashboard` command.
pub fn run(config: &DashboardConfig, state: &ViewState, json: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    rt.block_on(run_async(config, state, json))
}

async fn run_async(config: &DashboardConfig, state: &ViewState, json: bool) -> Result<()> {
    let source = HttpSource::new(config).context("creating HTTP client")?;
    let handle = fetch::load(Arc::new(source), config.mode);

    let (core, pools) = if json {
        handle.settled().await
    } else {
        settle_with_spinners(handle).await
    };

    if json {
        let view = DashboardJson::build(state, &core, &pools);
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(state, &core, &pools));
    }
    Ok(())
}

/// One spinner per dataset; each clears as soon as its own fetch settles.
async fn settle_with_spinners(
    handle: LoadHandle,
) -> (DatasetState<CoreDataset>, DatasetState<PoolDataset>) {
    let multi = MultiProgress::new();
    let core_pb = multi.add(spinner("Loading Collateral Data..."));
    let pools_pb = multi.add(spinner("Loading Liquid Staking Data..."));

    let mut core_rx = handle.subscribe_core();
    let mut pools_rx = handle.subscribe_pools();

    tokio::join!(
        async {
            let state = fetch::wait_settled(&mut core_rx).await;
            core_pb.finish_and_clear();
            state
        },
        async {
            let state = fetch::wait_settled(&mut pools_rx).await;
            pools_pb.finish_and_clear();
            state
        },
    )
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ── Text output ──────────────────────────────────────────────────────

fn render_text(
    state: &ViewState,
    core: &DatasetState<CoreDataset>,
    pools: &DatasetState<PoolDataset>,
) -> String {
    let mut out = String::new();

    match core {
        DatasetState::Ready(data) => {
            out.push_str(&render::render_collateral(&data.collateral));
            out.push_str(&fetched_line(&data.fetched_at));
        }
        other => out.push_str(&unavailable("Collateral data", other)),
    }
    out.push('\n');

    match state.tab {
        Tab::Core => match core {
            DatasetState::Ready(data) => out.push_str(&render::render_core_cards(&data.core)),
            other => out.push_str(&unavailable("Core data", other)),
        },
        Tab::Liquidity => match pools {
            DatasetState::Ready(data) => {
                out.push_str(&render::render_analytics(&summarize(&data.pools)));
                out.push('\n');
                out.push_str(&render::render_pool_page(&pool_page(&data.pools, state)));
                out.push_str(&fetched_line(&data.fetched_at));
            }
            other => out.push_str(&unavailable("Liquid staking data", other)),
        },
    }

    out
}

fn fetched_line(at: &DateTime<Utc>) -> String {
    format!("  Fetched at {}\n", at.format("%Y-%m-%d %H:%M:%S UTC"))
}

fn unavailable<T>(what: &str, state: &DatasetState<T>) -> String {
    format!("{what} unavailable: {}\n", reason(state))
}

fn reason<T>(state: &DatasetState<T>) -> String {
    match state {
        DatasetState::Loading => "still loading".to_string(),
        DatasetState::Ready(_) => "ready".to_string(),
        DatasetState::Failed(msg) => msg.clone(),
        DatasetState::Cancelled => "cancelled".to_string(),
    }
}

// ── JSON output ──────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Section<T> {
    Ready { data: T },
    Unavailable { reason: String },
}

impl<T> Section<T> {
    fn from_state<'s, D>(state: &'s DatasetState<D>, f: impl FnOnce(&'s D) -> T) -> Self {
        match state.ready() {
            Some(data) => Section::Ready {
                data: f(data.as_ref()),
            },
            None => Section::Unavailable {
                reason: reason(state),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CoreJson<'a> {
    fetched_at: String,
    order: Vec<&'a str>,
    assets: &'a serde_json::Map<String, Value>,
    dropped: &'a [DroppedRecord],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LiquidityJson<'a> {
    fetched_at: String,
    chains: &'a [String],
    analytics: AnalyticsSummary,
    page: PoolPage<'a>,
    dropped: &'a [DroppedRecord],
}

#[derive(Serialize)]
struct DashboardJson<'a> {
    state: &'a ViewState,
    collateral: Section<&'a CollateralSnapshot>,
    core: Section<CoreJson<'a>>,
    liquidity: Section<LiquidityJson<'a>>,
}

impl<'a> DashboardJson<'a> {
    fn build(
        state: &'a ViewState,
        core: &'a DatasetState<CoreDataset>,
        pools: &'a DatasetState<PoolDataset>,
    ) -> Self {
        DashboardJson {
            state,
            collateral: Section::from_state(core, |d| &d.collateral),
            core: Section::from_state(core, |d| CoreJson {
                fetched_at: d.fetched_at.to_rfc3339(),
                order: d.core.display_order(),
                assets: &d.core.assets,
                dropped: &d.core.dropped,
            }),
            liquidity: Section::from_state(pools, |d| LiquidityJson {
                fetched_at: d.fetched_at.to_rfc3339(),
                chains: &d.chains,
                analytics: summarize(&d.pools),
                page: pool_page(&d.pools, state),
                dropped: &d.dropped,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LiquidityPool;
    use crate::normalize::normalize_core;
    use crate::validate::ValidationMode;
    use chrono::TimeZone;
    use serde_json::json;

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn ready_core() -> DatasetState<CoreDataset> {
        let raw = json!({ "frax": { "price": 0.999, "supply": 1000.0, "market_cap": 999.0 } });
        let serde_json::Value::Object(raw) = raw else {
            unreachable!()
        };
        DatasetState::Ready(Arc::new(CoreDataset {
            collateral: CollateralSnapshot {
                block_number: 19_000_000,
                ratio: 0.9,
                decentralization_ratio: 0.25,
                total_dollar_value: 1_500_000_000.0,
            },
            core: normalize_core(&raw, ValidationMode::Permissive),
            fetched_at: fetched_at(),
        }))
    }

    fn ready_pools() -> DatasetState<PoolDataset> {
        let pools = vec![LiquidityPool {
            identifier: "Frax-USDC".into(),
            chain: "ethereum".into(),
            pool_tokens: vec!["FRAX".into(), "USDC".into()],
            liquidity_locked: 2_000_000.0,
            apy: json!(4.5),
            pair_link: "https://app.frax.finance".into(),
        }];
        DatasetState::Ready(Arc::new(PoolDataset {
            chains: vec!["ethereum".into()],
            pools,
            dropped: Vec::new(),
            fetched_at: fetched_at(),
        }))
    }

    #[test]
    fn test_failed_pools_render_unavailable() {
        let state = ViewState::default().with_tab(Tab::Liquidity);
        let pools = DatasetState::Failed("HTTP 503 from pools".into());
        let text = render_text(&state, &ready_core(), &pools);

        assert!(text.contains("── Collateral"));
        assert!(text.contains("Fetched at 2024-05-01 12:30:00 UTC"));
        assert!(text.contains("Liquid staking data unavailable: HTTP 503 from pools"));
        assert!(!text.contains("── Pools"));
    }

    #[test]
    fn test_cancelled_core_renders_unavailable() {
        let state = ViewState::default();
        let text = render_text(&state, &DatasetState::Cancelled, &ready_pools());

        assert!(text.contains("Collateral data unavailable: cancelled"));
        assert!(text.contains("Core data unavailable: cancelled"));
    }

    #[test]
    fn test_json_sections_are_tagged() {
        let state = ViewState::default();
        let core = ready_core();
        let pools = DatasetState::Failed("connection refused".into());
        let view = serde_json::to_value(DashboardJson::build(&state, &core, &pools)).unwrap();

        assert_eq!(view["collateral"]["status"], "ready");
        assert_eq!(view["collateral"]["data"]["blockNum"], 19_000_000);
        assert_eq!(view["core"]["status"], "ready");
        assert_eq!(view["core"]["data"]["order"], json!(["frax"]));
        assert_eq!(view["core"]["data"]["fetchedAt"], "2024-05-01T12:30:00+00:00");
        assert_eq!(view["liquidity"]["status"], "unavailable");
        assert_eq!(view["liquidity"]["reason"], "connection refused");
    }

    #[test]
    fn test_json_liquidity_ready() {
        let state = ViewState::default().with_tab(Tab::Liquidity);
        let core = DatasetState::Failed("timeout".into());
        let pools = ready_pools();
        let view = serde_json::to_value(DashboardJson::build(&state, &core, &pools)).unwrap();

        assert_eq!(view["collateral"]["status"], "unavailable");
        assert_eq!(view["core"]["reason"], "timeout");
        assert_eq!(view["liquidity"]["data"]["chains"], json!(["ethereum"]));
        assert_eq!(view["liquidity"]["data"]["page"]["totalMatches"], 1);
        assert_eq!(view["liquidity"]["data"]["analytics"]["totalPools"], 1);
    }
}
