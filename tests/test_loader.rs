#![cfg(feature = "full")]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use fraxlytics::fetch::{self, DashboardSource, DatasetState, FetchError};
use fraxlytics::model::CombinedData;
use fraxlytics::validate::ValidationMode;

// ── Mock source ─────────────────────────────────────────────────────

/// Serves canned payloads, optionally after a delay or as a failure.
struct MockSource {
    combined: Option<Value>,
    pools: Option<Value>,
    combined_delay: Duration,
    pools_delay: Duration,
}

impl MockSource {
    fn healthy() -> Self {
        MockSource {
            combined: Some(combined_payload()),
            pools: Some(pools_payload()),
            combined_delay: Duration::ZERO,
            pools_delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl DashboardSource for MockSource {
    async fn combined(&self) -> Result<CombinedData, FetchError> {
        tokio::time::sleep(self.combined_delay).await;
        let body = self.combined.clone().ok_or(FetchError::Status {
            url: "mock://combined".into(),
            status: 503,
        })?;
        serde_json::from_value(body).map_err(|source| FetchError::Decode {
            url: "mock://combined".into(),
            source,
        })
    }

    async fn pools(&self) -> Result<Vec<Value>, FetchError> {
        tokio::time::sleep(self.pools_delay).await;
        let body = self.pools.clone().ok_or(FetchError::Status {
            url: "mock://pools".into(),
            status: 502,
        })?;
        serde_json::from_value(body).map_err(|source| FetchError::Decode {
            url: "mock://pools".into(),
            source,
        })
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn combined_payload() -> Value {
    json!({
        "protocol": {
            "collateral": {
                "blockNum": 19876543,
                "ratio": 0.9125,
                "decentralization_ratio": 0.8733,
                "total_dollar_value": 1234567890.12
            }
        },
        "core": {
            "frax": { "price": 0.99876, "supply": 648000000.125, "market_cap": 647203201.5 },
            "vefxs": { "price": 0.0 },
            "fxs": { "price": 7.456789 }
        }
    })
}

fn pools_payload() -> Value {
    json!([
        { "identifier": "Curve FRAX/USDC", "chain": "ethereum", "pool_tokens": ["FRAX", "USDC"],
          "liquidity_locked": 1000.0, "apy": 4.2, "pairLink": "https://curve.fi" },
        { "identifier": "Camelot FXS/ETH", "chain": "arbitrum", "pool_tokens": ["FXS", "ETH"],
          "liquidity_locked": 250.0, "apy": "Infinity", "pairLink": "https://camelot.exchange" },
        { "identifier": "Broken", "chain": "ethereum" }
    ])
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_both_datasets_load() {
    let handle = fetch::load(Arc::new(MockSource::healthy()), ValidationMode::Permissive);
    let (core, pools) = handle.settled().await;

    let core = core.ready().cloned().expect("core ready");
    assert_eq!(core.collateral.block_number, 19876543);
    assert_eq!(core.core.display_order(), vec!["frax", "fxs"]);
    assert_eq!(core.core.assets["frax"]["price"], json!(1.0));

    let pools = pools.ready().cloned().expect("pools ready");
    assert_eq!(pools.pools.len(), 3);
    assert_eq!(pools.chains, vec!["ethereum", "arbitrum"]);
    assert!(pools.dropped.is_empty());
}

#[tokio::test]
async fn test_strict_mode_reports_dropped_pools() {
    let handle = fetch::load(Arc::new(MockSource::healthy()), ValidationMode::Strict);
    let (_, pools) = handle.settled().await;

    let pools = pools.ready().cloned().expect("pools ready");
    assert_eq!(pools.pools.len(), 2);
    assert_eq!(pools.dropped.len(), 1);
    assert_eq!(pools.dropped[0].key, "2");
}

#[tokio::test]
async fn test_failure_is_per_dataset() {
    let source = MockSource {
        pools: None,
        ..MockSource::healthy()
    };
    let handle = fetch::load(Arc::new(source), ValidationMode::Permissive);
    let (core, pools) = handle.settled().await;

    assert!(core.ready().is_some());
    match pools {
        DatasetState::Failed(msg) => assert!(msg.contains("502"), "unexpected message: {msg}"),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_payload_fails_its_dataset_only() {
    let source = MockSource {
        combined: Some(json!({ "core": {} })),
        ..MockSource::healthy()
    };
    let handle = fetch::load(Arc::new(source), ValidationMode::Permissive);
    let (core, pools) = handle.settled().await;

    assert!(matches!(core, DatasetState::Failed(_)));
    assert!(pools.ready().is_some());
}

#[tokio::test]
async fn test_datasets_settle_independently() {
    let source = MockSource {
        pools_delay: Duration::from_secs(30),
        ..MockSource::healthy()
    };
    let handle = fetch::load(Arc::new(source), ValidationMode::Permissive);

    let mut core_rx = handle.subscribe_core();
    let core = fetch::wait_settled(&mut core_rx).await;
    assert!(core.ready().is_some());
    assert!(handle.pools_state().is_loading());

    handle.cancel();
    let mut pools_rx = handle.subscribe_pools();
    let pools = fetch::wait_settled(&mut pools_rx).await;
    assert!(matches!(pools, DatasetState::Cancelled));
    // Finished datasets keep their result after cancel.
    assert!(handle.core_state().ready().is_some());
}

#[tokio::test]
async fn test_dropping_handle_discards_results() {
    let source = MockSource {
        combined_delay: Duration::from_secs(30),
        pools_delay: Duration::from_secs(30),
        ..MockSource::healthy()
    };
    let handle = fetch::load(Arc::new(source), ValidationMode::Permissive);
    let mut core_rx = handle.subscribe_core();
    drop(handle);

    let core = fetch::wait_settled(&mut core_rx).await;
    assert!(matches!(core, DatasetState::Cancelled));
}
