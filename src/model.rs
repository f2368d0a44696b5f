use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format::sanitize_apy;

/// Asset symbol → metrics record, in payload order.
pub type CoreAssetMetrics = Map<String, Value>;

// ── Combined-data payload ────────────────────────────────────────────

/// Body of the combined-data endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CombinedData {
    pub protocol: ProtocolData,
    pub core: CoreAssetMetrics,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolData {
    pub collateral: CollateralSnapshot,
}

/// Protocol-wide solvency metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CollateralSnapshot {
    #[serde(rename = "blockNum")]
    pub block_number: u64,
    /// Credit ratio, expected in 0..=1.
    pub ratio: f64,
    pub decentralization_ratio: f64,
    pub total_dollar_value: f64,
}

// ── Pools payload ────────────────────────────────────────────────────

/// One entry of the pools feed as it arrives on the wire.
///
/// Every field is optional so a record with gaps still deserializes; whether
/// the gaps are tolerated is decided by [`crate::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPool {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub pool_tokens: Option<Vec<String>>,
    #[serde(default)]
    pub liquidity_locked: Option<f64>,
    #[serde(default)]
    pub apy: Option<Value>,
    #[serde(default, rename = "pairLink")]
    pub pair_link: Option<String>,
}

/// A liquidity pool accepted into the dataset. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LiquidityPool {
    pub identifier: String,
    pub chain: String,
    pub pool_tokens: Vec<String>,
    pub liquidity_locked: f64,
    /// APY exactly as reported, sentinels included.
    pub apy: Value,
    #[serde(rename = "pairLink")]
    pub pair_link: String,
}

impl LiquidityPool {
    /// APY with sentinels collapsed to zero.
    pub fn sanitized_apy(&self) -> f64 {
        sanitize_apy(Some(&self.apy))
    }
}

/// A pool as the grid shows it: borrowed record plus sanitized APY.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoolView<'a> {
    #[serde(flatten)]
    pub pool: &'a LiquidityPool,
    #[serde(rename = "sanitizedApy")]
    pub sanitized_apy: f64,
}

impl<'a> From<&'a LiquidityPool> for PoolView<'a> {
    fn from(pool: &'a LiquidityPool) -> Self {
        PoolView {
            pool,
            sanitized_apy: pool.sanitized_apy(),
        }
    }
}

// ── Derived ──────────────────────────────────────────────────────────

/// Summary statistics over the full pool list.
///
/// The maxima, their pair identifiers, and the average are `None` when no
/// pool qualifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_liquidity_locked: f64,
    #[serde(rename = "highestAPY")]
    pub highest_apy: Option<f64>,
    #[serde(rename = "highestAPYPair")]
    pub highest_apy_pair: Option<String>,
    pub most_liquidity_locked: Option<f64>,
    pub most_liquidity_locked_pair: Option<String>,
    #[serde(rename = "averageAPY")]
    pub average_apy: Option<f64>,
    pub total_pools: usize,
}
