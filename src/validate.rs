use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{LiquidityPool, RawPool};

/// How strictly incoming feed records are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Fill gaps with neutral values and keep the record, the way the
    /// dashboard has always behaved. A missing `liquidity_locked` becomes
    /// NaN and propagates into the liquidity totals.
    #[default]
    Permissive,
    /// Drop records with missing or out-of-range fields and report them.
    Strict,
}

/// Why a record was left out of a dataset.
#[derive(Debug, Clone, PartialEq, Error, Serialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordIssue {
    #[error("record is not decodable: {message}")]
    Undecodable { message: String },

    #[error("missing field `{field}`")]
    MissingField { field: String },

    #[error("`liquidity_locked` is {value}, expected a finite non-negative number")]
    InvalidLiquidity { value: f64 },

    #[error("metrics record is not an object")]
    NotAnObject,
}

/// A record dropped during validation.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DroppedRecord {
    /// Position in the pools array, or symbol in the core mapping.
    pub key: String,
    pub issue: RecordIssue,
}

/// Pools accepted into the dataset plus what was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct PoolSet {
    pub pools: Vec<LiquidityPool>,
    pub dropped: Vec<DroppedRecord>,
}

/// Decode and check the raw pools array.
pub fn parse_pools(values: Vec<Value>, mode: ValidationMode) -> PoolSet {
    let mut set = PoolSet::default();

    for (index, value) in values.into_iter().enumerate() {
        let outcome = serde_json::from_value::<RawPool>(value)
            .map_err(|e| RecordIssue::Undecodable {
                message: e.to_string(),
            })
            .and_then(|raw| check_pool(raw, mode));

        match outcome {
            Ok(pool) => set.pools.push(pool),
            Err(issue) => {
                tracing::warn!(index, %issue, "dropping pool record");
                set.dropped.push(DroppedRecord {
                    key: index.to_string(),
                    issue,
                });
            }
        }
    }

    set
}

fn check_pool(raw: RawPool, mode: ValidationMode) -> Result<LiquidityPool, RecordIssue> {
    match mode {
        ValidationMode::Permissive => Ok(LiquidityPool {
            identifier: raw.identifier.unwrap_or_default(),
            chain: raw.chain.unwrap_or_default(),
            pool_tokens: raw.pool_tokens.unwrap_or_default(),
            liquidity_locked: raw.liquidity_locked.unwrap_or(f64::NAN),
            apy: raw.apy.unwrap_or(Value::Null),
            pair_link: raw.pair_link.unwrap_or_default(),
        }),
        ValidationMode::Strict => {
            let identifier = raw.identifier.ok_or_else(|| missing("identifier"))?;
            let chain = raw.chain.ok_or_else(|| missing("chain"))?;
            let liquidity_locked = raw.liquidity_locked.ok_or_else(|| missing("liquidity_locked"))?;
            if !liquidity_locked.is_finite() || liquidity_locked < 0.0 {
                return Err(RecordIssue::InvalidLiquidity {
                    value: liquidity_locked,
                });
            }
            Ok(LiquidityPool {
                identifier,
                chain,
                pool_tokens: raw.pool_tokens.unwrap_or_default(),
                liquidity_locked,
                apy: raw.apy.unwrap_or(Value::Null),
                pair_link: raw.pair_link.unwrap_or_default(),
            })
        }
    }
}

fn missing(field: &str) -> RecordIssue {
    RecordIssue::MissingField {
        field: field.to_string(),
    }
}
