use serde_json::{Map, Number, Value};

use crate::format::round_to_2_decimals;
use crate::model::CoreAssetMetrics;
use crate::validate::{DroppedRecord, RecordIssue, ValidationMode};

/// Symbols shown ahead of every other asset, in this order.
pub const FEATURED_ASSETS: [&str; 3] = ["frax", "fxs", "frxeth"];

/// Vote-escrow token: kept in the data, never listed as a card.
pub const HIDDEN_ASSET: &str = "vefxs";

/// Core metrics after rounding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedCore {
    pub assets: CoreAssetMetrics,
    pub dropped: Vec<DroppedRecord>,
}

impl NormalizedCore {
    /// Symbols in card order: featured first, hidden one skipped, the rest
    /// in payload order.
    pub fn display_order(&self) -> Vec<&str> {
        display_order(&self.assets)
    }

    pub fn get(&self, symbol: &str) -> Option<&Value> {
        self.assets.get(symbol)
    }
}

/// Round every numeric field of every asset record to two decimals.
///
/// Non-numeric fields are cloned untouched. In permissive mode an asset
/// whose record is not an object is carried over as-is; in strict mode it is
/// dropped and reported.
pub fn normalize_core(raw: &CoreAssetMetrics, mode: ValidationMode) -> NormalizedCore {
    let mut out = NormalizedCore::default();

    for (symbol, record) in raw {
        match record {
            Value::Object(fields) => {
                out.assets
                    .insert(symbol.clone(), Value::Object(round_fields(fields)));
            }
            other => match mode {
                ValidationMode::Permissive => {
                    out.assets.insert(symbol.clone(), other.clone());
                }
                ValidationMode::Strict => {
                    tracing::warn!(%symbol, "dropping core metrics record");
                    out.dropped.push(DroppedRecord {
                        key: symbol.clone(),
                        issue: RecordIssue::NotAnObject,
                    });
                }
            },
        }
    }

    out
}

fn round_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Value::Number(n) => Value::Number(round_number(n)),
                other => other.clone(),
            };
            (name.clone(), value)
        })
        .collect()
}

fn round_number(n: &Number) -> Number {
    // Integers are already exact at two decimals.
    if !n.is_f64() {
        return n.clone();
    }
    n.as_f64()
        .map(round_to_2_decimals)
        .and_then(Number::from_f64)
        .unwrap_or_else(|| n.clone())
}

/// Card order over any metrics mapping.
pub fn display_order(assets: &CoreAssetMetrics) -> Vec<&str> {
    let featured = FEATURED_ASSETS
        .iter()
        .copied()
        .filter(|symbol| assets.contains_key(*symbol));
    let rest = assets
        .keys()
        .map(String::as_str)
        .filter(|symbol| *symbol != HIDDEN_ASSET && !FEATURED_ASSETS.contains(symbol));
    featured.chain(rest).collect()
}
