use schemars::schema_for;

use crate::model::{AnalyticsSummary, CollateralSnapshot, LiquidityPool};
use crate::validate::DroppedRecord;
use crate::view::{ViewAction, ViewState};

/// JSON Schemas for every type a view controller exchanges with the
/// pipeline, keyed by type name.
pub fn get_schema_json() -> String {
    let schemas = serde_json::json!({
        "ViewState": schema_for!(ViewState),
        "ViewAction": schema_for!(ViewAction),
        "LiquidityPool": schema_for!(LiquidityPool),
        "CollateralSnapshot": schema_for!(CollateralSnapshot),
        "AnalyticsSummary": schema_for!(AnalyticsSummary),
        "DroppedRecord": schema_for!(DroppedRecord),
    });
    serde_json::to_string_pretty(&schemas).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("Serialization error: {}", e) }).to_string()
    })
}

/// Print the schemas for the `schema` command.
pub fn run() -> anyhow::Result<()> {
    println!("{}", get_schema_json());
    Ok(())
}
