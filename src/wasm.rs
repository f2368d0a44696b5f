use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::analytics::summarize;
use crate::model::CoreAssetMetrics;
use crate::normalize::normalize_core;
use crate::pools::{available_chains, pool_page};
use crate::validate::{PoolSet, ValidationMode, parse_pools};
use crate::view::{ViewAction, ViewState};

fn mode(strict: bool) -> ValidationMode {
    if strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Permissive
    }
}

fn parse_error(e: serde_json::Error) -> String {
    serde_json::json!({ "error": format!("JSON parse error: {}", e) }).to_string()
}

fn pool_set(pools_json: &str, strict: bool) -> Result<PoolSet, String> {
    let values: Vec<Value> = serde_json::from_str(pools_json).map_err(parse_error)?;
    Ok(parse_pools(values, mode(strict)))
}

#[wasm_bindgen]
pub fn normalize_core_json(json: &str, strict: bool) -> String {
    let raw: CoreAssetMetrics = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => return parse_error(e),
    };
    let core = normalize_core(&raw, mode(strict));
    serde_json::json!({
        "order": core.display_order(),
        "assets": core.assets,
        "dropped": core.dropped,
    })
    .to_string()
}

#[wasm_bindgen]
pub fn pool_page_json(pools_json: &str, state_json: &str, strict: bool) -> String {
    let set = match pool_set(pools_json, strict) {
        Ok(set) => set,
        Err(e) => return e,
    };
    let state: ViewState = match serde_json::from_str(state_json) {
        Ok(state) => state,
        Err(e) => return parse_error(e),
    };
    serde_json::json!({
        "page": pool_page(&set.pools, &state),
        "dropped": set.dropped,
    })
    .to_string()
}

#[wasm_bindgen]
pub fn pool_analytics_json(pools_json: &str, strict: bool) -> String {
    match pool_set(pools_json, strict) {
        Ok(set) => serde_json::json!(summarize(&set.pools)).to_string(),
        Err(e) => e,
    }
}

#[wasm_bindgen]
pub fn available_chains_json(pools_json: &str) -> String {
    match pool_set(pools_json, false) {
        Ok(set) => serde_json::json!(available_chains(&set.pools)).to_string(),
        Err(e) => e,
    }
}

/// Apply one UI action to a view state, both as JS objects.
#[wasm_bindgen]
pub fn reduce_view_state(state: JsValue, action: JsValue) -> Result<JsValue, JsValue> {
    let state: ViewState = if state.is_undefined() || state.is_null() {
        ViewState::default()
    } else {
        serde_wasm_bindgen::from_value(state)?
    };
    let action: ViewAction = serde_wasm_bindgen::from_value(action)?;
    Ok(serde_wasm_bindgen::to_value(&state.apply(action))?)
}

#[wasm_bindgen]
pub fn get_schema() -> String {
    crate::schema::get_schema_json()
}
