use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::model::{LiquidityPool, PoolView};
use crate::view::{SortMode, ViewState};

/// One window of the pool grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPage<'a> {
    pub pools: Vec<PoolView<'a>>,
    /// Pools matching search and chain before the window was applied.
    pub total_matches: usize,
    /// Whether a "show more" would reveal anything.
    pub has_more: bool,
}

/// Sanitize, filter and sort the pools for the given state, without
/// windowing.
pub fn filter_and_sort<'a>(pools: &'a [LiquidityPool], state: &ViewState) -> Vec<PoolView<'a>> {
    let needle = state.search.to_lowercase();

    let mut matched: Vec<PoolView<'a>> = pools
        .iter()
        .map(PoolView::from)
        .filter(|view| {
            let identifier_match = view.pool.identifier.to_lowercase().contains(&needle);
            let chain_match = state
                .chain
                .as_deref()
                .is_none_or(|chain| view.pool.chain == chain);
            identifier_match && chain_match
        })
        .collect();

    sort_pools(&mut matched, state.sort);
    matched
}

/// Stable sort by the selected mode. `Default` leaves the order alone.
pub fn sort_pools(pools: &mut [PoolView<'_>], mode: SortMode) {
    match mode {
        SortMode::Default => {}
        SortMode::HighestApy => pools.sort_by(|a, b| cmp_f64(b.sanitized_apy, a.sanitized_apy)),
        SortMode::LowestApy => pools.sort_by(|a, b| cmp_f64(a.sanitized_apy, b.sanitized_apy)),
        SortMode::HighestLiquidity => {
            pools.sort_by(|a, b| cmp_f64(b.pool.liquidity_locked, a.pool.liquidity_locked))
        }
        SortMode::LowestLiquidity => {
            pools.sort_by(|a, b| cmp_f64(a.pool.liquidity_locked, b.pool.liquidity_locked))
        }
    }
}

// Total order so a NaN liquidity (permissive mode) cannot break the sort;
// NaN ranks above every number. Adding 0.0 folds -0.0 into 0.0 so the two
// stay a tie.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// Full pipeline: sanitize, filter, sort, then cut to `state.page_size`.
pub fn pool_page<'a>(pools: &'a [LiquidityPool], state: &ViewState) -> PoolPage<'a> {
    let mut matched = filter_and_sort(pools, state);
    let total_matches = matched.len();
    matched.truncate(state.page_size);

    PoolPage {
        pools: matched,
        total_matches,
        has_more: total_matches > state.page_size,
    }
}

/// Distinct chains in the order they first appear.
pub fn available_chains(pools: &[LiquidityPool]) -> Vec<String> {
    let mut seen = HashSet::new();
    pools
        .iter()
        .filter(|pool| seen.insert(pool.chain.as_str()))
        .map(|pool| pool.chain.clone())
        .collect()
}
