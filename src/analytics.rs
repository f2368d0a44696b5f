use crate::model::{AnalyticsSummary, LiquidityPool};

/// Summary statistics over every pool, ignoring search, chain and paging.
///
/// Maxima are found with a left-to-right scan using strict `>`, so the
/// earliest pool wins a tie. The average APY only counts pools whose
/// sanitized APY is positive; with no such pool it is `None`. An empty list
/// yields zero totals and `None` everywhere else.
pub fn summarize(pools: &[LiquidityPool]) -> AnalyticsSummary {
    let total_liquidity_locked = pools.iter().map(|p| p.liquidity_locked).sum();

    let highest = first_max_by(pools, LiquidityPool::sanitized_apy);
    let most_liquid = first_max_by(pools, |p| p.liquidity_locked);

    let (positive_sum, positive_count) = pools
        .iter()
        .map(LiquidityPool::sanitized_apy)
        .filter(|apy| *apy > 0.0)
        .fold((0.0, 0usize), |(sum, n), apy| (sum + apy, n + 1));
    let average_apy = (positive_count > 0).then(|| positive_sum / positive_count as f64);

    AnalyticsSummary {
        total_liquidity_locked,
        highest_apy: highest.map(|(_, v)| v),
        highest_apy_pair: highest.map(|(p, _)| p.identifier.clone()),
        most_liquidity_locked: most_liquid.map(|(_, v)| v),
        most_liquidity_locked_pair: most_liquid.map(|(p, _)| p.identifier.clone()),
        average_apy,
        total_pools: pools.len(),
    }
}

fn first_max_by<F>(pools: &[LiquidityPool], key: F) -> Option<(&LiquidityPool, f64)>
where
    F: Fn(&LiquidityPool) -> f64,
{
    let mut iter = pools.iter();
    let first = iter.next()?;
    let mut best = (first, key(first));
    for pool in iter {
        let value = key(pool);
        if value > best.1 {
            best = (pool, value);
        }
    }
    Some(best)
}
