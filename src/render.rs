use serde_json::Value;

use crate::format::{
    display_number, display_opt, round_to_2_decimals, round_to_billions, round_to_millions,
};
use crate::model::{AnalyticsSummary, CollateralSnapshot, PoolView};
use crate::normalize::NormalizedCore;
use crate::pools::PoolPage;

/// Block, credit ratio, decentralization ratio, and collateral value.
pub fn render_collateral(c: &CollateralSnapshot) -> String {
    let mut out = String::new();
    out.push_str("── Collateral ──────────────────────────────────────\n");
    out.push_str(&format!("  Block Number                {}\n", c.block_number));
    out.push_str(&format!("  Credit Ratio (CR)           {:.3}\n", c.ratio));
    out.push_str(&format!(
        "  Decentralization Ratio (DR) {:.2}\n",
        c.decentralization_ratio
    ));
    out.push_str(&format!(
        "  Total Dollar Value          ${}B\n",
        display_number(round_to_billions(c.total_dollar_value))
    ));
    out
}

/// One card per asset in display order.
pub fn render_core_cards(core: &NormalizedCore) -> String {
    let mut out = String::new();
    out.push_str("── Core Data ───────────────────────────────────────\n");
    for symbol in core.display_order() {
        let record = core.get(symbol);
        let field = |name: &str| record.and_then(|r| r.get(name)).and_then(Value::as_f64);

        out.push_str(&format!("[{symbol}]\n"));
        let price = field("price").map(|p| format!("${}", display_number(p)));
        let supply = field("supply").map(display_number);
        let market_cap = field("market_cap")
            .map(|m| format!("${}M", display_number(round_to_millions(m))));

        out.push_str(&format!("  Price:      {}\n", or_dash(price)));
        out.push_str(&format!("  Supply:     {}\n", or_dash(supply)));
        out.push_str(&format!("  Market Cap: {}\n", or_dash(market_cap)));
    }
    out
}

fn or_dash(x: Option<String>) -> String {
    x.unwrap_or_else(|| "-".to_string())
}

pub fn render_analytics(a: &AnalyticsSummary) -> String {
    let mut out = String::new();
    out.push_str("── Liquid Staking Analytics ────────────────────────\n");
    out.push_str(&format!(
        "  Total Liquidity Locked  ${}B\n",
        display_number(round_to_billions(a.total_liquidity_locked))
    ));
    out.push_str(&format!(
        "  Highest APY             {}  {}\n",
        percent(a.highest_apy),
        a.highest_apy_pair.as_deref().unwrap_or("")
    ));
    out.push_str(&format!(
        "  Most Liquidity Locked   {}  {}\n",
        billions(a.most_liquidity_locked),
        a.most_liquidity_locked_pair.as_deref().unwrap_or("")
    ));
    out.push_str(&format!("  Average APY             {}\n", percent(a.average_apy)));
    out.push_str(&format!("  Total Pools             {}\n", a.total_pools));
    out
}

fn billions(x: Option<f64>) -> String {
    match x {
        Some(v) => format!("${}B", display_number(round_to_billions(v))),
        None => display_opt(None),
    }
}

fn percent(x: Option<f64>) -> String {
    match x {
        Some(v) => format!("{}%", display_number(round_to_2_decimals(v))),
        None => display_opt(None),
    }
}

/// Pool cards for the current window, then a "show more" hint if any.
pub fn render_pool_page(page: &PoolPage<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "── Pools ({} of {}) ─────────────────────────────────\n",
        page.pools.len(),
        page.total_matches
    ));
    if page.pools.is_empty() {
        out.push_str("  No pools match.\n");
    }
    for view in &page.pools {
        out.push_str(&render_pool_card(view));
    }
    if page.has_more {
        out.push_str("  … more pools available (--show-more)\n");
    }
    out
}

pub fn render_pool_card(view: &PoolView<'_>) -> String {
    let pool = view.pool;
    let mut out = String::new();
    out.push_str(&format!("[{}]\n", pool.identifier));
    out.push_str(&format!("  Chain:            {}\n", pool.chain));
    out.push_str(&format!("  Pool Tokens:      {}\n", pool.pool_tokens.join(", ")));
    out.push_str(&format!(
        "  Liquidity Locked: ${}\n",
        display_number(round_to_2_decimals(pool.liquidity_locked))
    ));
    out.push_str(&format!(
        "  APY:              {}%\n",
        display_number(round_to_2_decimals(view.sanitized_apy))
    ));
    out.push_str(&format!("  Stake:            {}\n", pool.pair_link));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LiquidityPool;
    use crate::normalize::normalize_core;
    use crate::validate::ValidationMode;
    use serde_json::json;

    #[test]
    fn test_collateral_banner() {
        let text = render_collateral(&CollateralSnapshot {
            block_number: 19_000_000,
            ratio: 0.91234,
            decentralization_ratio: 0.5,
            total_dollar_value: 2_345_678_901.0,
        });
        assert!(text.contains("19000000"));
        assert!(text.contains("0.912"));
        assert!(text.contains("0.50"));
        assert!(text.contains("$2.346B"));
    }

    #[test]
    fn test_pool_card_uses_sanitized_apy() {
        let pool = LiquidityPool {
            identifier: "Curve FRAX/USDC".into(),
            chain: "ethereum".into(),
            pool_tokens: vec!["FRAX".into(), "USDC".into()],
            liquidity_locked: 1234.5678,
            apy: json!("Infinity"),
            pair_link: "https://curve.fi".into(),
        };
        let text = render_pool_card(&PoolView::from(&pool));
        assert!(text.contains("FRAX, USDC"));
        assert!(text.contains("$1234.57"));
        assert!(text.contains("APY:              0%"));
    }

    #[test]
    fn test_analytics_without_positive_apy() {
        let text = render_analytics(&AnalyticsSummary {
            total_liquidity_locked: 0.0,
            highest_apy: None,
            highest_apy_pair: None,
            most_liquidity_locked: None,
            most_liquidity_locked_pair: None,
            average_apy: None,
            total_pools: 0,
        });
        assert!(text.contains("Average APY             n/a"));
    }

    #[test]
    fn test_core_cards_order_and_fallback() {
        let raw = json!({
            "fpis": { "price": 0.5, "supply": 900.0, "market_cap": 450.0 },
            "vefxs": { "price": 1.0, "supply": 1.0, "market_cap": 1.0 },
            "frxeth": { "price": 3000.12, "supply": 10.0 },
            "frax": { "price": 0.99, "supply": 1000.0, "market_cap": 2_345_678_900.0 },
        });
        let Value::Object(raw) = raw else {
            unreachable!()
        };
        let core = normalize_core(&raw, ValidationMode::Permissive);
        let text = render_core_cards(&core);

        let positions: Vec<usize> = ["[frax]", "[frxeth]", "[fpis]"]
            .iter()
            .map(|card| text.find(card).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!text.contains("[vefxs]"));
        assert!(!text.contains("[fxs]"));

        assert!(text.contains("Market Cap: $2345.7M"));
        assert!(text.contains("Price:      $3000.12"));
        assert!(text.contains("Market Cap: -\n"));
    }
}
