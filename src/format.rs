use serde_json::Value;

/// Round to two decimal places.
pub fn round_to_2_decimals(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Express a dollar amount in billions, three decimal places.
pub fn round_to_billions(x: f64) -> f64 {
    (x / 1_000_000_000.0 * 1000.0).round() / 1000.0
}

/// Express a dollar amount in millions, one decimal place.
pub fn round_to_millions(x: f64) -> f64 {
    (x / 1_000_000.0 * 10.0).round() / 10.0
}

/// Collapse a raw APY value from the pools feed into a usable number.
///
/// The feed reports APY as a JSON number most of the time, but also as the
/// string `"Infinity"`, `null`, or omits it. Every non-finite or unparseable
/// case maps to `0.0`. Numeric strings (`"12.5"`) are read as numbers.
pub fn sanitize_apy(apy: Option<&Value>) -> f64 {
    let value = match apy {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Render a number the way the dashboard prints it: shortest form, no
/// trailing `.0` on integers.
pub fn display_number(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else {
        format!("{x}")
    }
}

/// Render an optional statistic, `n/a` when absent.
pub fn display_opt(x: Option<f64>) -> String {
    x.map_or_else(|| "n/a".to_string(), display_number)
}
