/// Round a monetary amount to 2 decimal places for display.
///
/// Totals are accumulated at full precision; rounding happens only at the
/// edge, so per-line rounding error never compounds across a summary.
pub fn round_display(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format an amount for display, e.g. `42.5` -> `"42.50"`.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", round_display(amount))
}
