//! Daily returns and annualized volatility.

/// Approximate number of trading sessions in a year.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Fractional change between consecutive closes.
///
/// Position 0 has no predecessor and is `None`; so is any position whose
/// change is not finite (a zero previous close).
pub fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(closes.windows(2).map(|w| pct_change(w[0], w[1])));
    out
}

/// `to / from - 1`, or `None` when that is not a finite number.
pub fn pct_change(from: f64, to: f64) -> Option<f64> {
    let r = to / from - 1.0;
    r.is_finite().then_some(r)
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Standard deviation of the defined returns scaled by √252, in percent.
pub fn annualized_volatility(returns: &[Option<f64>]) -> Option<f64> {
    let defined: Vec<f64> = returns.iter().flatten().copied().collect();
    sample_std_dev(&defined).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
}
