//! BUY / SELL / HOLD classification from the distance to recent extremes.
//!
//! Two rules are available:
//!
//! - [`SignalRule::PeakOnly`] (default) compares the last close with the
//!   20-day rolling peak for both thresholds. Since the close can never be
//!   above its own rolling peak, `pct_from_peak` is never positive and SELL
//!   cannot fire for a threshold in `[5, 40]`. This is the dashboard's
//!   historical behavior and is kept as the default.
//! - [`SignalRule::PeakTrough`] keeps the BUY test and instead raises SELL
//!   when the close is at least `threshold` percent above the 20-day rolling
//!   trough. BUY is checked first when both hold.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketSignal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for MarketSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MarketSignal::Buy => "BUY",
            MarketSignal::Sell => "SELL",
            MarketSignal::Hold => "HOLD",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalRule {
    #[default]
    PeakOnly,
    PeakTrough,
}

/// A signal together with the figures it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReading {
    pub signal: MarketSignal,
    pub current: f64,
    pub peak: f64,
    pub trough: Option<f64>,
    /// `(current - peak) / peak * 100`; never positive for a rolling peak.
    pub pct_from_peak: f64,
    /// `(current - trough) / trough * 100`, when the trough is usable.
    pub pct_from_trough: Option<f64>,
}

/// Classifies `current` against `peak` (and `trough` for
/// [`SignalRule::PeakTrough`]).
///
/// Returns `None` when `peak` is missing, zero or not finite, since the
/// percentage distance is then meaningless.
pub fn evaluate(
    current: f64,
    peak: Option<f64>,
    trough: Option<f64>,
    threshold_percent: f64,
    rule: SignalRule,
) -> Option<SignalReading> {
    let peak = peak.filter(|p| p.is_finite() && *p != 0.0)?;
    let pct_from_peak = (current - peak) / peak * 100.0;
    let pct_from_trough = trough
        .filter(|t| t.is_finite() && *t != 0.0)
        .map(|t| (current - t) / t * 100.0);

    let signal = if pct_from_peak <= -threshold_percent {
        MarketSignal::Buy
    } else {
        let up_move = match rule {
            SignalRule::PeakOnly => Some(pct_from_peak),
            SignalRule::PeakTrough => pct_from_trough,
        };
        match up_move {
            Some(pct) if pct >= threshold_percent => MarketSignal::Sell,
            _ => MarketSignal::Hold,
        }
    };

    Some(SignalReading {
        signal,
        current,
        peak,
        trough,
        pct_from_peak,
        pct_from_trough,
    })
}
