use indexmap::IndexMap;
use market_data_provider::models::price_series::PriceSeries;
use serde::Serialize;
use tracing::debug;

use crate::{
    distribution::{DEFAULT_BINS, ReturnDistribution},
    params::{EXTREMA_WINDOW, IndicatorParams},
    returns::{annualized_volatility, daily_returns, pct_change},
    rolling::{rolling_max, rolling_mean, rolling_min},
    signal::{SignalReading, evaluate},
};

/// Everything the dashboard shows for one series.
///
/// All per-bar vectors have the same length as the input series. The set is
/// cheap to recompute and is never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    /// Keyed by window, ascending.
    pub moving_averages: IndexMap<usize, Vec<Option<f64>>>,
    pub rolling_max_20: Vec<Option<f64>>,
    pub rolling_min_20: Vec<Option<f64>>,
    pub daily_returns: Vec<Option<f64>>,
    /// Percent.
    pub annualized_volatility: Option<f64>,
    pub market_signal: Option<SignalReading>,
    pub return_distribution: ReturnDistribution,
    pub latest_close: Option<f64>,
    /// Percent change of the last close over the previous one.
    pub latest_change_pct: Option<f64>,
}

impl IndicatorSet {
    /// Last value of the moving average for `window`, if computed and defined.
    pub fn latest_ma(&self, window: usize) -> Option<f64> {
        self.moving_averages.get(&window)?.last().copied().flatten()
    }

    pub fn peak(&self) -> Option<f64> {
        self.rolling_max_20.last().copied().flatten()
    }

    pub fn trough(&self) -> Option<f64> {
        self.rolling_min_20.last().copied().flatten()
    }
}

/// Derives all indicators for `series`.
pub fn derive(series: &PriceSeries, params: &IndicatorParams) -> IndicatorSet {
    let closes = series.closes();
    let n = closes.len();
    // A single bar has nothing to average against or return from.
    let too_short = n < 2;

    let moving_averages = params
        .ma_windows()
        .iter()
        .map(|&w| {
            let values = if too_short {
                vec![None; n]
            } else {
                rolling_mean(&closes, w)
            };
            (w, values)
        })
        .collect();

    let rolling_max_20 = rolling_max(&closes, EXTREMA_WINDOW);
    let rolling_min_20 = rolling_min(&closes, EXTREMA_WINDOW);

    let daily_returns = if too_short {
        vec![None; n]
    } else {
        daily_returns(&closes)
    };
    let annualized_volatility = annualized_volatility(&daily_returns);

    let defined: Vec<f64> = daily_returns.iter().flatten().copied().collect();
    let return_distribution = ReturnDistribution::from_values(&defined, DEFAULT_BINS);

    let latest_close = closes.last().copied();
    let latest_change_pct = match closes.as_slice() {
        [.., prev, last] => pct_change(*prev, *last).map(|r| r * 100.0),
        _ => None,
    };

    let market_signal = latest_close.and_then(|current| {
        evaluate(
            current,
            rolling_max_20.last().copied().flatten(),
            rolling_min_20.last().copied().flatten(),
            params.threshold_percent(),
            params.signal_rule(),
        )
    });

    debug!(
        bars = n,
        windows = ?params.ma_windows(),
        signal = ?market_signal.as_ref().map(|r| r.signal),
        "derived indicators"
    );

    IndicatorSet {
        moving_averages,
        rolling_max_20,
        rolling_min_20,
        daily_returns,
        annualized_volatility,
        market_signal,
        return_distribution,
        latest_close,
        latest_change_pct,
    }
}
