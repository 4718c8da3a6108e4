use serde::Serialize;
use thiserror::Error;

use crate::signal::SignalRule;

pub const MIN_THRESHOLD: f64 = 5.0;
pub const MAX_THRESHOLD: f64 = 40.0;
pub const DEFAULT_THRESHOLD: f64 = 20.0;

/// Window of the rolling peak/trough used by the market signal.
pub const EXTREMA_WINDOW: usize = 20;

/// Moving-average windows offered by the front end.
pub const SUPPORTED_MA_WINDOWS: [usize; 4] = [20, 50, 100, 200];
pub const DEFAULT_MA_WINDOWS: [usize; 2] = [50, 200];

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("moving-average window must be positive")]
    ZeroWindow,
    #[error("threshold {0}% is outside [5, 40]")]
    ThresholdOutOfRange(f64),
}

/// Clamps a user-provided threshold into the accepted range.
///
/// NaN maps to the default threshold.
pub fn clamp_threshold(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_THRESHOLD
    } else {
        value.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
    }
}

/// Validated inputs of [`derive`](crate::engine::derive).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorParams {
    ma_windows: Vec<usize>,
    threshold_percent: f64,
    signal_rule: SignalRule,
}

impl IndicatorParams {
    /// Windows are deduplicated and sorted ascending; an empty set means no
    /// moving averages are computed.
    pub fn new(
        ma_windows: impl IntoIterator<Item = usize>,
        threshold_percent: f64,
        signal_rule: SignalRule,
    ) -> Result<Self, ParamsError> {
        let mut windows: Vec<usize> = ma_windows.into_iter().collect();
        if windows.contains(&0) {
            return Err(ParamsError::ZeroWindow);
        }
        windows.sort_unstable();
        windows.dedup();

        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&threshold_percent) {
            return Err(ParamsError::ThresholdOutOfRange(threshold_percent));
        }

        Ok(Self {
            ma_windows: windows,
            threshold_percent,
            signal_rule,
        })
    }

    pub fn ma_windows(&self) -> &[usize] {
        &self.ma_windows
    }

    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    pub fn signal_rule(&self) -> SignalRule {
        self.signal_rule
    }
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_windows: DEFAULT_MA_WINDOWS.to_vec(),
            threshold_percent: DEFAULT_THRESHOLD,
            signal_rule: SignalRule::default(),
        }
    }
}
