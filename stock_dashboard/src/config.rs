//! Dashboard settings.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `DASHBOARD_*` environment variables, then command-line flags. Every layer
//! goes through [`DashboardConfig::validated`], which clamps the threshold
//! into `[5, 40]` and rejects moving-average windows the dashboard does not
//! offer.

use std::path::Path;

use chrono::{Days, Duration, NaiveDate};
use indicator_engine::{
    IndicatorParams, SignalRule,
    params::{DEFAULT_MA_WINDOWS, DEFAULT_THRESHOLD, SUPPORTED_MA_WINDOWS, clamp_threshold},
};
use market_data_provider::{
    models::request::EARLIEST_SUPPORTED_YEAR, providers::yahoo_rest::YahooConfig,
};
use serde::{Deserialize, Serialize};
use shared_utils::{
    config::{ConfigError, load_toml_file, parse_toml_str},
    env::{InvalidEnvVarError, get_env_var_opt, parse_env_var},
};

pub const ENV_THRESHOLD: &str = "DASHBOARD_THRESHOLD";
pub const ENV_MA_WINDOWS: &str = "DASHBOARD_MA_WINDOWS";
pub const ENV_CACHE_TTL_SECS: &str = "DASHBOARD_CACHE_TTL_SECS";
pub const ENV_YAHOO_BASE_URL: &str = "DASHBOARD_YAHOO_BASE_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "DASHBOARD_HTTP_TIMEOUT_SECS";

pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 3600;
/// A century; the default start is clamped to 1980 anyway.
const MAX_LOOKBACK_DAYS: u32 = 36_525;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Percent move from the 20-day peak that triggers BUY.
    pub threshold_percent: f64,
    /// Moving averages to compute; each one of 20, 50, 100 or 200.
    pub ma_windows: Vec<usize>,
    /// Default start date is this many days before today.
    pub lookback_days: u32,
    pub cache_ttl_secs: u64,
    pub signal_rule: SignalRule,
    pub yahoo: YahooConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD,
            ma_windows: DEFAULT_MA_WINDOWS.to_vec(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            signal_rule: SignalRule::default(),
            yahoo: YahooConfig::default(),
        }
    }
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub threshold_percent: Option<f64>,
    pub ma_windows: Option<Vec<usize>>,
    pub signal_rule: Option<SignalRule>,
}

impl DashboardConfig {
    /// Defaults, then `path` if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => load_toml_file(p)?,
            None => Self::default(),
        };
        base.with_env_overrides()?.validated()
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        parse_toml_str::<Self>(text, "<inline>")?.validated()
    }

    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(t) = parse_env_var::<f64>(ENV_THRESHOLD)? {
            self.threshold_percent = t;
        }
        if let Some(raw) = get_env_var_opt(ENV_MA_WINDOWS) {
            self.ma_windows = parse_window_list(&raw).map_err(|reason| InvalidEnvVarError {
                name: ENV_MA_WINDOWS.to_string(),
                value: raw.clone(),
                reason,
            })?;
        }
        if let Some(ttl) = parse_env_var::<u64>(ENV_CACHE_TTL_SECS)? {
            self.cache_ttl_secs = ttl;
        }
        if let Some(url) = get_env_var_opt(ENV_YAHOO_BASE_URL) {
            self.yahoo.base_url = url;
        }
        if let Some(secs) = parse_env_var::<u64>(ENV_HTTP_TIMEOUT_SECS)? {
            self.yahoo.timeout_secs = Some(secs);
        }
        Ok(self)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(t) = overrides.threshold_percent {
            self.threshold_percent = t;
        }
        if let Some(w) = overrides.ma_windows {
            self.ma_windows = w;
        }
        if let Some(r) = overrides.signal_rule {
            self.signal_rule = r;
        }
        self.validated()
    }

    /// Clamps the threshold, normalizes the window list and checks ranges.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.threshold_percent = clamp_threshold(self.threshold_percent);

        if let Some(bad) = self
            .ma_windows
            .iter()
            .find(|&&w| !SUPPORTED_MA_WINDOWS.contains(&w))
        {
            return Err(ConfigError::Invalid(format!(
                "moving-average window {bad} is not one of {SUPPORTED_MA_WINDOWS:?}"
            )));
        }
        self.ma_windows.sort_unstable();
        self.ma_windows.dedup();

        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.lookback_days) {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}"
            )));
        }
        if !(1..=MAX_CACHE_TTL_SECS).contains(&self.cache_ttl_secs) {
            return Err(ConfigError::Invalid(format!(
                "cache_ttl_secs must be between 1 and {MAX_CACHE_TTL_SECS}"
            )));
        }
        if self.yahoo.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("yahoo.timeout_secs must be positive".into()));
        }
        Ok(self)
    }

    pub fn cache_ttl(&self) -> Duration {
        // bounded by validation, the cast cannot wrap
        Duration::seconds(self.cache_ttl_secs.min(MAX_CACHE_TTL_SECS) as i64)
    }

    /// `[today - lookback_days, today)`, with the start clamped to the
    /// earliest date the provider accepts.
    pub fn default_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let earliest =
            NaiveDate::from_ymd_opt(EARLIEST_SUPPORTED_YEAR, 1, 1).unwrap_or(NaiveDate::MIN);
        let start = today
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(earliest)
            .max(earliest);
        (start, today)
    }

    pub fn indicator_params(&self) -> Result<IndicatorParams, ConfigError> {
        IndicatorParams::new(
            self.ma_windows.iter().copied(),
            self.threshold_percent,
            self.signal_rule,
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Parses `"20, 50,200"` into windows. Validity against the supported set
/// is checked later by [`DashboardConfig::validated`].
pub fn parse_window_list(raw: &str) -> Result<Vec<usize>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|e| format!("{s:?} is not a window length: {e}"))
        })
        .collect()
}
