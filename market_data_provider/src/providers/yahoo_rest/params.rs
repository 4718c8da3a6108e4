use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::request::FetchRequest;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Hands out the session cookie the quote endpoint's crumb is bound to.
pub const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";

/// Yahoo rejects requests without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Connection settings for [`YahooProvider`](super::YahooProvider).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    /// Scheme and host, without a trailing path.
    pub base_url: String,
    pub user_agent: String,
    /// Visited once per session to obtain the cookie before asking for a crumb.
    pub cookie_url: String,
    /// Per-request timeout enforced by the HTTP client. `None` uses the
    /// client default (no timeout).
    pub timeout_secs: Option<u64>,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cookie_url: DEFAULT_COOKIE_URL.to_string(),
            timeout_secs: Some(30),
        }
    }
}

impl YahooConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Query string for the v8 chart endpoint: daily bars in `[start, end)`.
pub fn chart_query(request: &FetchRequest) -> Vec<(String, String)> {
    vec![
        ("period1".to_string(), request.start_timestamp().to_string()),
        ("period2".to_string(), request.end_timestamp().to_string()),
        ("interval".to_string(), "1d".to_string()),
        ("events".to_string(), "history".to_string()),
        ("includePrePost".to_string(), "false".to_string()),
    ]
}

/// Query string for the v7 quote endpoint. The endpoint answers 401
/// without a crumb.
pub fn quote_query(symbol: &str, crumb: Option<&str>) -> Vec<(String, String)> {
    let mut query = vec![
        ("symbols".to_string(), symbol.to_string()),
        (
            "fields".to_string(),
            "marketCap,fiftyTwoWeekLow,fiftyTwoWeekHigh".to_string(),
        ),
    ];
    if let Some(c) = crumb {
        query.push(("crumb".to_string(), c.to_string()));
    }
    query
}
