#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use market_data_provider::{
    MarketDataService,
    cache::PriceCache,
    clock::ManualClock,
    models::{bar::DailyBar, request::FetchRequest, summary::QuoteSummary},
    providers::{ApiSnafu, DataProvider, ProviderError},
};
use stock_dashboard::{Dashboard, DashboardConfig};

/// Serves the same bars for every symbol except `EMPTY` (no history) and
/// `DOWN` (provider failure).
pub struct ScriptedProvider {
    pub bars: Vec<DailyBar>,
    pub quote: Option<QuoteSummary>,
    pub bar_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl DataProvider for ScriptedProvider {
    async fn fetch_daily_bars(&self, request: &FetchRequest) -> Result<Vec<DailyBar>, ProviderError> {
        self.bar_calls.fetch_add(1, Ordering::SeqCst);
        match request.symbol() {
            "EMPTY" => Ok(Vec::new()),
            "DOWN" => ApiSnafu {
                message: "HTTP 500: boom",
            }
            .fail(),
            _ => Ok(self.bars.clone()),
        }
    }

    async fn fetch_summary(&self, _symbol: &str) -> Result<QuoteSummary, ProviderError> {
        match &self.quote {
            Some(q) => Ok(q.clone()),
            None => ApiSnafu {
                message: "HTTP 401: Unauthorized",
            }
            .fail(),
        }
    }
}

/// Thirty sessions flat at 100 followed by ten at 75.
pub fn slump_bars() -> Vec<DailyBar> {
    let start = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
    (0..40)
        .map(|i| {
            let close = if i < 30 { 100.0 } else { 75.0 };
            DailyBar {
                date: start + Duration::days(i),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 5_000.0,
            }
        })
        .collect()
}

pub fn dashboard(quote: Option<QuoteSummary>) -> (Dashboard, Arc<AtomicUsize>) {
    dashboard_with(DashboardConfig::default(), quote)
}

/// Scripted dashboard whose clock reads 2025-01-15 15:00 UTC.
pub fn dashboard_with(
    config: DashboardConfig,
    quote: Option<QuoteSummary>,
) -> (Dashboard, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = ScriptedProvider {
        bars: slump_bars(),
        quote,
        bar_calls: Arc::clone(&calls),
    };
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 1, 15, 15, 0, 0).unwrap(),
    ));
    let service = MarketDataService::new(Box::new(provider), PriceCache::new(config.cache_ttl()), clock);
    (Dashboard::new(service, config), calls)
}
