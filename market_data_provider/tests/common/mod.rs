#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use market_data_provider::{
    MarketDataService,
    cache::PriceCache,
    clock::ManualClock,
    models::{bar::DailyBar, request::FetchRequest, summary::QuoteSummary},
    providers::{ApiSnafu, DataProvider, ProviderError},
};

/// Call counters shared between a test and the provider it handed over.
#[derive(Debug, Default)]
pub struct Calls {
    pub bars: AtomicUsize,
    pub summary: AtomicUsize,
}

impl Calls {
    pub fn bars(&self) -> usize {
        self.bars.load(Ordering::SeqCst)
    }

    pub fn summary(&self) -> usize {
        self.summary.load(Ordering::SeqCst)
    }
}

/// Scripted provider: returns fixed bars and either a quote or an error.
pub struct FakeProvider {
    pub bars: Vec<DailyBar>,
    pub quote: Option<QuoteSummary>,
    pub fail_bars: bool,
    pub calls: Arc<Calls>,
}

#[async_trait]
impl DataProvider for FakeProvider {
    async fn fetch_daily_bars(
        &self,
        _request: &FetchRequest,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        self.calls.bars.fetch_add(1, Ordering::SeqCst);
        if self.fail_bars {
            return ApiSnafu {
                message: "HTTP 503: upstream unavailable",
            }
            .fail();
        }
        Ok(self.bars.clone())
    }

    async fn fetch_summary(&self, _symbol: &str) -> Result<QuoteSummary, ProviderError> {
        self.calls.summary.fetch_add(1, Ordering::SeqCst);
        match &self.quote {
            Some(q) => Ok(q.clone()),
            None => ApiSnafu {
                message: "HTTP 401: Invalid Crumb",
            }
            .fail(),
        }
    }
}

pub fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 15, 0, 0).unwrap()
}

/// `n` consecutive daily bars from `closes`, with low/high one unit around
/// the close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<DailyBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| DailyBar {
            date: day(1, 1) + Duration::days(i as i64),
            open: *c,
            high: c + 1.0,
            low: c - 1.0,
            close: *c,
            volume: 1_000_000.0,
        })
        .collect()
}

pub struct Harness {
    pub service: MarketDataService,
    pub clock: Arc<ManualClock>,
    pub calls: Arc<Calls>,
}

pub fn harness(provider: FakeProvider, ttl: Duration) -> Harness {
    let clock = Arc::new(ManualClock::new(t0()));
    let calls = Arc::clone(&provider.calls);
    let service = MarketDataService::new(Box::new(provider), PriceCache::new(ttl), clock.clone());
    Harness {
        service,
        clock,
        calls,
    }
}

pub fn provider(bars: Vec<DailyBar>, quote: Option<QuoteSummary>) -> FakeProvider {
    FakeProvider {
        bars,
        quote,
        fail_bars: false,
        calls: Arc::new(Calls::default()),
    }
}
