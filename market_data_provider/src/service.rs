//! The read-through fetch path: validate, consult the cache, fall back to the
//! provider, resolve summary fields, store.

use std::sync::Arc;

use chrono::NaiveDate;
use snafu::ResultExt;
use tracing::{debug, info, warn};

use crate::{
    cache::PriceCache,
    clock::{Clock, SystemClock},
    errors::{FetchError, InvalidRequestSnafu, PriceHistorySnafu},
    models::{
        price_series::PriceSeries, request::FetchRequest, snapshot::MarketSnapshot,
        summary::SymbolSummary,
    },
    providers::DataProvider,
};

/// Result of a successful fetch call.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Data(Arc<MarketSnapshot>),
    /// The provider has no bars for this symbol and range.
    NoData,
}

impl FetchOutcome {
    pub fn snapshot(&self) -> Option<&Arc<MarketSnapshot>> {
        match self {
            FetchOutcome::Data(s) => Some(s),
            FetchOutcome::NoData => None,
        }
    }
}

pub struct MarketDataService {
    provider: Box<dyn DataProvider>,
    cache: PriceCache,
    clock: Arc<dyn Clock>,
}

impl MarketDataService {
    pub fn new(provider: Box<dyn DataProvider>, cache: PriceCache, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            cache,
            clock,
        }
    }

    pub fn with_system_clock(provider: Box<dyn DataProvider>, cache: PriceCache) -> Self {
        Self::new(provider, cache, Arc::new(SystemClock))
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    /// Current date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Fetches daily bars and summary fields for `symbol` over `[start, end)`.
    ///
    /// A live cache entry is returned as-is without contacting the provider.
    /// On a miss the provider is asked for bars; an empty history yields
    /// [`FetchOutcome::NoData`] and caches nothing. A failing summary lookup
    /// never fails the call: the 52-week range is taken from the bars and
    /// the market cap is left unknown.
    pub async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchOutcome, FetchError> {
        let request =
            FetchRequest::new(symbol, start, end, self.clock.today()).context(InvalidRequestSnafu)?;

        if let Some(hit) = self.cache.get(&request, self.clock.now()) {
            debug!(symbol = request.symbol(), %start, %end, "cache hit");
            return Ok(FetchOutcome::Data(hit));
        }

        info!(symbol = request.symbol(), %start, %end, "cache miss, requesting daily bars");
        let bars = self
            .provider
            .fetch_daily_bars(&request)
            .await
            .context(PriceHistorySnafu {
                symbol: request.symbol(),
            })?;
        let series = PriceSeries::new(bars);

        let Some(fallback) = SymbolSummary::from_series(&series) else {
            info!(symbol = request.symbol(), "provider returned no bars");
            return Ok(FetchOutcome::NoData);
        };

        let summary = match self.provider.fetch_summary(request.symbol()).await {
            Ok(quote) => fallback.with_quote(quote),
            Err(e) => {
                warn!(
                    symbol = request.symbol(),
                    error = %e,
                    "summary unavailable, using range of fetched bars"
                );
                fallback
            }
        };

        let snapshot = Arc::new(MarketSnapshot {
            symbol: request.symbol().to_string(),
            series,
            summary,
        });
        debug!(symbol = request.symbol(), bars = snapshot.series.len(), "caching snapshot");
        self.cache
            .insert(request, Arc::clone(&snapshot), self.clock.now());

        Ok(FetchOutcome::Data(snapshot))
    }

    /// Empties the cache regardless of entry age.
    pub fn clear_cache(&self) {
        let dropped = self.cache.len();
        self.cache.clear();
        info!(dropped, "price cache cleared");
    }
}
