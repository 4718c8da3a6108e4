//! Headline figures shown next to the price chart: market cap and the
//! 52-week trading range.

use serde::{Deserialize, Serialize};

use crate::models::price_series::PriceSeries;

/// Raw summary fields as returned by a provider. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub market_cap: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
}

/// Where the 52-week range of a [`SymbolSummary`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    /// The provider's summary endpoint answered.
    Provider,
    /// The summary endpoint failed; figures were derived from the fetched bars.
    SeriesFallback,
}

/// Resolved summary for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSummary {
    /// Market capitalization in the quote currency; `None` when unknown.
    pub market_cap: Option<f64>,
    pub fifty_two_week_low: f64,
    pub fifty_two_week_high: f64,
    pub source: SummarySource,
}

impl SymbolSummary {
    /// Derives a summary from the series itself: lowest `low`, highest
    /// `high`, market cap unknown. `None` for an empty series.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        Some(Self {
            market_cap: None,
            fifty_two_week_low: series.min_low()?,
            fifty_two_week_high: series.max_high()?,
            source: SummarySource::SeriesFallback,
        })
    }

    /// Overlays provider figures on a series-derived summary.
    ///
    /// Fields the provider left out keep the series value. A negative market
    /// cap is treated as unknown.
    pub fn with_quote(self, quote: QuoteSummary) -> Self {
        Self {
            market_cap: quote.market_cap.filter(|v| v.is_finite() && *v >= 0.0),
            fifty_two_week_low: quote.fifty_two_week_low.unwrap_or(self.fifty_two_week_low),
            fifty_two_week_high: quote
                .fifty_two_week_high
                .unwrap_or(self.fifty_two_week_high),
            source: SummarySource::Provider,
        }
    }

    /// Market cap with unknown reported as zero.
    pub fn market_cap_or_zero(&self) -> f64 {
        self.market_cap.unwrap_or(0.0)
    }
}
