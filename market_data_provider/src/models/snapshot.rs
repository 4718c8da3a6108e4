use crate::models::{price_series::PriceSeries, summary::SymbolSummary};

/// Everything one successful fetch produces for a symbol and date range.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    /// Normalized (upper-case) ticker.
    pub symbol: String,
    pub series: PriceSeries,
    pub summary: SymbolSummary,
}
