use snafu::{Backtrace, Snafu};

use crate::{models::request::RequestError, providers::ProviderError};

/// Why a fetch did not produce data.
///
/// An empty price history is not an error; it is
/// [`FetchOutcome::NoData`](crate::service::FetchOutcome::NoData).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum FetchError {
    /// The symbol or date range was rejected before any lookup.
    #[snafu(display("Invalid request: {source}"))]
    InvalidRequest {
        source: RequestError,
        backtrace: Backtrace,
    },

    /// The provider failed to return the price history.
    #[snafu(display("Failed to fetch price history for {symbol}: {source}"))]
    PriceHistory {
        symbol: String,
        source: ProviderError,
        backtrace: Backtrace,
    },
}
