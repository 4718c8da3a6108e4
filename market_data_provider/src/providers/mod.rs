//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the interface the fetch
//! service uses to pull daily bars and summary fields from a vendor. The
//! concrete Yahoo Finance client lives in [`yahoo_rest`].
//!
//! The trait is async and object safe so the service can hold a
//! `Box<dyn DataProvider>` chosen at runtime (or a fake in tests).
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_provider::models::{
//!     bar::DailyBar, request::FetchRequest, summary::QuoteSummary,
//! };
//! use market_data_provider::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_daily_bars(
//!         &self,
//!         _request: &FetchRequest,
//!     ) -> Result<Vec<DailyBar>, ProviderError> {
//!         Ok(vec![])
//!     }
//!
//!     async fn fetch_summary(&self, _symbol: &str) -> Result<QuoteSummary, ProviderError> {
//!         Ok(QuoteSummary::default())
//!     }
//! }
//! ```

pub mod yahoo_rest;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::DailyBar, request::FetchRequest, summary::QuoteSummary};

/// Trait for fetching daily price history from a market data vendor.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches daily bars for `request.symbol()` in `[start, end)`.
    ///
    /// An unknown symbol or a range without trading days is an empty vector,
    /// not an error.
    async fn fetch_daily_bars(
        &self,
        request: &FetchRequest,
    ) -> Result<Vec<DailyBar>, ProviderError>;

    /// Fetches market cap and 52-week range for `symbol`.
    async fn fetch_summary(&self, symbol: &str) -> Result<QuoteSummary, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// Base URL is not an absolute http(s) URL.
    #[snafu(display("Invalid provider base URL: {url}"))]
    InvalidBaseUrl { url: String, backtrace: Backtrace },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error status or error payload.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The response body did not have the expected shape.
    #[snafu(display("Failed to decode provider response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}
