//! Daily price history retrieval with a time-boxed read-through cache.
//!
//! The entry point is [`service::MarketDataService`], which validates a
//! [`models::request::FetchRequest`], serves live entries from a
//! [`cache::PriceCache`] and otherwise asks a [`providers::DataProvider`]
//! for bars and summary fields.

pub mod cache;
pub mod clock;
pub mod errors;
pub mod models;
pub mod providers;
pub mod service;

pub use errors::FetchError;
pub use service::{FetchOutcome, MarketDataService};
