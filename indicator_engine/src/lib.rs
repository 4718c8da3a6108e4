//! Descriptive indicators derived from a daily [`PriceSeries`].
//!
//! Everything here is a pure function of its inputs. Positions without
//! enough history are `None`, never a placeholder number.
//!
//! [`PriceSeries`]: market_data_provider::models::price_series::PriceSeries

pub mod distribution;
pub mod engine;
pub mod params;
pub mod returns;
pub mod rolling;
pub mod signal;

pub use engine::{IndicatorSet, derive};
pub use params::{IndicatorParams, ParamsError};
pub use signal::{MarketSignal, SignalReading, SignalRule};
