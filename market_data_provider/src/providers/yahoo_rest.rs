pub mod params;
pub mod provider;
pub mod response;

pub use params::YahooConfig;
pub use provider::YahooProvider;
