pub mod bar;
pub mod price_series;
pub mod request;
pub mod snapshot;
pub mod summary;
