//! Terminal front end: configuration, the interactive session and the
//! text/JSON rendering of an analysis.

pub mod app;
pub mod config;
pub mod render;
pub mod session;

pub use app::{Analysis, Dashboard, Report};
pub use config::{ConfigOverrides, DashboardConfig};
