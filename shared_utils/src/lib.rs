//! Small helpers shared by every crate in the workspace: environment lookup
//! and TOML configuration loading.

pub mod config;
pub mod env;
