use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::env::InvalidEnvVarError;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected shape.
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// An environment override could not be parsed.
    #[error(transparent)]
    Env(#[from] InvalidEnvVarError),

    /// A value parsed fine but is outside what the application accepts.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Parses a TOML document into `T`. `origin` only labels errors.
pub fn parse_toml_str<T: DeserializeOwned>(text: &str, origin: &str) -> Result<T, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: origin.to_string(),
        source,
    })
}

/// Reads a TOML file from disk and deserializes it into `T`.
pub fn load_toml_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_toml_str(&text, &path.display().to_string())
}
