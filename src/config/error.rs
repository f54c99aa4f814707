//! Error types for loading and reading chart documents

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a chart document or reading values from it
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read from disk
    #[error("failed to read chart document '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML chart document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse YAML chart document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A required selector resolved to nothing
    #[error("missing configuration value '{selector}'")]
    Missing { selector: String },

    /// A selector resolved to a value of the wrong kind
    #[error("invalid configuration value '{selector}': expected {expected}, found {found}")]
    InvalidValue {
        selector: String,
        expected: &'static str,
        found: String,
    },
}

impl ConfigError {
    pub fn missing(selector: impl Into<String>) -> Self {
        Self::Missing {
            selector: selector.into(),
        }
    }

    pub fn invalid(
        selector: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            selector: selector.into(),
            expected,
            found: found.into(),
        }
    }

    /// The selector involved, if this is a lookup error
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Missing { selector } | Self::InvalidValue { selector, .. } => Some(selector),
            _ => None,
        }
    }
}
