//! Error types for the layout engine

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while laying out a chart
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A required style or geometry value is missing or has the wrong kind
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Chunk size passed to the chunker was zero
    #[error("invalid argument: chunk size must be positive, got {size}")]
    InvalidChunkSize { size: usize },

    /// `col.letters` is not a positive whole number
    #[error("invalid argument: column capacity must be a positive whole number, got {value}")]
    InvalidColumnCapacity { value: f64 },
}

impl LayoutError {
    /// Programming-contract violations, as opposed to configuration problems
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidChunkSize { .. } | Self::InvalidColumnCapacity { .. }
        )
    }

    /// The offending selector, for configuration errors
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Config(err) => err.selector(),
            _ => None,
        }
    }
}
