//! Error types for conversion and composition

use thiserror::Error;

/// Errors that can occur while converting markup or composing documents
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The markup could not be turned into a node tree
    #[error("Markup parse error: {cause}")]
    Parse {
        /// Description of the underlying parser failure
        cause: String,
    },

    /// A document kind that mandates a title was composed without one
    #[error("A title is required to compose a {0}")]
    MissingTitle(&'static str),

    /// Error reading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    /// Build a parse error from anything displayable
    pub fn parse(cause: impl std::fmt::Display) -> Self {
        ConversionError::Parse {
            cause: cause.to_string(),
        }
    }
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;
