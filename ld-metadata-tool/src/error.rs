//! Error types for the metadata tool.

use ld_metadata::MetadataError;
use thiserror::Error;

/// Main error type for the tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Error from the metadata store.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be written.
    #[error("Configuration error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Configuration values are inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Command line arguments are inconsistent.
    #[error("Usage error: {0}")]
    Usage(String),
}

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, ToolError>;
