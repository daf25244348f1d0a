//! Error types for Staticgate

use thiserror::Error;

/// Result type for Staticgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Staticgate
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
