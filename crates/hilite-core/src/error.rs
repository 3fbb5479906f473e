//! Error types for hilite.

use thiserror::Error;

use crate::models::ItemId;

/// Result type alias using hilite's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for library host operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Item not found in the library
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host library rejected or failed a call
    #[error("Host error: {0}")]
    Host(String),

    /// A save or trash transaction did not commit
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(e: crate::config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}
