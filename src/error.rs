/// Error types for the hospital management core.
///
/// Availability checks and appointment filtering never fail; these errors
/// belong to the layers around them (record validation, document decoding,
/// configuration and snapshot loading).

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed document in '{collection}': {message}")]
    Decode { collection: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn decode(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Decode {
            collection: collection.into(),
            message: message.into(),
        }
    }
}
