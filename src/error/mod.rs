//! Error types for registry access and the aggregation pipeline

pub mod handlers;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Transport failure or a non-success status from the registry
    #[error("Network error: {0}")]
    Network(String),

    /// Response body that could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Digest lookup answered without a `Docker-Content-Digest` header
    #[error("Missing digest header for {repository}:{tag}")]
    MissingDigest { repository: String, tag: String },

    /// Nested `v1Compatibility` document could not be decoded
    #[error("Provenance decode error for {repository}:{tag}: {reason}")]
    ProvenanceDecode {
        repository: String,
        tag: String,
        reason: String,
    },

    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    pub fn decode(context: &str, err: serde_json::Error) -> Self {
        RegistryError::Decode(format!("{}: {}", context, err))
    }
}

impl From<url::ParseError> for RegistryError {
    fn from(err: url::ParseError) -> Self {
        RegistryError::Config(format!("invalid registry address: {}", err))
    }
}
