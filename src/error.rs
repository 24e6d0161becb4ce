//! Error types for securepass.

use thiserror::Error;

/// Main error type for credential operations.
#[derive(Error, Debug)]
pub enum PassError {
    #[error("Credential not found: {0}")]
    CredentialNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Storage write failed on both primary and fallback backends")]
    WriteFailed,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(#[from] crate::backend::StorageError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PassError>;
