//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur during digest operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The digest algorithm name is not one we support.
    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
