//! Typed error enum for the service layer.
//!
//! Unifies storage, embedding, geocoding and input failures into a single
//! error type so front ends can map them to exit codes or HTTP statuses.

use assetdb_core::CoreError;
use assetdb_embeddings::EmbeddingError;
use assetdb_geocode::GeocodeError;
use assetdb_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying storage, embedding and geocoding failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Embedding generation failed.
    #[error("embedding: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Geocoding failed after retries.
    #[error("geocode: {0}")]
    Geocode(#[from] GeocodeError),

    /// Input document or domain value was invalid.
    #[error("invalid data: {0}")]
    Core(#[from] CoreError),

    /// Caller provided invalid input (empty query, bad radius).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading the input file failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Geocode(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }

    /// Whether the caller, not the system, is at fault.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Core(_))
    }
}
