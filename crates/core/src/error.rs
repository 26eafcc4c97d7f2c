use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised while building or validating domain values.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid asset status: {0}")]
    InvalidStatus(String),

    #[error("invalid coordinates: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = StdResult<T, CoreError>;
