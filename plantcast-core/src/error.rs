//! Core error types for Plantcast.

use thiserror::Error;

/// Core error type for Plantcast operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A forecast request was built with more plants than the API accepts.
    #[error("Batch too large: {size} plants (limit {limit})")]
    BatchTooLarge {
        /// Number of plants in the batch.
        size: usize,
        /// Server-imposed limit.
        limit: usize,
    },

    /// The same plant appeared twice in one merged forecast.
    #[error("Duplicate plant in forecast: {0}")]
    DuplicatePlant(String),

    /// A plant code was empty or malformed.
    #[error("Invalid plant code: {0:?}")]
    InvalidPlantCode(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
