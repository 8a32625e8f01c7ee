//! Domain error types.

use common::RecordId;
use record_store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The request is missing fields or carries invalid values.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: RecordId },

    /// A sale asks for more units than the product has in stock.
    #[error("Insufficient stock. Available: {available}, Requested: {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    /// The pet is already committed to an open transaction.
    #[error("Pet {0} is not available")]
    PetUnavailable(RecordId),

    /// The stock kept changing underneath every write attempt.
    #[error("Stock of product {product_id} changed concurrently {attempts} times, giving up")]
    StockConflict { product_id: RecordId, attempts: u32 },

    /// Undoing a partially applied workflow failed, leaving partial effects.
    #[error("Compensation step '{step}' failed: {reason} (while undoing: {cause})")]
    CompensationFailed {
        step: String,
        reason: String,
        cause: String,
    },

    /// An error occurred in the record store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    /// Returns true for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
