use serde_json::Value;
use thiserror::Error;

use crate::RecordId;

/// Errors that can occur when interacting with the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record does not exist in the given table.
    #[error("Record not found: {table}/{id}")]
    NotFound { table: String, id: RecordId },

    /// A record with the same id already exists in the table.
    #[error("Duplicate record id: {table}/{id}")]
    DuplicateId { table: String, id: RecordId },

    /// A conditional update found a different value than expected.
    #[error("Condition failed for {table}/{id}: expected {field} = {expected}")]
    ConditionFailed {
        table: String,
        id: RecordId,
        field: String,
        expected: Value,
    },

    /// The fields handed to the store are not a valid record body.
    #[error("Invalid fields: {0}")]
    InvalidFields(String),

    /// The backing service refused or failed the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns true if this error came from a failed update precondition.
    pub fn is_condition_failed(&self) -> bool {
        matches!(self, StoreError::ConditionFailed { .. })
    }
}

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
