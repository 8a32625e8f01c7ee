use async_trait::async_trait;
use serde_json::Value;

use crate::{Fields, Record, RecordId, RecordQuery, Result, StoreError};

/// Options for updating a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    /// Field that must hold the given value for the update to apply.
    /// If None, the update is unconditional (use with caution).
    pub expected: Option<(String, Value)>,
}

impl UpdateOptions {
    /// Creates options with no precondition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that only apply the update while `field` still equals
    /// `value` (compare-and-swap).
    pub fn expect_field(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            expected: Some((field.into(), value.into())),
        }
    }
}

/// Core trait for record store implementations.
///
/// The store owns durability and consistency of single calls. It offers no
/// multi-call transactions; callers that need to keep two records in step
/// use conditional updates and undo their own partial work on failure.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new record under the given id.
    ///
    /// Fails with `DuplicateId` if the id is already taken in that table.
    async fn insert(&self, table: &str, id: RecordId, fields: Fields) -> Result<Record>;

    /// Retrieves a record by id. Returns None if it doesn't exist.
    async fn get(&self, table: &str, id: RecordId) -> Result<Option<Record>>;

    /// Retrieves the records of a table matching a query, oldest first.
    async fn select(&self, table: &str, query: RecordQuery) -> Result<Vec<Record>>;

    /// Merges `patch` into an existing record.
    ///
    /// Returns None if the record doesn't exist. If `options.expected` is set
    /// and the stored value differs, nothing is written and the call fails
    /// with `ConditionFailed`.
    async fn update(
        &self,
        table: &str,
        id: RecordId,
        patch: Fields,
        options: UpdateOptions,
    ) -> Result<Option<Record>>;

    /// Deletes a record, returning it. Returns None if it didn't exist.
    async fn delete(&self, table: &str, id: RecordId) -> Result<Option<Record>>;
}

/// Extension trait providing convenience methods for record stores.
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    /// Checks if a record exists.
    async fn exists(&self, table: &str, id: RecordId) -> Result<bool> {
        Ok(self.get(table, id).await?.is_some())
    }

    /// Retrieves a record, failing with `NotFound` if it doesn't exist.
    async fn require(&self, table: &str, id: RecordId) -> Result<Record> {
        self.get(table, id).await?.ok_or_else(|| StoreError::NotFound {
            table: table.to_string(),
            id,
        })
    }

    /// Retrieves every record of a table, oldest first.
    async fn select_all(&self, table: &str) -> Result<Vec<Record>> {
        self.select(table, RecordQuery::new()).await
    }
}

// Blanket implementation for all RecordStore implementations
impl<T: RecordStore + ?Sized> RecordStoreExt for T {}
