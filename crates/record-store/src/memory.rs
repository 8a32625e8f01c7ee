use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::record::validate_fields;
use crate::{
    Fields, Record, RecordId, RecordQuery, Result, StoreError,
    store::{RecordStore, UpdateOptions},
};

/// A store call, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Insert,
    Get,
    Select,
    Update,
    Delete,
}

/// In-memory record store implementation for testing.
///
/// This implementation keeps every table in memory and provides the same
/// interface as the PostgreSQL implementation. Failures can be injected per
/// table and operation to exercise partial-failure paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    tables: Arc<RwLock<HashMap<String, Vec<Record>>>>,
    failures: Arc<RwLock<HashSet<(String, StoreOperation)>>>,
}

impl InMemoryRecordStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `operation` on `table` fail with `Unavailable` until reset.
    pub async fn set_fail_on(&self, table: &str, operation: StoreOperation, fail: bool) {
        let mut failures = self.failures.write().await;
        if fail {
            failures.insert((table.to_string(), operation));
        } else {
            failures.remove(&(table.to_string(), operation));
        }
    }

    /// Returns the number of records stored in a table.
    pub async fn record_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Clears all tables and injected failures.
    pub async fn clear(&self) {
        self.tables.write().await.clear();
        self.failures.write().await.clear();
    }

    async fn check_failure(&self, table: &str, operation: StoreOperation) -> Result<()> {
        if self
            .failures
            .read()
            .await
            .contains(&(table.to_string(), operation))
        {
            return Err(StoreError::Unavailable(format!(
                "injected {operation:?} failure on '{table}'"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, table: &str, id: RecordId, fields: Fields) -> Result<Record> {
        self.check_failure(table, StoreOperation::Insert).await?;
        validate_fields(&fields)?;

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        // Unique constraint simulation
        if rows.iter().any(|r| r.id == id) {
            return Err(StoreError::DuplicateId {
                table: table.to_string(),
                id,
            });
        }

        let record = Record::new(table, id, fields);
        rows.push(record.clone());
        Ok(record)
    }

    async fn get(&self, table: &str, id: RecordId) -> Result<Option<Record>> {
        self.check_failure(table, StoreOperation::Get).await?;

        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn select(&self, table: &str, query: RecordQuery) -> Result<Vec<Record>> {
        self.check_failure(table, StoreOperation::Select).await?;

        let tables = self.tables.read().await;
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };

        // Rows are kept in insertion order, which is creation order.
        let matching = rows.iter().filter(|r| query.matches(r)).cloned();
        let skipped = matching.skip(query.offset.unwrap_or(0));
        let records = match query.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        };
        Ok(records)
    }

    async fn update(
        &self,
        table: &str,
        id: RecordId,
        patch: Fields,
        options: UpdateOptions,
    ) -> Result<Option<Record>> {
        self.check_failure(table, StoreOperation::Update).await?;
        validate_fields(&patch)?;

        let mut tables = self.tables.write().await;
        let Some(record) = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
        else {
            return Ok(None);
        };

        // Check the precondition under the same lock as the write
        if let Some((field, expected)) = options.expected
            && record.field(&field) != Some(&expected)
        {
            metrics::counter!("record_store_condition_failures_total").increment(1);
            return Err(StoreError::ConditionFailed {
                table: table.to_string(),
                id,
                field,
                expected,
            });
        }

        record.apply_patch(patch);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, table: &str, id: RecordId) -> Result<Option<Record>> {
        self.check_failure(table, StoreOperation::Delete).await?;

        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(None);
        };
        let removed = rows
            .iter()
            .position(|r| r.id == id)
            .map(|index| rows.remove(index));
        Ok(removed)
    }
}
