use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    PgPool, Row,
    postgres::{PgPoolOptions, PgRow},
};
use uuid::Uuid;

use crate::record::validate_fields;
use crate::{
    Fields, Record, RecordId, RecordQuery, Result, StoreError,
    store::{RecordStore, UpdateOptions},
};

/// PostgreSQL-backed record store implementation.
///
/// Every table lives in a single `records` relation keyed by
/// `(table_name, id)`, with the body kept as a JSONB document.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a new PostgreSQL record store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool of at most `max_connections` to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_record(row: PgRow) -> Result<Record> {
        let fields = match row.try_get::<Value, _>("fields")? {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::InvalidFields(format!(
                    "stored document is not an object: {other}"
                )));
            }
        };

        Ok(Record {
            id: RecordId::from_uuid(row.try_get::<Uuid, _>("id")?),
            table: row.try_get("table_name")?,
            fields,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn insert(&self, table: &str, id: RecordId, fields: Fields) -> Result<Record> {
        validate_fields(&fields)?;

        let row = sqlx::query(
            r#"
            INSERT INTO records (table_name, id, fields)
            VALUES ($1, $2, $3)
            RETURNING table_name, id, fields, created_at, updated_at
            "#,
        )
        .bind(table)
        .bind(id.as_uuid())
        .bind(Value::Object(fields))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::DuplicateId {
                    table: table.to_string(),
                    id,
                };
            }
            StoreError::Database(e)
        })?;

        Self::row_to_record(row)
    }

    async fn get(&self, table: &str, id: RecordId) -> Result<Option<Record>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT table_name, id, fields, created_at, updated_at
            FROM records
            WHERE table_name = $1 AND id = $2
            "#,
        )
        .bind(table)
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn select(&self, table: &str, query: RecordQuery) -> Result<Vec<Record>> {
        let mut sql = String::from(
            "SELECT table_name, id, fields, created_at, updated_at FROM records \
             WHERE table_name = $1 AND fields @> $2 ORDER BY created_at ASC, seq ASC",
        );
        let mut param_count = 2;

        if query.limit.is_some() {
            param_count += 1;
            sql.push_str(&format!(" LIMIT ${param_count}"));
        }
        if query.offset.is_some() {
            param_count += 1;
            sql.push_str(&format!(" OFFSET ${param_count}"));
        }

        let mut sqlx_query = sqlx::query(&sql)
            .bind(table)
            .bind(query.filter_document());

        if let Some(limit) = query.limit {
            sqlx_query = sqlx_query.bind(limit as i64);
        }
        if let Some(offset) = query.offset {
            sqlx_query = sqlx_query.bind(offset as i64);
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn update(
        &self,
        table: &str,
        id: RecordId,
        patch: Fields,
        options: UpdateOptions,
    ) -> Result<Option<Record>> {
        validate_fields(&patch)?;

        let row: Option<PgRow> = match &options.expected {
            None => {
                sqlx::query(
                    r#"
                    UPDATE records
                    SET fields = fields || $3, updated_at = NOW()
                    WHERE table_name = $1 AND id = $2
                    RETURNING table_name, id, fields, created_at, updated_at
                    "#,
                )
                .bind(table)
                .bind(id.as_uuid())
                .bind(Value::Object(patch))
                .fetch_optional(&self.pool)
                .await?
            }
            Some((field, expected)) => {
                // The comparison and the write happen in one statement
                sqlx::query(
                    r#"
                    UPDATE records
                    SET fields = fields || $3, updated_at = NOW()
                    WHERE table_name = $1 AND id = $2 AND fields -> $4 = $5
                    RETURNING table_name, id, fields, created_at, updated_at
                    "#,
                )
                .bind(table)
                .bind(id.as_uuid())
                .bind(Value::Object(patch))
                .bind(field)
                .bind(expected)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        match (row, options.expected) {
            (Some(row), _) => Ok(Some(Self::row_to_record(row)?)),
            (None, None) => Ok(None),
            (None, Some((field, expected))) => {
                // Nothing matched: either the record is gone or the guard failed
                let exists: bool = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM records WHERE table_name = $1 AND id = $2)",
                )
                .bind(table)
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

                if !exists {
                    return Ok(None);
                }

                metrics::counter!("record_store_condition_failures_total").increment(1);
                Err(StoreError::ConditionFailed {
                    table: table.to_string(),
                    id,
                    field,
                    expected,
                })
            }
        }
    }

    async fn delete(&self, table: &str, id: RecordId) -> Result<Option<Record>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            DELETE FROM records
            WHERE table_name = $1 AND id = $2
            RETURNING table_name, id, fields, created_at, updated_at
            "#,
        )
        .bind(table)
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }
}
