//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p record-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use record_store::{
    Fields, PostgresRecordStore, RecordId, RecordQuery, RecordStore, RecordStoreExt, StoreError,
    UpdateOptions,
};
use serde_json::json;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_records_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresRecordStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE records")
        .execute(&pool)
        .await
        .unwrap();

    PostgresRecordStore::new(pool)
}

fn product(name: &str, stock: i64) -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".to_string(), json!(name));
    fields.insert("stock".to_string(), json!(stock));
    fields
}

fn stock_patch(stock: i64) -> Fields {
    let mut fields = Fields::new();
    fields.insert("stock".to_string(), json!(stock));
    fields
}

#[tokio::test]
async fn insert_and_get_record() {
    let store = get_test_store().await;
    let id = RecordId::new();

    let inserted = store
        .insert("products", id, product("Leash", 10))
        .await
        .unwrap();
    assert_eq!(inserted.id, id);
    assert_eq!(inserted.table, "products");

    let fetched = store.get("products", id).await.unwrap().unwrap();
    assert_eq!(fetched.fields["name"], json!("Leash"));
    assert_eq!(fetched.fields["stock"], json!(10));
}

#[tokio::test]
async fn duplicate_id_maps_to_store_error() {
    let store = get_test_store().await;
    let id = RecordId::new();
    store
        .insert("products", id, product("Leash", 10))
        .await
        .unwrap();

    let result = store.insert("products", id, product("Collar", 1)).await;
    assert!(matches!(result, Err(StoreError::DuplicateId { .. })));

    // Same id in another table is fine
    store.insert("pets", id, product("Rex", 1)).await.unwrap();
}

#[tokio::test]
async fn select_with_filters_limit_and_offset() {
    let store = get_test_store().await;
    for (name, stock) in [("a", 1), ("b", 0), ("c", 1), ("d", 1)] {
        store
            .insert("products", RecordId::new(), product(name, stock))
            .await
            .unwrap();
    }

    let all = store.select_all("products").await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].fields["name"], json!("a"));

    let page = store
        .select(
            "products",
            RecordQuery::new().eq("stock", 1).offset(1).limit(1),
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].fields["name"], json!("c"));
}

#[tokio::test]
async fn conditional_update_applies_when_value_matches() {
    let store = get_test_store().await;
    let id = RecordId::new();
    store
        .insert("products", id, product("Leash", 10))
        .await
        .unwrap();

    let updated = store
        .update(
            "products",
            id,
            stock_patch(6),
            UpdateOptions::expect_field("stock", 10),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.fields["stock"], json!(6));
    assert_eq!(updated.fields["name"], json!("Leash"));
    assert!(updated.updated_at >= updated.created_at);
}

#[tokio::test]
async fn conditional_update_conflict() {
    let store = get_test_store().await;
    let id = RecordId::new();
    store
        .insert("products", id, product("Leash", 10))
        .await
        .unwrap();

    let result = store
        .update(
            "products",
            id,
            stock_patch(6),
            UpdateOptions::expect_field("stock", 9),
        )
        .await;
    assert!(matches!(result, Err(StoreError::ConditionFailed { .. })));

    let stored = store.require("products", id).await.unwrap();
    assert_eq!(stored.fields["stock"], json!(10));
}

#[tokio::test]
async fn update_missing_record_returns_none() {
    let store = get_test_store().await;

    let result = store
        .update(
            "products",
            RecordId::new(),
            stock_patch(1),
            UpdateOptions::expect_field("stock", 2),
        )
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_returns_removed_record() {
    let store = get_test_store().await;
    let id = RecordId::new();
    store
        .insert("products", id, product("Leash", 10))
        .await
        .unwrap();

    let removed = store.delete("products", id).await.unwrap();
    assert_eq!(removed.map(|r| r.id), Some(id));
    assert!(!store.exists("products", id).await.unwrap());
    assert!(store.delete("products", id).await.unwrap().is_none());
}
