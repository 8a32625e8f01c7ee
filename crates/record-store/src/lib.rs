//! Record storage for the marketplace backend.
//!
//! The store is deliberately dumb: table-scoped CRUD, equality filters and a
//! single conditional update primitive. Everything that needs multi-step
//! consistency builds on [`UpdateOptions::expect_field`].

pub mod asset;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use asset::{AssetStore, InMemoryAssetStore};
pub use common::RecordId;
pub use error::{Result, StoreError};
pub use memory::{InMemoryRecordStore, StoreOperation};
pub use postgres::PostgresRecordStore;
pub use query::RecordQuery;
pub use record::{Fields, RESERVED_FIELDS, Record, fields_of};
pub use store::{RecordStore, RecordStoreExt, UpdateOptions};
