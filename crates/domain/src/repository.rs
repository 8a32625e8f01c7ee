//! Typed access to a single table of the record store.

use std::marker::PhantomData;

use common::RecordId;
use record_store::{Fields, RecordQuery, RecordStore, UpdateOptions, fields_of};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DomainError, Result};

/// An entity persisted as one record of a store table.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Table the entity lives in.
    const TABLE: &'static str;

    /// Human-readable name, used in error messages.
    const NAME: &'static str;

    /// Returns the entity's identifier.
    fn id(&self) -> RecordId;
}

/// Repository for loading and persisting entities of one type.
///
/// Every method maps directly onto a single store call, so any
/// consistency across several calls is the caller's job.
pub struct Repository<S, E>
where
    S: RecordStore,
    E: Entity,
{
    store: S,
    _phantom: PhantomData<fn() -> E>,
}

impl<S, E> Clone for Repository<S, E>
where
    S: RecordStore + Clone,
    E: Entity,
{
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

impl<S, E> Repository<S, E>
where
    S: RecordStore,
    E: Entity,
{
    /// Creates a new repository over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn not_found(id: RecordId) -> DomainError {
        DomainError::NotFound {
            entity: E::NAME,
            id,
        }
    }

    /// Inserts a new entity built from `body` under `id`.
    pub async fn create<B: Serialize + Sync>(&self, id: RecordId, body: &B) -> Result<E> {
        let fields = fields_of(body)?;
        let record = self.store.insert(E::TABLE, id, fields).await?;
        Ok(record.decode()?)
    }

    /// Loads an entity, returning None if it doesn't exist.
    pub async fn get(&self, id: RecordId) -> Result<Option<E>> {
        match self.store.get(E::TABLE, id).await? {
            Some(record) => Ok(Some(record.decode()?)),
            None => Ok(None),
        }
    }

    /// Loads an entity, failing with `NotFound` if it doesn't exist.
    pub async fn require(&self, id: RecordId) -> Result<E> {
        self.get(id).await?.ok_or_else(|| Self::not_found(id))
    }

    /// Checks an optional reference: `NotFound` if it is set but missing.
    pub async fn ensure_exists(&self, id: Option<RecordId>) -> Result<()> {
        if let Some(id) = id {
            self.require(id).await?;
        }
        Ok(())
    }

    /// Lists every entity, oldest first.
    pub async fn list(&self) -> Result<Vec<E>> {
        self.list_where(RecordQuery::new()).await
    }

    /// Lists the entities matching a query, oldest first.
    pub async fn list_where(&self, query: RecordQuery) -> Result<Vec<E>> {
        self.store
            .select(E::TABLE, query)
            .await?
            .iter()
            .map(|record| record.decode().map_err(DomainError::from))
            .collect()
    }

    /// Merges the serialized `body` into an existing entity.
    ///
    /// Fields that `body` skips while serializing are left untouched.
    pub async fn patch<B: Serialize + Sync>(&self, id: RecordId, body: &B) -> Result<E> {
        let fields = fields_of(body)?;
        self.update(id, fields, UpdateOptions::new())
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Applies a raw patch, optionally guarded by an expected field value.
    pub async fn update(
        &self,
        id: RecordId,
        patch: Fields,
        options: UpdateOptions,
    ) -> Result<Option<E>> {
        match self.store.update(E::TABLE, id, patch, options).await? {
            Some(record) => Ok(Some(record.decode()?)),
            None => Ok(None),
        }
    }

    /// Deletes an entity, failing with `NotFound` if it doesn't exist.
    pub async fn delete(&self, id: RecordId) -> Result<E> {
        match self.store.delete(E::TABLE, id).await? {
            Some(record) => Ok(record.decode()?),
            None => Err(Self::not_found(id)),
        }
    }
}
