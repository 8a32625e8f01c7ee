//! Businesses and the grooming and photography services on offer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::RecordId;
use record_store::{AssetStore, RecordStore};
use serde::{Deserialize, Serialize};

use crate::category::BusinessCategory;
use crate::error::{DomainError, Result};
use crate::money::Money;
use crate::repository::{Entity, Repository};

/// Asset bucket holding business images.
pub const BUSINESS_IMAGE_BUCKET: &str = "business";

fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Field name is required."));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub business_category_id: Option<RecordId>,
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Business {
    const TABLE: &'static str = "business";
    const NAME: &'static str = "Business";

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBusiness {
    pub name: String,
    pub business_category_id: Option<RecordId>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BusinessUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_category_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

pub struct BusinessService<S: RecordStore> {
    businesses: Repository<S, Business>,
    categories: Repository<S, BusinessCategory>,
    assets: Arc<dyn AssetStore>,
}

impl<S: RecordStore + Clone> BusinessService<S> {
    pub fn new(store: S, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            businesses: Repository::new(store.clone()),
            categories: Repository::new(store),
            assets,
        }
    }
}

impl<S: RecordStore> BusinessService<S> {
    /// Creates a business. A given `business_category_id` must exist.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, cmd: NewBusiness) -> Result<Business> {
        require_name(&cmd.name)?;
        self.categories.ensure_exists(cmd.business_category_id).await?;
        self.businesses.create(RecordId::new(), &cmd).await
    }

    pub async fn list(&self) -> Result<Vec<Business>> {
        self.businesses.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<Business> {
        self.businesses.require(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: RecordId, cmd: BusinessUpdate) -> Result<Business> {
        if let Some(name) = &cmd.name {
            require_name(name)?;
        }
        self.categories.ensure_exists(cmd.business_category_id).await?;
        self.businesses.patch(id, &cmd).await
    }

    /// Deletes a business together with its image.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<Business> {
        let business = self.businesses.require(id).await?;
        if let Some(image) = &business.image {
            self.assets.remove(BUSINESS_IMAGE_BUCKET, image).await?;
        }
        self.businesses.delete(id).await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroomingService {
    pub id: RecordId,
    pub name: String,
    pub price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for GroomingService {
    const TABLE: &'static str = "grooming_services";
    const NAME: &'static str = "Grooming service";

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotographyService {
    pub id: RecordId,
    pub name: String,
    pub price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for PhotographyService {
    const TABLE: &'static str = "photography_services";
    const NAME: &'static str = "Photography service";

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewService {
    pub name: String,
    pub price: Money,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
}

/// Catalog of one kind of priced service.
pub struct ServiceCatalog<S: RecordStore, E: Entity> {
    services: Repository<S, E>,
}

pub type GroomingCatalog<S> = ServiceCatalog<S, GroomingService>;
pub type PhotographyCatalog<S> = ServiceCatalog<S, PhotographyService>;

impl<S: RecordStore, E: Entity> ServiceCatalog<S, E> {
    pub fn new(store: S) -> Self {
        Self {
            services: Repository::new(store),
        }
    }

    #[tracing::instrument(skip(self), fields(table = E::TABLE))]
    pub async fn create(&self, cmd: NewService) -> Result<E> {
        require_name(&cmd.name)?;
        cmd.price.ensure_non_negative("Price")?;
        self.services.create(RecordId::new(), &cmd).await
    }

    pub async fn list(&self) -> Result<Vec<E>> {
        self.services.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<E> {
        self.services.require(id).await
    }

    #[tracing::instrument(skip(self), fields(table = E::TABLE))]
    pub async fn update(&self, id: RecordId, cmd: ServiceUpdate) -> Result<E> {
        if let Some(name) = &cmd.name {
            require_name(name)?;
        }
        if let Some(price) = cmd.price {
            price.ensure_non_negative("Price")?;
        }
        self.services.patch(id, &cmd).await
    }

    #[tracing::instrument(skip(self), fields(table = E::TABLE))]
    pub async fn delete(&self, id: RecordId) -> Result<E> {
        self.services.delete(id).await
    }
}
