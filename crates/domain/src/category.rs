//! Pet and business categories.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::RecordId;
use record_store::{AssetStore, RecordStore};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::repository::{Entity, Repository};

/// Asset bucket holding business category images.
pub const BUSINESS_CATEGORY_IMAGE_BUCKET: &str = "business_categories";

fn require_category_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Category name is required."));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetCategory {
    pub id: RecordId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for PetCategory {
    const TABLE: &'static str = "pet_categories";
    const NAME: &'static str = "Pet category";

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Serialize)]
struct CategoryName<'a> {
    name: &'a str,
}

pub struct PetCategoryService<S: RecordStore> {
    categories: Repository<S, PetCategory>,
}

impl<S: RecordStore> PetCategoryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            categories: Repository::new(store),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<PetCategory> {
        require_category_name(name)?;
        self.categories
            .create(RecordId::new(), &CategoryName { name })
            .await
    }

    pub async fn list(&self) -> Result<Vec<PetCategory>> {
        self.categories.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<PetCategory> {
        self.categories.require(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn rename(&self, id: RecordId, name: &str) -> Result<PetCategory> {
        require_category_name(name)?;
        self.categories.patch(id, &CategoryName { name }).await
    }

    /// Deletes a category. Pets keep their now dangling `category_id`.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<PetCategory> {
        self.categories.delete(id).await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessCategory {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for BusinessCategory {
    const TABLE: &'static str = "business_categories";
    const NAME: &'static str = "Business category";

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBusinessCategory {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BusinessCategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

pub struct BusinessCategoryService<S: RecordStore> {
    categories: Repository<S, BusinessCategory>,
    assets: Arc<dyn AssetStore>,
}

impl<S: RecordStore> BusinessCategoryService<S> {
    pub fn new(store: S, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            categories: Repository::new(store),
            assets,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, cmd: NewBusinessCategory) -> Result<BusinessCategory> {
        require_category_name(&cmd.name)?;
        self.categories.create(RecordId::new(), &cmd).await
    }

    pub async fn list(&self) -> Result<Vec<BusinessCategory>> {
        self.categories.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<BusinessCategory> {
        self.categories.require(id).await
    }

    /// Changes name and/or image. A replaced image is removed from storage
    /// once the record points at the new one.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: RecordId,
        cmd: BusinessCategoryUpdate,
    ) -> Result<BusinessCategory> {
        if let Some(name) = &cmd.name {
            require_category_name(name)?;
        }
        let current = self.categories.require(id).await?;
        let updated = self.categories.patch(id, &cmd).await?;

        if let Some(old) = current.image
            && updated.image.as_deref() != Some(old.as_str())
            && let Err(e) = self.assets.remove(BUSINESS_CATEGORY_IMAGE_BUCKET, &old).await
        {
            tracing::warn!(category_id = %id, image = %old, error = %e, "old category image was not removed");
        }
        Ok(updated)
    }

    /// Deletes a category together with its image.
    ///
    /// The image goes first; if removing it fails the category is kept.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<BusinessCategory> {
        let category = self.categories.require(id).await?;
        if let Some(image) = &category.image {
            self.assets
                .remove(BUSINESS_CATEGORY_IMAGE_BUCKET, image)
                .await?;
        }
        self.categories.delete(id).await
    }
}
