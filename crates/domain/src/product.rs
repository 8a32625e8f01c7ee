//! Products and their catalog operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::RecordId;
use record_store::{AssetStore, RecordStore};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::money::Money;
use crate::repository::{Entity, Repository};

/// Asset bucket holding product images.
pub const PRODUCT_IMAGE_BUCKET: &str = "products";

/// A product with a stock count.
///
/// The stock count is only ever moved by sale recording or an explicit
/// product update, and never drops below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub price: Money,
    pub stock: i64,
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    const TABLE: &'static str = "products";
    const NAME: &'static str = "Product";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Command to create a product.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub stock: i64,
    pub image: Option<String>,
}

impl NewProduct {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Field name is required."));
        }
        self.price.ensure_non_negative("Price")?;
        if self.stock < 0 {
            return Err(DomainError::validation("Stock cannot be negative."));
        }
        Ok(())
    }
}

/// Command to change some fields of a product.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductUpdate {
    fn validate(&self) -> Result<()> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::validation("Field name cannot be empty."));
        }
        if let Some(price) = self.price {
            price.ensure_non_negative("Price")?;
        }
        if self.stock.is_some_and(|s| s < 0) {
            return Err(DomainError::validation("Stock cannot be negative."));
        }
        Ok(())
    }
}

/// Service for the product catalog.
pub struct ProductService<S: RecordStore> {
    products: Repository<S, Product>,
    assets: Arc<dyn AssetStore>,
}

impl<S: RecordStore> ProductService<S> {
    /// Creates a new product service.
    pub fn new(store: S, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            products: Repository::new(store),
            assets,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, cmd: NewProduct) -> Result<Product> {
        cmd.validate()?;
        self.products.create(RecordId::new(), &cmd).await
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        self.products.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<Product> {
        self.products.require(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: RecordId, cmd: ProductUpdate) -> Result<Product> {
        cmd.validate()?;
        self.products.patch(id, &cmd).await
    }

    /// Deletes a product together with its image.
    ///
    /// The image goes first; if removing it fails the product is kept.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<Product> {
        let product = self.products.require(id).await?;
        if let Some(image) = &product.image {
            self.assets.remove(PRODUCT_IMAGE_BUCKET, image).await?;
        }
        self.products.delete(id).await
    }
}
