//! Pet sales: the link between a sold pet and its transaction.

use chrono::{DateTime, Utc};
use common::RecordId;
use record_store::RecordStore;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pet::Pet;
use crate::repository::{Entity, Repository};
use crate::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetSale {
    pub id: RecordId,
    pub transaction_id: RecordId,
    pub pet_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for PetSale {
    const TABLE: &'static str = "pet_sales";
    const NAME: &'static str = "Pet sale";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Command to create or replace a pet sale. Both references must exist.
#[derive(Debug, Clone, Serialize)]
pub struct PetSaleLink {
    pub transaction_id: RecordId,
    pub pet_id: RecordId,
}

pub struct PetSaleService<S: RecordStore> {
    sales: Repository<S, PetSale>,
    transactions: Repository<S, Transaction>,
    pets: Repository<S, Pet>,
}

impl<S: RecordStore + Clone> PetSaleService<S> {
    pub fn new(store: S) -> Self {
        Self {
            sales: Repository::new(store.clone()),
            transactions: Repository::new(store.clone()),
            pets: Repository::new(store),
        }
    }
}

impl<S: RecordStore> PetSaleService<S> {
    async fn ensure_references(&self, link: &PetSaleLink) -> Result<()> {
        self.transactions.require(link.transaction_id).await?;
        self.pets.require(link.pet_id).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, link: PetSaleLink) -> Result<PetSale> {
        self.ensure_references(&link).await?;
        self.sales.create(RecordId::new(), &link).await
    }

    pub async fn list(&self) -> Result<Vec<PetSale>> {
        self.sales.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<PetSale> {
        self.sales.require(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: RecordId, link: PetSaleLink) -> Result<PetSale> {
        self.ensure_references(&link).await?;
        self.sales.patch(id, &link).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<PetSale> {
        self.sales.delete(id).await
    }
}
