//! Pets listed for sale.

use chrono::{DateTime, Utc};
use common::{RecordId, UserId};
use record_store::{Fields, RecordStore, UpdateOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::category::PetCategory;
use crate::error::{DomainError, Result};
use crate::money::Money;
use crate::repository::{Entity, Repository};

/// A pet offered by its owner.
///
/// `available` is false while the pet is held by an open transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: RecordId,
    #[serde(rename = "pet")]
    pub name: String,
    pub location: String,
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    pub owner_id: UserId,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Pet {
    const TABLE: &'static str = "pets";
    const NAME: &'static str = "Pet";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Command to list a new pet.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub location: String,
    pub price: Money,
    pub image: Option<String>,
    pub category_id: Option<RecordId>,
}

#[derive(Serialize)]
struct PetBody<'a> {
    pet: &'a str,
    location: &'a str,
    price: Money,
    image: Option<&'a str>,
    category_id: Option<RecordId>,
    owner_id: UserId,
    available: bool,
}

impl NewPet {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.location.trim().is_empty() {
            return Err(DomainError::validation(
                "Fields pet, location, and price are required.",
            ));
        }
        self.price.ensure_non_negative("Price")?;
        Ok(())
    }
}

/// Command to change some fields of a pet.
///
/// Availability is not part of it: only transactions move that flag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PetUpdate {
    #[serde(rename = "pet", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
}

impl PetUpdate {
    fn validate(&self) -> Result<()> {
        let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());
        if blank(&self.name) || blank(&self.location) {
            return Err(DomainError::validation("Fields pet and location cannot be empty."));
        }
        if let Some(price) = self.price {
            price.ensure_non_negative("Price")?;
        }
        Ok(())
    }
}

/// Claims a pet for a transaction: flips `available` from true to false.
///
/// The flip is conditional, so of two concurrent claims only one wins.
pub(crate) async fn claim_pet<S: RecordStore + ?Sized>(store: &S, pet_id: RecordId) -> Result<Pet> {
    let mut patch = Fields::new();
    patch.insert("available".to_string(), json!(false));

    match store
        .update(
            Pet::TABLE,
            pet_id,
            patch,
            UpdateOptions::expect_field("available", true),
        )
        .await
    {
        Ok(Some(record)) => Ok(record.decode()?),
        Ok(None) => Err(DomainError::NotFound {
            entity: Pet::NAME,
            id: pet_id,
        }),
        Err(e) if e.is_condition_failed() => Err(DomainError::PetUnavailable(pet_id)),
        Err(e) => Err(e.into()),
    }
}

/// Makes a pet available again. Returns None if the pet no longer exists.
pub(crate) async fn release_pet<S: RecordStore + ?Sized>(
    store: &S,
    pet_id: RecordId,
) -> Result<Option<Pet>> {
    let mut patch = Fields::new();
    patch.insert("available".to_string(), json!(true));

    match store
        .update(Pet::TABLE, pet_id, patch, UpdateOptions::new())
        .await?
    {
        Some(record) => Ok(Some(record.decode()?)),
        None => Ok(None),
    }
}

/// Service for pet listings.
pub struct PetService<S: RecordStore> {
    pets: Repository<S, Pet>,
    categories: Repository<S, PetCategory>,
}

impl<S: RecordStore + Clone> PetService<S> {
    /// Creates a new pet service.
    pub fn new(store: S) -> Self {
        Self {
            pets: Repository::new(store.clone()),
            categories: Repository::new(store),
        }
    }
}

impl<S: RecordStore> PetService<S> {
    /// Lists a new pet owned by `owner`. New pets start available.
    ///
    /// A given `category_id` must name an existing pet category.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, owner: UserId, cmd: NewPet) -> Result<Pet> {
        cmd.validate()?;
        self.categories.ensure_exists(cmd.category_id).await?;
        let body = PetBody {
            pet: &cmd.name,
            location: &cmd.location,
            price: cmd.price,
            image: cmd.image.as_deref(),
            category_id: cmd.category_id,
            owner_id: owner,
            available: true,
        };
        self.pets.create(RecordId::new(), &body).await
    }

    pub async fn list(&self) -> Result<Vec<Pet>> {
        self.pets.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<Pet> {
        self.pets.require(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: RecordId, cmd: PetUpdate) -> Result<Pet> {
        cmd.validate()?;
        self.categories.ensure_exists(cmd.category_id).await?;
        self.pets.patch(id, &cmd).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<Pet> {
        self.pets.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::PetCategoryService;
    use record_store::InMemoryRecordStore;

    fn rex() -> NewPet {
        NewPet {
            name: "Rex".to_string(),
            location: "Bandung".to_string(),
            price: Money::from_cents(250_000),
            image: None,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn new_pets_are_available_and_owned() {
        let service = PetService::new(InMemoryRecordStore::new());
        let owner = UserId::new();

        let pet = service.create(owner, rex()).await.unwrap();

        assert!(pet.available);
        assert_eq!(pet.owner_id, owner);
        assert_eq!(pet.name, "Rex");
    }

    #[tokio::test]
    async fn pet_name_is_stored_under_pet_key() {
        let store = InMemoryRecordStore::new();
        let service = PetService::new(store.clone());
        let pet = service.create(UserId::new(), rex()).await.unwrap();

        let record = store.get(Pet::TABLE, pet.id).await.unwrap().unwrap();
        assert_eq!(record.fields["pet"], json!("Rex"));
    }

    #[tokio::test]
    async fn create_requires_name_and_location() {
        let service = PetService::new(InMemoryRecordStore::new());
        let mut cmd = rex();
        cmd.location = String::new();

        let result = service.create(UserId::new(), cmd).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn category_must_exist() {
        let store = InMemoryRecordStore::new();
        let service = PetService::new(store.clone());

        let mut cmd = rex();
        cmd.category_id = Some(RecordId::new());
        let err = service.create(UserId::new(), cmd).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: "Pet category",
                ..
            }
        ));
        assert_eq!(store.record_count(Pet::TABLE).await, 0);

        let dogs = PetCategoryService::new(store.clone())
            .create("Dogs")
            .await
            .unwrap();
        let mut cmd = rex();
        cmd.category_id = Some(dogs.id);
        let pet = service.create(UserId::new(), cmd).await.unwrap();
        assert_eq!(pet.category_id, Some(dogs.id));

        let err = service
            .update(
                pet.id,
                PetUpdate {
                    category_id: Some(RecordId::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(service.get(pet.id).await.unwrap().category_id, Some(dogs.id));
    }

    #[tokio::test]
    async fn update_keeps_availability() {
        let service = PetService::new(InMemoryRecordStore::new());
        let pet = service.create(UserId::new(), rex()).await.unwrap();

        let updated = service
            .update(
                pet.id,
                PetUpdate {
                    location: Some("Jakarta".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.location, "Jakarta");
        assert_eq!(updated.name, "Rex");
        assert!(updated.available);
    }

    #[tokio::test]
    async fn second_claim_fails_until_released() {
        let store = InMemoryRecordStore::new();
        let service = PetService::new(store.clone());
        let pet = service.create(UserId::new(), rex()).await.unwrap();

        let claimed = claim_pet(&store, pet.id).await.unwrap();
        assert!(!claimed.available);

        let again = claim_pet(&store, pet.id).await;
        assert!(matches!(again, Err(DomainError::PetUnavailable(id)) if id == pet.id));

        release_pet(&store, pet.id).await.unwrap();
        assert!(claim_pet(&store, pet.id).await.is_ok());
    }

    #[tokio::test]
    async fn claim_missing_pet_is_not_found() {
        let store = InMemoryRecordStore::new();
        let result = claim_pet(&store, RecordId::new()).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn release_missing_pet_returns_none() {
        let store = InMemoryRecordStore::new();
        assert!(release_pet(&store, RecordId::new()).await.unwrap().is_none());
    }
}
