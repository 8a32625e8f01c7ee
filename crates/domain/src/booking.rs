//! Scheduled appointments paid through a transaction: grooming reservations
//! and photography sessions.

use chrono::{DateTime, Utc};
use common::RecordId;
use record_store::RecordStore;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::money::Money;
use crate::repository::{Entity, Repository};
use crate::transaction::{Transaction, TransactionStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroomingReservation {
    pub id: RecordId,
    pub transaction_id: RecordId,
    pub price: Money,
    pub schedule: DateTime<Utc>,
    pub service: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for GroomingReservation {
    const TABLE: &'static str = "grooming_reservations";
    const NAME: &'static str = "Grooming reservation";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// A booked photo shoot. Its status follows the transaction vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotographySession {
    pub id: RecordId,
    pub transaction_id: RecordId,
    pub price: Money,
    pub schedule: DateTime<Utc>,
    pub service: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for PhotographySession {
    const TABLE: &'static str = "photography_sessions";
    const NAME: &'static str = "Photography session";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Command to book an appointment.
///
/// `status` is only stored for bookings that carry one.
#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub transaction_id: RecordId,
    pub price: Money,
    pub schedule: DateTime<Utc>,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
}

fn require_service(service: &str) -> Result<()> {
    if service.trim().is_empty() {
        return Err(DomainError::validation("Field service is required."));
    }
    Ok(())
}

/// Bookings of one kind, each tied to an existing transaction.
pub struct BookingService<S: RecordStore, E: Entity> {
    bookings: Repository<S, E>,
    transactions: Repository<S, Transaction>,
}

pub type GroomingReservations<S> = BookingService<S, GroomingReservation>;
pub type PhotographySessions<S> = BookingService<S, PhotographySession>;

impl<S: RecordStore + Clone, E: Entity> BookingService<S, E> {
    pub fn new(store: S) -> Self {
        Self {
            bookings: Repository::new(store.clone()),
            transactions: Repository::new(store),
        }
    }
}

impl<S: RecordStore, E: Entity> BookingService<S, E> {
    #[tracing::instrument(skip(self), fields(table = E::TABLE))]
    pub async fn create(&self, cmd: NewBooking) -> Result<E> {
        cmd.price.ensure_non_negative("Price")?;
        require_service(&cmd.service)?;
        self.transactions.require(cmd.transaction_id).await?;
        self.bookings.create(RecordId::new(), &cmd).await
    }

    pub async fn list(&self) -> Result<Vec<E>> {
        self.bookings.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<E> {
        self.bookings.require(id).await
    }

    #[tracing::instrument(skip(self), fields(table = E::TABLE))]
    pub async fn update(&self, id: RecordId, cmd: BookingUpdate) -> Result<E> {
        if let Some(price) = cmd.price {
            price.ensure_non_negative("Price")?;
        }
        if let Some(service) = &cmd.service {
            require_service(service)?;
        }
        self.transactions.ensure_exists(cmd.transaction_id).await?;
        self.bookings.patch(id, &cmd).await
    }

    #[tracing::instrument(skip(self), fields(table = E::TABLE))]
    pub async fn delete(&self, id: RecordId) -> Result<E> {
        self.bookings.delete(id).await
    }
}
