//! Transactions and the pet availability workflow.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use common::{RecordId, UserId};
use record_store::{RecordStore, fields_of};
use serde::{Deserialize, Serialize};

use crate::compensation::{Compensation, CompensationLog};
use crate::error::{DomainError, Result};
use crate::money::Money;
use crate::pet::{Pet, claim_pet, release_pet};
use crate::repository::{Entity, Repository};

/// Status of a transaction.
///
/// Any status may follow any other; only entering or leaving `Cancelled`
/// after creation has side effects on the pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Done,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Done => "done",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransactionStatus::Cancelled)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "done" => Ok(TransactionStatus::Done),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            _ => Err(DomainError::validation(
                "Status must be one of the following: 'pending', 'done', 'cancelled'.",
            )),
        }
    }
}

/// What a transaction sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Pet,
    Product,
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pet" => Ok(TransactionKind::Pet),
            "product" => Ok(TransactionKind::Product),
            _ => Err(DomainError::validation(
                "Type must be one of the following: 'pet', 'product'.",
            )),
        }
    }
}

/// A purchase by a buyer.
///
/// Pet transactions carry the pet and the seller (the pet's owner). Product
/// transactions group product sales and have neither.
///
/// `pet_held` records whether this transaction currently keeps its pet
/// unavailable. Opening always claims the pet, whatever the initial status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub buyer_id: UserId,
    #[serde(default)]
    pub seller_id: Option<UserId>,
    #[serde(default)]
    pub pet_id: Option<RecordId>,
    pub price: Money,
    pub status: TransactionStatus,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub pet_held: bool,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Transaction {
    const TABLE: &'static str = "transactions";
    const NAME: &'static str = "Transaction";

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Serialize)]
struct TransactionBody {
    buyer_id: UserId,
    seller_id: Option<UserId>,
    pet_id: Option<RecordId>,
    price: Money,
    status: TransactionStatus,
    #[serde(rename = "type")]
    kind: TransactionKind,
    pet_held: bool,
    transaction_date: DateTime<Utc>,
}

impl From<&Transaction> for TransactionBody {
    fn from(t: &Transaction) -> Self {
        Self {
            buyer_id: t.buyer_id,
            seller_id: t.seller_id,
            pet_id: t.pet_id,
            price: t.price,
            status: t.status,
            kind: t.kind,
            pet_held: t.pet_held,
            transaction_date: t.transaction_date,
        }
    }
}

/// Command to open a transaction for a pet.
#[derive(Debug, Clone)]
pub struct OpenPetTransaction {
    pub pet_id: RecordId,
    pub price: Money,
    pub status: TransactionStatus,
}

/// Command to open a transaction for product purchases.
#[derive(Debug, Clone)]
pub struct OpenProductTransaction {
    pub price: Money,
    pub status: TransactionStatus,
}

/// Command to change the price and/or status of a transaction.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub price: Option<Money>,
    pub status: Option<TransactionStatus>,
}

#[derive(Debug, Serialize)]
struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TransactionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pet_held: Option<bool>,
}

/// Service for transactions.
///
/// Keeps pet availability in step with the transactions that hold the pet:
/// a pet is unavailable while exactly one transaction has `pet_held` set.
pub struct TransactionService<S: RecordStore> {
    transactions: Repository<S, Transaction>,
    pets: Repository<S, Pet>,
}

impl<S: RecordStore + Clone> TransactionService<S> {
    /// Creates a new transaction service.
    pub fn new(store: S) -> Self {
        Self {
            transactions: Repository::new(store.clone()),
            pets: Repository::new(store),
        }
    }
}

impl<S: RecordStore> TransactionService<S> {
    fn store(&self) -> &S {
        self.transactions.store()
    }

    /// Opens a transaction for a pet on behalf of `buyer`.
    ///
    /// The pet is claimed first (available true -> false), even when the
    /// transaction starts out cancelled; a pet that is already claimed fails
    /// with `PetUnavailable`. The seller is the pet's owner.
    #[tracing::instrument(skip(self), fields(pet_id = %cmd.pet_id))]
    pub async fn open_for_pet(
        &self,
        buyer: UserId,
        cmd: OpenPetTransaction,
    ) -> Result<Transaction> {
        cmd.price.ensure_non_negative("Price")?;
        let pet = self.pets.require(cmd.pet_id).await?;

        claim_pet(self.store(), pet.id).await?;
        let mut log = CompensationLog::new();
        log.record(Compensation::SetAvailability {
            pet_id: pet.id,
            available: true,
        });

        let body = TransactionBody {
            buyer_id: buyer,
            seller_id: Some(pet.owner_id),
            pet_id: Some(pet.id),
            price: cmd.price,
            status: cmd.status,
            kind: TransactionKind::Pet,
            pet_held: true,
            transaction_date: Utc::now(),
        };

        let transaction = match self.transactions.create(RecordId::new(), &body).await {
            Ok(transaction) => transaction,
            Err(e) => return Err(log.unwind(self.store(), e).await),
        };

        metrics::counter!("pet_transactions_opened_total").increment(1);
        tracing::info!(
            transaction_id = %transaction.id,
            status = %transaction.status,
            "pet transaction opened"
        );
        Ok(transaction)
    }

    /// Opens a transaction that product sales can be recorded against.
    #[tracing::instrument(skip(self))]
    pub async fn open_for_products(
        &self,
        buyer: UserId,
        cmd: OpenProductTransaction,
    ) -> Result<Transaction> {
        cmd.price.ensure_non_negative("Price")?;
        let body = TransactionBody {
            buyer_id: buyer,
            seller_id: None,
            pet_id: None,
            price: cmd.price,
            status: cmd.status,
            kind: TransactionKind::Product,
            pet_held: false,
            transaction_date: Utc::now(),
        };
        self.transactions.create(RecordId::new(), &body).await
    }

    pub async fn list(&self) -> Result<Vec<Transaction>> {
        self.transactions.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<Transaction> {
        self.transactions.require(id).await
    }

    /// Changes price and/or status.
    ///
    /// Moving into `Cancelled` releases a held pet; moving out of it claims
    /// the pet again, which fails with `PetUnavailable` if someone else holds
    /// it. A transaction opened as cancelled still holds its pet, so leaving
    /// `Cancelled` then has nothing to claim.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: RecordId, cmd: TransactionUpdate) -> Result<Transaction> {
        if let Some(price) = cmd.price {
            price.ensure_non_negative("Price")?;
        }
        let current = self.transactions.require(id).await?;

        let mut patch = TransactionPatch {
            price: cmd.price,
            status: cmd.status,
            pet_held: None,
        };
        let mut log = CompensationLog::new();
        if let (Some(pet_id), Some(status)) = (current.pet_id, cmd.status) {
            match (current.pet_held, status.is_cancelled()) {
                (true, true) if !current.status.is_cancelled() => {
                    if release_pet(self.store(), pet_id).await?.is_some() {
                        log.record(Compensation::SetAvailability {
                            pet_id,
                            available: false,
                        });
                    } else {
                        tracing::warn!(%pet_id, "pet no longer exists, nothing to release");
                    }
                    patch.pet_held = Some(false);
                }
                (false, false) => {
                    claim_pet(self.store(), pet_id).await?;
                    log.record(Compensation::SetAvailability {
                        pet_id,
                        available: true,
                    });
                    patch.pet_held = Some(true);
                }
                _ => {}
            }
        }

        match self.transactions.patch(id, &patch).await {
            Ok(updated) => Ok(updated),
            Err(e) => Err(log.unwind(self.store(), e).await),
        }
    }

    /// Deletes a transaction. A pet held by it becomes available again.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<Transaction> {
        let removed = self.transactions.delete(id).await?;

        if let Some(pet_id) = removed.pet_id
            && removed.pet_held
        {
            match release_pet(self.store(), pet_id).await {
                Ok(Some(_)) => {}
                Ok(None) => tracing::warn!(%pet_id, "pet no longer exists, nothing to release"),
                Err(e) => {
                    let mut log = CompensationLog::new();
                    log.record(Compensation::ReinsertRecord {
                        table: Transaction::TABLE,
                        id,
                        fields: fields_of(&TransactionBody::from(&removed))?,
                    });
                    return Err(log.unwind(self.store(), e).await);
                }
            }
        }

        Ok(removed)
    }
}
