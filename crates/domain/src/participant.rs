//! Participants of events hosted by businesses.

use chrono::{DateTime, Utc};
use common::{RecordId, UserId};
use record_store::RecordStore;
use serde::{Deserialize, Serialize};

use crate::catalog::Business;
use crate::error::Result;
use crate::repository::{Entity, Repository};
use crate::transaction::Transaction;

/// A user attending a business's event, paid through a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParticipant {
    pub id: RecordId,
    pub user_id: UserId,
    pub transaction_id: RecordId,
    pub business_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for EventParticipant {
    const TABLE: &'static str = "event_participants";
    const NAME: &'static str = "Event participant";

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantLink {
    pub user_id: UserId,
    pub transaction_id: RecordId,
    pub business_id: RecordId,
}

pub struct EventParticipantService<S: RecordStore> {
    participants: Repository<S, EventParticipant>,
    transactions: Repository<S, Transaction>,
    businesses: Repository<S, Business>,
}

impl<S: RecordStore + Clone> EventParticipantService<S> {
    pub fn new(store: S) -> Self {
        Self {
            participants: Repository::new(store.clone()),
            transactions: Repository::new(store.clone()),
            businesses: Repository::new(store),
        }
    }
}

impl<S: RecordStore> EventParticipantService<S> {
    async fn ensure_references(&self, link: &ParticipantLink) -> Result<()> {
        self.transactions.require(link.transaction_id).await?;
        self.businesses.require(link.business_id).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, link: ParticipantLink) -> Result<EventParticipant> {
        self.ensure_references(&link).await?;
        self.participants.create(RecordId::new(), &link).await
    }

    pub async fn list(&self) -> Result<Vec<EventParticipant>> {
        self.participants.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<EventParticipant> {
        self.participants.require(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: RecordId, link: ParticipantLink) -> Result<EventParticipant> {
        self.ensure_references(&link).await?;
        self.participants.patch(id, &link).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<EventParticipant> {
        self.participants.delete(id).await
    }
}
