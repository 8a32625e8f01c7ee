//! Undo log for multi-step workflows.
//!
//! The store has no multi-call transactions, so a workflow that has to touch
//! several records records an undo step after each write that succeeds. On
//! failure the steps run in reverse order of completion.

use common::RecordId;
use record_store::{Fields, RecordStore, UpdateOptions};

use crate::error::DomainError;
use crate::pet::{claim_pet, release_pet};
use crate::stock::{StockAdjustment, apply_adjustment};

/// A single undo step.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Compensation {
    /// Delete a record the workflow inserted.
    DeleteRecord { table: &'static str, id: RecordId },

    /// Write back the previous values of fields the workflow overwrote.
    RestoreFields {
        table: &'static str,
        id: RecordId,
        fields: Fields,
    },

    /// Re-insert a record the workflow deleted, under its original id.
    ReinsertRecord {
        table: &'static str,
        id: RecordId,
        fields: Fields,
    },

    /// Apply a stock adjustment, typically the inverse of one already made.
    AdjustStock(StockAdjustment),

    /// Put a pet's availability flag back.
    SetAvailability { pet_id: RecordId, available: bool },
}

impl std::fmt::Display for Compensation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compensation::DeleteRecord { table, id } => write!(f, "delete {table}/{id}"),
            Compensation::RestoreFields { table, id, .. } => write!(f, "restore {table}/{id}"),
            Compensation::ReinsertRecord { table, id, .. } => write!(f, "reinsert {table}/{id}"),
            Compensation::AdjustStock(adjustment) => write!(f, "adjust {adjustment}"),
            Compensation::SetAvailability { pet_id, available } => {
                write!(f, "set pets/{pet_id} available={available}")
            }
        }
    }
}

impl Compensation {
    async fn run<S: RecordStore + ?Sized>(&self, store: &S) -> Result<(), DomainError> {
        match self {
            Compensation::DeleteRecord { table, id } => {
                store.delete(table, *id).await?;
            }
            Compensation::RestoreFields { table, id, fields } => {
                let restored = store
                    .update(table, *id, fields.clone(), UpdateOptions::new())
                    .await?;
                if restored.is_none() {
                    return Err(record_store::StoreError::NotFound {
                        table: table.to_string(),
                        id: *id,
                    }
                    .into());
                }
            }
            Compensation::ReinsertRecord { table, id, fields } => {
                store.insert(table, *id, fields.clone()).await?;
            }
            Compensation::AdjustStock(adjustment) => {
                apply_adjustment(store, *adjustment, None).await?;
            }
            Compensation::SetAvailability { pet_id, available } => {
                if *available {
                    release_pet(store, *pet_id).await?;
                } else {
                    claim_pet(store, *pet_id).await?;
                }
            }
        }
        Ok(())
    }
}

/// Ordered undo steps of one workflow run.
#[derive(Debug, Default)]
pub(crate) struct CompensationLog {
    steps: Vec<Compensation>,
}

impl CompensationLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records the undo step for a write that just succeeded.
    pub(crate) fn record(&mut self, step: Compensation) {
        self.steps.push(step);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }

    /// Runs every recorded step in reverse order and returns the error to
    /// report for the failed workflow.
    ///
    /// That is `cause` itself when all steps succeed. Otherwise it is
    /// `CompensationFailed` naming the first step that failed; the remaining
    /// steps still run.
    pub(crate) async fn unwind<S: RecordStore + ?Sized>(
        self,
        store: &S,
        cause: DomainError,
    ) -> DomainError {
        if self.steps.is_empty() {
            return cause;
        }

        metrics::counter!("compensations_total").increment(1);
        tracing::warn!(error = %cause, steps = self.steps.len(), "workflow failed, compensating");

        let mut failure: Option<(String, String)> = None;
        for step in self.steps.iter().rev() {
            match step.run(store).await {
                Ok(()) => tracing::info!(step = %step, "compensation step completed"),
                Err(e) => {
                    metrics::counter!("compensation_failures_total").increment(1);
                    tracing::error!(step = %step, error = %e, "compensation step failed");
                    failure.get_or_insert_with(|| (step.to_string(), e.to_string()));
                }
            }
        }

        match failure {
            Some((step, reason)) => DomainError::CompensationFailed {
                step,
                reason,
                cause: cause.to_string(),
            },
            None => cause,
        }
    }
}
