//! Conditional stock writes.
//!
//! Stock is never written blindly: every write is conditioned on the stock
//! count that was read before it, and a conflicting write triggers a
//! re-read. Concurrent sales therefore cannot overwrite each other's
//! decrements.

use common::RecordId;
use record_store::{Fields, RecordStore, UpdateOptions};
use serde_json::json;

use crate::error::{DomainError, Result};
use crate::product::Product;
use crate::repository::Entity;

/// Maximum number of conditional write attempts for one stock adjustment.
pub const MAX_STOCK_ATTEMPTS: u32 = 3;

/// A change to one product's stock: `release` units come back, `take`
/// units go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    pub product_id: RecordId,
    pub release: i64,
    pub take: i64,
}

impl StockAdjustment {
    /// Removes `quantity` units from stock.
    pub fn take(product_id: RecordId, quantity: i64) -> Self {
        Self {
            product_id,
            release: 0,
            take: quantity,
        }
    }

    /// Puts `quantity` units back into stock.
    pub fn release(product_id: RecordId, quantity: i64) -> Self {
        Self {
            product_id,
            release: quantity,
            take: 0,
        }
    }

    /// Puts `release` units back and removes `take` in a single write.
    pub fn swap(product_id: RecordId, release: i64, take: i64) -> Self {
        Self {
            product_id,
            release,
            take,
        }
    }

    /// Returns the adjustment that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            product_id: self.product_id,
            release: self.take,
            take: self.release,
        }
    }
}

impl std::fmt::Display for StockAdjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stock of {} (+{} -{})",
            self.product_id, self.release, self.take
        )
    }
}

/// Outcome of a successful stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub product_id: RecordId,
    pub before: i64,
    pub after: i64,
    pub attempts: u32,
}

async fn load_product<S: RecordStore + ?Sized>(store: &S, id: RecordId) -> Result<Product> {
    match store.get(Product::TABLE, id).await? {
        Some(record) => Ok(record.decode()?),
        None => Err(DomainError::NotFound {
            entity: Product::NAME,
            id,
        }),
    }
}

/// Units on hand once `release` units come back, or a validation error if
/// the count no longer fits.
pub(crate) fn stock_with_release(stock: i64, release: i64) -> Result<i64> {
    stock.checked_add(release).ok_or_else(|| {
        DomainError::validation(format!(
            "Stock cannot exceed {} units.",
            i64::MAX
        ))
    })
}

/// Applies an adjustment with compare-and-swap, re-reading on conflict.
///
/// `observed` is a product snapshot the caller already holds; it is used for
/// the first attempt instead of reading again. Fails with
/// `InsufficientStock` if the adjustment would drive stock below zero, and
/// with `StockConflict` once `MAX_STOCK_ATTEMPTS` writes have lost a race.
pub(crate) async fn apply_adjustment<S: RecordStore + ?Sized>(
    store: &S,
    adjustment: StockAdjustment,
    observed: Option<Product>,
) -> Result<StockChange> {
    let mut snapshot = observed;

    for attempt in 1..=MAX_STOCK_ATTEMPTS {
        let product = match snapshot.take() {
            Some(product) => product,
            None => load_product(store, adjustment.product_id).await?,
        };

        let available = stock_with_release(product.stock, adjustment.release)?;
        if available < adjustment.take {
            return Err(DomainError::InsufficientStock {
                available,
                requested: adjustment.take,
            });
        }
        let after = available - adjustment.take;

        let mut patch = Fields::new();
        patch.insert("stock".to_string(), json!(after));
        let guard = UpdateOptions::expect_field("stock", product.stock);

        match store
            .update(Product::TABLE, adjustment.product_id, patch, guard)
            .await
        {
            Ok(Some(_)) => {
                return Ok(StockChange {
                    product_id: adjustment.product_id,
                    before: product.stock,
                    after,
                    attempts: attempt,
                });
            }
            Ok(None) => {
                return Err(DomainError::NotFound {
                    entity: Product::NAME,
                    id: adjustment.product_id,
                });
            }
            Err(e) if e.is_condition_failed() => {
                metrics::counter!("stock_conflicts_total").increment(1);
                tracing::debug!(
                    product_id = %adjustment.product_id,
                    attempt,
                    "stock changed concurrently, retrying"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(DomainError::StockConflict {
        product_id: adjustment.product_id,
        attempts: MAX_STOCK_ATTEMPTS,
    })
}
