//! Product sales and the inventory-consistent sale workflow.
//!
//! Every sale record holds units taken out of a product's stock. Creating,
//! changing or deleting a sale moves those units in or out of stock, so that
//! a product's stock plus the quantities of its outstanding sales stays
//! constant. Each workflow is a short sequence of store calls:
//!
//! 1. validate and read what is needed
//! 2. write the sale record and log how to undo that write
//! 3. adjust stock with a conditional write (see [`crate::stock`])
//! 4. on failure, undo step 2 from the log
//!
//! A failure during undo surfaces as `CompensationFailed`.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use common::RecordId;
use record_store::{RecordStore, fields_of};
use serde::{Deserialize, Serialize};

use crate::compensation::{Compensation, CompensationLog};
use crate::error::{DomainError, Result};
use crate::money::Money;
use crate::product::Product;
use crate::repository::{Entity, Repository};
use crate::stock::{StockAdjustment, StockChange, apply_adjustment, stock_with_release};
use crate::transaction::Transaction;

/// A sale of some units of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSale {
    pub id: RecordId,
    pub product_id: RecordId,
    #[serde(default)]
    pub transaction_id: Option<RecordId>,
    pub quantity: i64,
    pub price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductSale {
    /// Total amount of the sale (quantity * unit price).
    pub fn total(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// A sale together with the records it references, as shown to clients.
///
/// `product` or `transaction` is None when the referenced record is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleDetails {
    #[serde(flatten)]
    pub sale: ProductSale,
    pub total: Money,
    pub product: Option<Product>,
    pub transaction: Option<Transaction>,
}

impl SaleDetails {
    fn new(sale: ProductSale, product: Option<Product>, transaction: Option<Transaction>) -> Self {
        Self {
            total: sale.total(),
            sale,
            product,
            transaction,
        }
    }
}

impl Entity for ProductSale {
    const TABLE: &'static str = "product_sales";
    const NAME: &'static str = "Product sale";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// The stored fields of a sale, minus the store-managed ones.
#[derive(Debug, Clone, Serialize)]
struct SaleBody {
    product_id: RecordId,
    transaction_id: Option<RecordId>,
    quantity: i64,
    price: Money,
}

impl From<&ProductSale> for SaleBody {
    fn from(sale: &ProductSale) -> Self {
        Self {
            product_id: sale.product_id,
            transaction_id: sale.transaction_id,
            quantity: sale.quantity,
            price: sale.price,
        }
    }
}

fn validate_line(quantity: i64, price: Money) -> Result<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("Quantity must be greater than zero."));
    }
    price.ensure_non_negative("Price")?;
    Ok(())
}

/// Command to record a new sale.
#[derive(Debug, Clone)]
pub struct RecordSale {
    pub product_id: RecordId,
    pub quantity: i64,
    pub price: Money,
    pub transaction_id: Option<RecordId>,
}

impl RecordSale {
    pub fn new(product_id: RecordId, quantity: i64, price: Money) -> Self {
        Self {
            product_id,
            quantity,
            price,
            transaction_id: None,
        }
    }

    pub fn with_transaction(mut self, transaction_id: RecordId) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }
}

/// Command to change an existing sale.
///
/// `transaction_id` left as None keeps the sale's current transaction.
#[derive(Debug, Clone)]
pub struct UpdateSale {
    pub product_id: RecordId,
    pub quantity: i64,
    pub price: Money,
    pub transaction_id: Option<RecordId>,
}

/// Records product sales while keeping product stock consistent.
pub struct SaleRecorder<S: RecordStore> {
    sales: Repository<S, ProductSale>,
    products: Repository<S, Product>,
    transactions: Repository<S, Transaction>,
}

impl<S: RecordStore + Clone> SaleRecorder<S> {
    /// Creates a new sale recorder over the given store.
    pub fn new(store: S) -> Self {
        Self {
            sales: Repository::new(store.clone()),
            products: Repository::new(store.clone()),
            transactions: Repository::new(store),
        }
    }
}

impl<S: RecordStore> SaleRecorder<S> {
    fn store(&self) -> &S {
        self.sales.store()
    }

    pub async fn list(&self) -> Result<Vec<ProductSale>> {
        self.sales.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<ProductSale> {
        self.sales.require(id).await
    }

    /// Lists sales with their product and transaction embedded.
    pub async fn list_details(&self) -> Result<Vec<SaleDetails>> {
        let sales = self.sales.list().await?;
        let mut products: HashMap<RecordId, Product> = self
            .products
            .list()
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let transactions: HashMap<RecordId, Transaction> = self
            .transactions
            .list()
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        Ok(sales
            .into_iter()
            .map(|sale| {
                let product = products.get(&sale.product_id).cloned();
                let transaction = sale
                    .transaction_id
                    .and_then(|id| transactions.get(&id).cloned());
                SaleDetails::new(sale, product, transaction)
            })
            .collect())
    }

    /// One sale with its product and transaction embedded.
    pub async fn details(&self, id: RecordId) -> Result<SaleDetails> {
        let sale = self.sales.require(id).await?;
        let product = self.products.get(sale.product_id).await?;
        let transaction = match sale.transaction_id {
            Some(transaction_id) => self.transactions.get(transaction_id).await?,
            None => None,
        };
        Ok(SaleDetails::new(sale, product, transaction))
    }

    async fn ensure_transaction(&self, transaction_id: Option<RecordId>) -> Result<()> {
        if let Some(id) = transaction_id {
            self.transactions.require(id).await?;
        }
        Ok(())
    }

    /// Records a sale and takes its quantity out of stock.
    ///
    /// Fails with `InsufficientStock` (nothing written) if the product has
    /// fewer units than requested. If the stock write fails after the sale
    /// record was inserted, the record is deleted again.
    #[tracing::instrument(
        skip(self),
        fields(product_id = %cmd.product_id, quantity = cmd.quantity)
    )]
    pub async fn record(&self, cmd: RecordSale) -> Result<ProductSale> {
        let started = Instant::now();
        validate_line(cmd.quantity, cmd.price)?;
        self.ensure_transaction(cmd.transaction_id).await?;

        let product = self.products.require(cmd.product_id).await?;
        if product.stock < cmd.quantity {
            return Err(DomainError::InsufficientStock {
                available: product.stock,
                requested: cmd.quantity,
            });
        }

        let body = SaleBody {
            product_id: cmd.product_id,
            transaction_id: cmd.transaction_id,
            quantity: cmd.quantity,
            price: cmd.price,
        };
        let sale = self.sales.create(RecordId::new(), &body).await?;

        let mut log = CompensationLog::new();
        log.record(Compensation::DeleteRecord {
            table: ProductSale::TABLE,
            id: sale.id,
        });

        let adjustment = StockAdjustment::take(product.id, cmd.quantity);
        let change = match apply_adjustment(self.store(), adjustment, Some(product)).await {
            Ok(change) => change,
            Err(e) => return Err(log.unwind(self.store(), e).await),
        };

        metrics::counter!("product_sales_recorded_total").increment(1);
        record_duration("record", started);
        log_stock_change(sale.id, &change, "product sale recorded");
        Ok(sale)
    }

    /// Changes a sale and reconciles stock with the new quantity.
    ///
    /// For the same product the stock becomes `stock + old - new` in one
    /// conditional write. When the product changes, the old quantity goes
    /// back to the old product and the new quantity comes out of the new
    /// one. Any failure restores the sale and undoes stock already moved.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: RecordId, cmd: UpdateSale) -> Result<ProductSale> {
        let started = Instant::now();
        validate_line(cmd.quantity, cmd.price)?;

        let current = self.sales.require(id).await?;
        self.ensure_transaction(cmd.transaction_id).await?;

        let target = self.products.require(cmd.product_id).await?;
        let same_product = current.product_id == target.id;
        let released = if same_product { current.quantity } else { 0 };
        let available = stock_with_release(target.stock, released)?;
        if available < cmd.quantity {
            return Err(DomainError::InsufficientStock {
                available,
                requested: cmd.quantity,
            });
        }

        let previous = fields_of(&SaleBody::from(&current))?;
        let body = SaleBody {
            product_id: cmd.product_id,
            transaction_id: cmd.transaction_id.or(current.transaction_id),
            quantity: cmd.quantity,
            price: cmd.price,
        };
        let updated = self.sales.patch(id, &body).await?;

        let mut log = CompensationLog::new();
        log.record(Compensation::RestoreFields {
            table: ProductSale::TABLE,
            id,
            fields: previous,
        });

        let result = if same_product {
            let adjustment = StockAdjustment::swap(target.id, current.quantity, cmd.quantity);
            apply_adjustment(self.store(), adjustment, Some(target)).await
        } else {
            self.move_between_products(&current, target, cmd.quantity, &mut log)
                .await
        };

        let change = match result {
            Ok(change) => change,
            Err(e) => return Err(log.unwind(self.store(), e).await),
        };

        record_duration("update", started);
        log_stock_change(id, &change, "product sale updated");
        Ok(updated)
    }

    /// Returns the sale's units to its old product, then takes the new
    /// quantity from the new product. Returns the change to the new product.
    async fn move_between_products(
        &self,
        current: &ProductSale,
        target: Product,
        quantity: i64,
        log: &mut CompensationLog,
    ) -> Result<StockChange> {
        let give_back = StockAdjustment::release(current.product_id, current.quantity);
        match apply_adjustment(self.store(), give_back, None).await {
            Ok(_) => log.record(Compensation::AdjustStock(give_back.inverse())),
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    product_id = %current.product_id,
                    "previous product no longer exists, nothing to restore"
                );
            }
            Err(e) => return Err(e),
        }

        let take = StockAdjustment::take(target.id, quantity);
        apply_adjustment(self.store(), take, Some(target)).await
    }

    /// Deletes a sale and puts its quantity back into stock.
    ///
    /// If the product is gone the deletion still succeeds. If the stock
    /// write fails for any other reason, the sale is re-inserted under its
    /// original id.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<ProductSale> {
        let started = Instant::now();
        let removed = self.sales.delete(id).await?;

        let restore = StockAdjustment::release(removed.product_id, removed.quantity);
        match apply_adjustment(self.store(), restore, None).await {
            Ok(change) => log_stock_change(id, &change, "product sale deleted, stock restored"),
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    sale_id = %id,
                    product_id = %removed.product_id,
                    "product no longer exists, sale deleted without restoring stock"
                );
            }
            Err(e) => {
                let mut log = CompensationLog::new();
                log.record(Compensation::ReinsertRecord {
                    table: ProductSale::TABLE,
                    id,
                    fields: fields_of(&SaleBody::from(&removed))?,
                });
                return Err(log.unwind(self.store(), e).await);
            }
        }

        record_duration("delete", started);
        Ok(removed)
    }
}

fn record_duration(operation: &'static str, started: Instant) {
    metrics::histogram!("sale_workflow_duration_seconds", "operation" => operation)
        .record(started.elapsed().as_secs_f64());
}

fn log_stock_change(sale_id: RecordId, change: &StockChange, message: &'static str) {
    tracing::info!(
        %sale_id,
        product_id = %change.product_id,
        stock_before = change.before,
        stock_after = change.after,
        attempts = change.attempts,
        "{message}"
    );
}
