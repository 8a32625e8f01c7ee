//! Product sale endpoints. Every write here moves product stock.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use common::RecordId;
use domain::{Money, ProductSale, RecordSale, SaleDetails, UpdateSale};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;

const MISSING_FIELDS: &str = "Fields product_id, quantity, and price are required.";

/// Body of both create and update.
#[derive(Debug, Deserialize)]
pub struct SaleRequest {
    pub product_id: Option<RecordId>,
    pub quantity: Option<i64>,
    pub price: Option<Money>,
    pub transaction_id: Option<RecordId>,
}

/// GET /product-sales
///
/// Each sale carries its `total`, `product` and `transaction`.
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<SaleDetails>> {
    Ok(ok(state.sales.list_details().await?))
}

/// GET /product-sales/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<SaleDetails> {
    Ok(ok(state.sales.details(parse_id(&id)?).await?))
}

/// POST /product-sales/create
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<SaleRequest>, JsonRejection>,
) -> CreatedResult<ProductSale> {
    let Json(req) = payload?;
    let cmd = RecordSale {
        product_id: required(req.product_id, MISSING_FIELDS)?,
        quantity: required(req.quantity, MISSING_FIELDS)?,
        price: required(req.price, MISSING_FIELDS)?,
        transaction_id: req.transaction_id,
    };

    let sale = state.sales.record(cmd).await?;
    Ok(created("Product sale created successfully!", sale))
}

/// PUT /product-sales/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<SaleRequest>, JsonRejection>,
) -> ApiResult<ProductSale> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let cmd = UpdateSale {
        product_id: required(req.product_id, MISSING_FIELDS)?,
        quantity: required(req.quantity, MISSING_FIELDS)?,
        price: required(req.price, MISSING_FIELDS)?,
        transaction_id: req.transaction_id,
    };

    let sale = state.sales.update(id, cmd).await?;
    Ok(ok_with("Product sale updated successfully!", sale))
}

/// DELETE /product-sales/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<ProductSale> {
    let sale = state.sales.delete(parse_id(&id)?).await?;
    Ok(ok_with("Product sale deleted and stock restored!", sale))
}
