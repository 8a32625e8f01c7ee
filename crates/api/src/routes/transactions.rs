//! Transaction endpoints. Opening a pet transaction claims the pet.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use common::RecordId;
use domain::{
    Money, OpenPetTransaction, OpenProductTransaction, Transaction, TransactionKind,
    TransactionStatus, TransactionUpdate,
};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;
use crate::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub pet_id: Option<RecordId>,
    pub price: Option<Money>,
    pub status: Option<String>,
    /// `pet` (default) or `product`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub price: Option<Money>,
    pub status: Option<String>,
}

/// GET /transactions
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<Transaction>> {
    Ok(ok(state.transactions.list().await?))
}

/// GET /transactions/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Transaction> {
    Ok(ok(state.transactions.get(parse_id(&id)?).await?))
}

/// POST /transactions/create. The caller is the buyer.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(AuthenticatedUser(buyer)): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> CreatedResult<Transaction> {
    let Json(req) = payload?;
    let kind = match req.kind.as_deref() {
        None => TransactionKind::Pet,
        Some(kind) => kind.parse()?,
    };

    let transaction = match kind {
        TransactionKind::Pet => {
            const MISSING: &str = "All fields (pet_id, price, status) are required.";
            let cmd = OpenPetTransaction {
                pet_id: required(req.pet_id, MISSING)?,
                price: required(req.price, MISSING)?,
                status: required(req.status, MISSING)?.parse()?,
            };
            state.transactions.open_for_pet(buyer, cmd).await?
        }
        TransactionKind::Product => {
            const MISSING: &str = "All fields (price, status) are required.";
            let cmd = OpenProductTransaction {
                price: required(req.price, MISSING)?,
                status: required(req.status, MISSING)?.parse()?,
            };
            state.transactions.open_for_products(buyer, cmd).await?
        }
    };

    Ok(created("Transaction created successfully!", transaction))
}

/// PUT /transactions/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> ApiResult<Transaction> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let status = req
        .status
        .as_deref()
        .map(str::parse::<TransactionStatus>)
        .transpose()?;

    let cmd = TransactionUpdate {
        price: req.price,
        status,
    };
    let transaction = state.transactions.update(id, cmd).await?;
    Ok(ok_with("Transaction updated successfully!", transaction))
}

/// DELETE /transactions/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Transaction> {
    let transaction = state.transactions.delete(parse_id(&id)?).await?;
    Ok(ok_with("Transaction deleted successfully!", transaction))
}
