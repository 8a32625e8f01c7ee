//! Pet sale endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use common::RecordId;
use domain::{PetSale, PetSaleLink};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PetSaleRequest {
    pub transaction_id: Option<RecordId>,
    pub pet_id: Option<RecordId>,
}

impl TryFrom<PetSaleRequest> for PetSaleLink {
    type Error = ApiError;

    fn try_from(req: PetSaleRequest) -> Result<Self, ApiError> {
        const MISSING: &str = "Fields transaction_id and pet_id are required.";
        Ok(PetSaleLink {
            transaction_id: required(req.transaction_id, MISSING)?,
            pet_id: required(req.pet_id, MISSING)?,
        })
    }
}

/// GET /pet-sales
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<PetSale>> {
    Ok(ok(state.pet_sales.list().await?))
}

/// GET /pet-sales/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<PetSale> {
    Ok(ok(state.pet_sales.get(parse_id(&id)?).await?))
}

/// POST /pet-sales/create
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<PetSaleRequest>, JsonRejection>,
) -> CreatedResult<PetSale> {
    let Json(req) = payload?;
    let sale = state.pet_sales.create(req.try_into()?).await?;
    Ok(created("Pet sale created successfully!", sale))
}

/// PUT /pet-sales/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<PetSaleRequest>, JsonRejection>,
) -> ApiResult<PetSale> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let sale = state.pet_sales.update(id, req.try_into()?).await?;
    Ok(ok_with("Pet sale updated successfully!", sale))
}

/// DELETE /pet-sales/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<PetSale> {
    let sale = state.pet_sales.delete(parse_id(&id)?).await?;
    Ok(ok_with("Pet sale deleted successfully!", sale))
}
