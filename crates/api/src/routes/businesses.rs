//! Business directory endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use common::RecordId;
use domain::{Business, BusinessUpdate, NewBusiness};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BusinessRequest {
    pub name: Option<String>,
    pub business_category_id: Option<RecordId>,
    pub image: Option<String>,
}

/// GET /business
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<Business>> {
    Ok(ok(state.businesses.list().await?))
}

/// GET /business/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Business> {
    Ok(ok(state.businesses.get(parse_id(&id)?).await?))
}

/// POST /business
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<BusinessRequest>, JsonRejection>,
) -> CreatedResult<Business> {
    let Json(req) = payload?;
    let cmd = NewBusiness {
        name: required(req.name, "Field name is required.")?,
        business_category_id: req.business_category_id,
        image: req.image,
    };

    let business = state.businesses.create(cmd).await?;
    Ok(created("Business created successfully!", business))
}

/// PUT /business/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<BusinessRequest>, JsonRejection>,
) -> ApiResult<Business> {
    let Json(req) = payload?;
    let cmd = BusinessUpdate {
        name: req.name,
        business_category_id: req.business_category_id,
        image: req.image,
    };

    let business = state.businesses.update(parse_id(&id)?, cmd).await?;
    Ok(ok_with("Business updated successfully!", business))
}

/// DELETE /business/{id}. Also removes the business image.
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Business> {
    let business = state.businesses.delete(parse_id(&id)?).await?;
    Ok(ok_with("Business deleted successfully!", business))
}
