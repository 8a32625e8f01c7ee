//! Grooming service catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use domain::{GroomingService, Money, NewService, ServiceUpdate};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GroomingServiceRequest {
    pub name: Option<String>,
    pub price: Option<Money>,
}

/// GET /grooming-service
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<GroomingService>> {
    Ok(ok(state.grooming.list().await?))
}

/// GET /grooming-service/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<GroomingService> {
    Ok(ok(state.grooming.get(parse_id(&id)?).await?))
}

/// POST /grooming-service/create
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<GroomingServiceRequest>, JsonRejection>,
) -> CreatedResult<GroomingService> {
    let Json(req) = payload?;
    const MISSING: &str = "Fields name and price are required.";
    let cmd = NewService {
        name: required(req.name, MISSING)?,
        price: required(req.price, MISSING)?,
    };

    let service = state.grooming.create(cmd).await?;
    Ok(created("Grooming service created successfully!", service))
}

/// PUT /grooming-service/update/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<GroomingServiceRequest>, JsonRejection>,
) -> ApiResult<GroomingService> {
    let Json(req) = payload?;
    let cmd = ServiceUpdate {
        name: req.name,
        price: req.price,
    };

    let service = state.grooming.update(parse_id(&id)?, cmd).await?;
    Ok(ok_with("Grooming service updated successfully!", service))
}

/// DELETE /grooming-service/delete/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<GroomingService> {
    let service = state.grooming.delete(parse_id(&id)?).await?;
    Ok(ok_with("Grooming service deleted successfully!", service))
}
