//! Photography service catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use domain::{Money, NewService, PhotographyService, ServiceUpdate};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PhotographyServiceRequest {
    pub name: Option<String>,
    pub price: Option<Money>,
}

/// GET /photography-service
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<PhotographyService>> {
    Ok(ok(state.photography.list().await?))
}

/// GET /photography-service/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<PhotographyService> {
    Ok(ok(state.photography.get(parse_id(&id)?).await?))
}

/// POST /photography-service/create
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<PhotographyServiceRequest>, JsonRejection>,
) -> CreatedResult<PhotographyService> {
    let Json(req) = payload?;
    const MISSING: &str = "Fields name and price are required.";
    let cmd = NewService {
        name: required(req.name, MISSING)?,
        price: required(req.price, MISSING)?,
    };

    let service = state.photography.create(cmd).await?;
    Ok(created("Photography service created successfully!", service))
}

/// PUT /photography-service/update/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<PhotographyServiceRequest>, JsonRejection>,
) -> ApiResult<PhotographyService> {
    let Json(req) = payload?;
    let cmd = ServiceUpdate {
        name: req.name,
        price: req.price,
    };

    let service = state.photography.update(parse_id(&id)?, cmd).await?;
    Ok(ok_with("Photography service updated successfully!", service))
}

/// DELETE /photography-service/delete/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<PhotographyService> {
    let service = state.photography.delete(parse_id(&id)?).await?;
    Ok(ok_with("Photography service deleted successfully!", service))
}
