//! Business category endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use domain::{BusinessCategory, BusinessCategoryUpdate, NewBusinessCategory};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BusinessCategoryRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// GET /businessCategory/all
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<BusinessCategory>> {
    Ok(ok(state.business_categories.list().await?))
}

/// GET /businessCategory/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<BusinessCategory> {
    Ok(ok(state.business_categories.get(parse_id(&id)?).await?))
}

/// POST /businessCategory/create
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<BusinessCategoryRequest>, JsonRejection>,
) -> CreatedResult<BusinessCategory> {
    let Json(req) = payload?;
    let cmd = NewBusinessCategory {
        name: required(req.name, "Category name is required.")?,
        image: req.image,
    };

    let category = state.business_categories.create(cmd).await?;
    Ok(created("Business category created successfully!", category))
}

/// PUT /businessCategory/update/{id}. A replaced image is removed.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<BusinessCategoryRequest>, JsonRejection>,
) -> ApiResult<BusinessCategory> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let cmd = BusinessCategoryUpdate {
        name: req.name,
        image: req.image,
    };

    let category = state.business_categories.update(id, cmd).await?;
    Ok(ok_with("Business category updated successfully!", category))
}

/// DELETE /businessCategory/delete/{id}. Also removes the category image.
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<BusinessCategory> {
    let category = state.business_categories.delete(parse_id(&id)?).await?;
    Ok(ok_with(
        "Business category and associated image deleted successfully!",
        category,
    ))
}
