//! Pet category endpoints. Reads are public.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use domain::PetCategory;
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;

const MISSING_NAME: &str = "Category name is required.";

#[derive(Debug, Deserialize)]
pub struct PetCategoryRequest {
    pub name: Option<String>,
}

/// GET /pet-categories
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<PetCategory>> {
    Ok(ok(state.pet_categories.list().await?))
}

/// GET /pet-categories/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<PetCategory> {
    Ok(ok(state.pet_categories.get(parse_id(&id)?).await?))
}

/// POST /pet-categories
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<PetCategoryRequest>, JsonRejection>,
) -> CreatedResult<PetCategory> {
    let Json(req) = payload?;
    let name = required(req.name, MISSING_NAME)?;

    let category = state.pet_categories.create(&name).await?;
    Ok(created("Pet category added successfully", category))
}

/// PUT /pet-categories/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<PetCategoryRequest>, JsonRejection>,
) -> ApiResult<PetCategory> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let name = required(req.name, MISSING_NAME)?;

    let category = state.pet_categories.rename(id, &name).await?;
    Ok(ok_with("Pet category updated successfully", category))
}

/// DELETE /pet-categories/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<PetCategory> {
    let category = state.pet_categories.delete(parse_id(&id)?).await?;
    Ok(ok_with("Pet category deleted successfully", category))
}
