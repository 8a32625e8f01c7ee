//! Pet listing endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use common::RecordId;
use domain::{Money, NewPet, Pet, PetUpdate};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;
use crate::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct CreatePetRequest {
    pub pet: Option<String>,
    pub location: Option<String>,
    pub price: Option<Money>,
    pub image: Option<String>,
    pub category_id: Option<RecordId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePetRequest {
    pub pet: Option<String>,
    pub location: Option<String>,
    pub price: Option<Money>,
    pub image: Option<String>,
    pub category_id: Option<RecordId>,
}

/// GET /pets/all
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<Pet>> {
    Ok(ok(state.pets.list().await?))
}

/// GET /pets/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Pet> {
    Ok(ok(state.pets.get(parse_id(&id)?).await?))
}

/// POST /pets/create. The caller becomes the owner.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(AuthenticatedUser(owner)): Extension<AuthenticatedUser>,
    payload: Result<Json<CreatePetRequest>, JsonRejection>,
) -> CreatedResult<Pet> {
    let Json(req) = payload?;
    const MISSING: &str = "Fields pet, location, and price are required.";
    let cmd = NewPet {
        name: required(req.pet, MISSING)?,
        location: required(req.location, MISSING)?,
        price: required(req.price, MISSING)?,
        image: req.image,
        category_id: req.category_id,
    };

    let pet = state.pets.create(owner, cmd).await?;
    Ok(created("Pet created successfully!", pet))
}

/// PUT /pets/update/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePetRequest>, JsonRejection>,
) -> ApiResult<Pet> {
    let Json(req) = payload?;
    let cmd = PetUpdate {
        name: req.pet,
        location: req.location,
        price: req.price,
        image: req.image,
        category_id: req.category_id,
    };

    let pet = state.pets.update(parse_id(&id)?, cmd).await?;
    Ok(ok_with("Pet updated successfully!", pet))
}

/// DELETE /pets/delete/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Pet> {
    let pet = state.pets.delete(parse_id(&id)?).await?;
    Ok(ok_with("Pet deleted successfully!", pet))
}
