//! Event participant endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use common::{RecordId, UserId};
use domain::{EventParticipant, ParticipantLink};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;

/// `user_id` defaults to the caller.
#[derive(Debug, Deserialize)]
pub struct ParticipantRequest {
    pub user_id: Option<UserId>,
    pub transaction_id: Option<RecordId>,
    pub business_id: Option<RecordId>,
}

impl ParticipantRequest {
    fn into_link(self, caller: UserId) -> Result<ParticipantLink, ApiError> {
        const MISSING: &str = "Fields transaction_id and business_id are required.";
        Ok(ParticipantLink {
            user_id: self.user_id.unwrap_or(caller),
            transaction_id: required(self.transaction_id, MISSING)?,
            business_id: required(self.business_id, MISSING)?,
        })
    }
}

/// GET /event-participants
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<EventParticipant>> {
    Ok(ok(state.participants.list().await?))
}

/// GET /event-participants/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<EventParticipant> {
    Ok(ok(state.participants.get(parse_id(&id)?).await?))
}

/// POST /event-participants
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    payload: Result<Json<ParticipantRequest>, JsonRejection>,
) -> CreatedResult<EventParticipant> {
    let Json(req) = payload?;
    let participant = state.participants.create(req.into_link(caller)?).await?;
    Ok(created("Event participant added successfully!", participant))
}

/// PUT /event-participants/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<ParticipantRequest>, JsonRejection>,
) -> ApiResult<EventParticipant> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let participant = state
        .participants
        .update(id, req.into_link(caller)?)
        .await?;
    Ok(ok_with("Event participant updated successfully!", participant))
}

/// DELETE /event-participants/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<EventParticipant> {
    let participant = state.participants.delete(parse_id(&id)?).await?;
    Ok(ok_with("Event participant deleted successfully!", participant))
}
