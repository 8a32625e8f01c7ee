//! Grooming reservation and photography session endpoints.
//!
//! Both kinds share one request shape; photography sessions also take a
//! `status`, which defaults to pending.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use common::RecordId;
use domain::{
    BookingUpdate, GroomingReservation, Money, NewBooking, PhotographySession, TransactionStatus,
};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;
use crate::error::ApiError;

const MISSING_FIELDS: &str =
    "All fields (transaction_id, price, schedule, service) are required.";

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub transaction_id: Option<RecordId>,
    pub price: Option<Money>,
    pub schedule: Option<DateTime<Utc>>,
    pub service: Option<String>,
    pub status: Option<String>,
}

impl BookingRequest {
    fn status(&self) -> Result<Option<TransactionStatus>, ApiError> {
        Ok(self
            .status
            .as_deref()
            .map(str::parse::<TransactionStatus>)
            .transpose()?)
    }

    fn into_new(self, status: Option<TransactionStatus>) -> Result<NewBooking, ApiError> {
        Ok(NewBooking {
            transaction_id: required(self.transaction_id, MISSING_FIELDS)?,
            price: required(self.price, MISSING_FIELDS)?,
            schedule: required(self.schedule, MISSING_FIELDS)?,
            service: required(self.service, MISSING_FIELDS)?,
            status,
        })
    }

    fn into_update(self, status: Option<TransactionStatus>) -> BookingUpdate {
        BookingUpdate {
            transaction_id: self.transaction_id,
            price: self.price,
            schedule: self.schedule,
            service: self.service,
            status,
        }
    }
}

/// GET /grooming-reservations
pub async fn list_grooming<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<GroomingReservation>> {
    Ok(ok(state.grooming_reservations.list().await?))
}

/// GET /grooming-reservations/{id}
pub async fn get_grooming<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<GroomingReservation> {
    Ok(ok(state.grooming_reservations.get(parse_id(&id)?).await?))
}

/// POST /grooming-reservations/create
#[tracing::instrument(skip(state, payload))]
pub async fn create_grooming<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> CreatedResult<GroomingReservation> {
    let Json(req) = payload?;
    let reservation = state
        .grooming_reservations
        .create(req.into_new(None)?)
        .await?;
    Ok(created("Grooming reservation created successfully!", reservation))
}

/// PUT /grooming-reservations/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update_grooming<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> ApiResult<GroomingReservation> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let reservation = state
        .grooming_reservations
        .update(id, req.into_update(None))
        .await?;
    Ok(ok_with("Grooming reservation updated successfully!", reservation))
}

/// DELETE /grooming-reservations/{id}
#[tracing::instrument(skip(state))]
pub async fn delete_grooming<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<GroomingReservation> {
    let reservation = state
        .grooming_reservations
        .delete(parse_id(&id)?)
        .await?;
    Ok(ok_with("Grooming reservation deleted successfully!", reservation))
}

/// GET /photography
pub async fn list_photography<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<PhotographySession>> {
    Ok(ok(state.photography_sessions.list().await?))
}

/// GET /photography/{id}
pub async fn get_photography<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<PhotographySession> {
    Ok(ok(state.photography_sessions.get(parse_id(&id)?).await?))
}

/// POST /photography/create
#[tracing::instrument(skip(state, payload))]
pub async fn create_photography<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> CreatedResult<PhotographySession> {
    let Json(req) = payload?;
    let status = req.status()?.unwrap_or(TransactionStatus::Pending);
    let session = state
        .photography_sessions
        .create(req.into_new(Some(status))?)
        .await?;
    Ok(created("Photography session created successfully!", session))
}

/// PUT /photography/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update_photography<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> ApiResult<PhotographySession> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let status = req.status()?;
    let session = state
        .photography_sessions
        .update(id, req.into_update(status))
        .await?;
    Ok(ok_with("Photography session updated successfully!", session))
}

/// DELETE /photography/{id}
#[tracing::instrument(skip(state))]
pub async fn delete_photography<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<PhotographySession> {
    let session = state.photography_sessions.delete(parse_id(&id)?).await?;
    Ok(ok_with("Photography session deleted successfully!", session))
}
