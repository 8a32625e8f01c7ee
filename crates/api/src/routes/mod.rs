//! Route handlers, grouped by entity.

pub mod bookings;
pub mod business_categories;
pub mod businesses;
pub mod event_participants;
pub mod grooming_services;
pub mod health;
pub mod metrics;
pub mod pet_categories;
pub mod pet_sales;
pub mod pets;
pub mod photography_services;
pub mod product_sales;
pub mod products;
pub mod transactions;

use axum::Json;
use axum::http::StatusCode;
use common::RecordId;
use serde::Serialize;

use crate::error::ApiError;

/// Success body: `{success: true, message?, data}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;
pub type CreatedResult<T> = Result<(StatusCode, Json<Envelope<T>>), ApiError>;

pub(crate) fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message: None,
        data,
    })
}

pub(crate) fn ok_with<T>(message: &'static str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message: Some(message),
        data,
    })
}

pub(crate) fn created<T>(message: &'static str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok_with(message, data))
}

pub(crate) fn parse_id(id: &str) -> Result<RecordId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}

/// Unwraps a required request field.
pub(crate) fn required<T>(value: Option<T>, message: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(message.to_string()))
}
