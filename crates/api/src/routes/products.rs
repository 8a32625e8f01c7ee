//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use domain::{Money, NewProduct, Product, ProductUpdate};
use record_store::RecordStore;
use serde::Deserialize;

use super::{ApiResult, CreatedResult, created, ok, ok_with, parse_id, required};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i64>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i64>,
    pub image: Option<String>,
}

/// GET /products
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Vec<Product>> {
    Ok(ok(state.products.list().await?))
}

/// GET /products/{id}
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    Ok(ok(state.products.get(parse_id(&id)?).await?))
}

/// POST /products
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> CreatedResult<Product> {
    let Json(req) = payload?;
    const MISSING: &str = "Fields name, price, and stock are required.";
    let cmd = NewProduct {
        name: required(req.name, MISSING)?,
        price: required(req.price, MISSING)?,
        stock: required(req.stock, MISSING)?,
        image: req.image,
    };

    let product = state.products.create(cmd).await?;
    Ok(created("Product created successfully!", product))
}

/// PUT /products/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<Product> {
    let Json(req) = payload?;
    let cmd = ProductUpdate {
        name: req.name,
        price: req.price,
        stock: req.stock,
        image: req.image,
    };

    let product = state.products.update(parse_id(&id)?, cmd).await?;
    Ok(ok_with("Product updated successfully!", product))
}

/// DELETE /products/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let product = state.products.delete(parse_id(&id)?).await?;
    Ok(ok_with("Product deleted successfully!", product))
}
