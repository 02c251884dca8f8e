//! Product resource handlers.
//!
//! Service calls hit SQLite synchronously, so each one runs on the blocking
//! pool. The request's trace context is captured before the hop and moved
//! into the closure.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{request_context, ApiError, AppState};
use crate::model::{Product, ProductInput};
use crate::service::ProductService;
use crate::storage::StoreError;

/// Run a service call on the blocking pool with the request's trace context.
async fn call_service<F, T>(state: &AppState, call: F) -> Result<T, ApiError>
where
    F: FnOnce(&ProductService, &opentelemetry::Context) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let service = state.products.clone();
    let cx = request_context();
    let result = tokio::task::spawn_blocking(move || call(&service, &cx)).await?;
    Ok(result?)
}

/// Handle GET /api/v1/products.
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    tracing::debug!("GET request: fetch all products");
    let products = call_service(&state, |service, cx| service.get_all(cx)).await?;
    Ok(Json(products))
}

/// Handle GET /api/v1/products/:id.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    tracing::debug!(id, "GET request: fetch product by id");
    let product = call_service(&state, move |service, cx| service.get_by_id(cx, id)).await?;
    Ok(match product {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// Handle POST /api/v1/products.
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    tracing::debug!("POST request: create new product");
    let created = call_service(&state, move |service, cx| service.create(cx, input)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handle PUT /api/v1/products/:id.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<ProductInput>,
) -> Result<Response, ApiError> {
    tracing::debug!(id, "PUT request: update product");
    let updated =
        call_service(&state, move |service, cx| service.update(cx, id, changes)).await?;
    Ok(match updated {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// Handle DELETE /api/v1/products/:id.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!(id, "DELETE request: delete product");
    let deleted = call_service(&state, move |service, cx| service.delete(cx, id)).await?;
    Ok(if deleted {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    })
}
