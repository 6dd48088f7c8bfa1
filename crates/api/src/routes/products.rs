//! Catalog route handlers.
//!
//! Reads are public; create/update/delete require an administrator. Image
//! handling is a URL field only - upload lives with the object-storage
//! collaborator.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use kirana_core::ProductId;

use crate::db::{ProductFilter, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductInput};
use crate::state::AppState;

/// Create the product routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
}

/// Catalog listing filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match on the product name.
    pub q: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
}

/// List products, optionally filtered.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = ProductFilter {
        q: query.q,
        category: query.category,
    };
    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// Fetch one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    Ok(Json(product))
}

/// Create a product (admin).
#[instrument(skip(state, admin, input))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    validate_input(&input)?;

    let product = ProductRepository::new(state.pool())
        .create(&input, admin.id)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (admin).
#[instrument(skip(state, _admin, input))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    validate_input(&input)?;

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &input)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(product))
}

/// Delete a product (admin).
///
/// Orders that reference the product keep their frozen line items.
#[instrument(skip(state, _admin))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Product".to_string()));
    }

    Ok(Json(json!({ "message": "Product removed" })))
}

/// Reject obviously invalid product payloads before persistence.
fn validate_input(input: &ProductInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Product name is required".to_string()));
    }
    if input.stock_count < 0 {
        return Err(AppError::Validation(
            "Stock count cannot be negative".to_string(),
        ));
    }
    Ok(())
}
