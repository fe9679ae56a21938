//! Admin API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderUpdate, Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductRepository, RepoError};
use crate::orders::OrderEngine;
use crate::utils::{AppError, AppResult, ErrorCode};

fn map_catalog_error(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Validation(msg) if msg.contains("price") => {
            AppError::with_message(ErrorCode::ProductInvalidPrice, msg)
        }
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Duplicate(msg) => AppError::already_exists(msg),
        other => AppError::database(other.to_string()),
    }
}

// =============================================================================
// Catalog management
// =============================================================================

/// GET /api/admin/products - all products, deactivated included
pub async fn list_products(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo
        .find_all_with_inactive()
        .await
        .map_err(map_catalog_error)?;
    Ok(Json(products))
}

/// POST /api/admin/products - create a product
pub async fn create_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await.map_err(map_catalog_error)?;

    tracing::info!(
        admin = %user.username,
        product = %product.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        "Product created"
    );

    Ok(Json(product))
}

/// PUT /api/admin/products/{id} - update a product
pub async fn update_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, payload).await.map_err(map_catalog_error)?;

    tracing::info!(admin = %user.username, product = %id, "Product updated");

    Ok(Json(product))
}

/// DELETE /api/admin/products/{id} - deactivate a product
///
/// Soft delete: the row stays so existing cart lines and order snapshots
/// keep resolving; the product just stops being sellable.
pub async fn deactivate_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.deactivate(&id).await.map_err(map_catalog_error)?;

    tracing::info!(admin = %user.username, product = %id, "Product deactivated");

    Ok(Json(product))
}

// =============================================================================
// Order management
// =============================================================================

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/admin/orders - all orders, paginated
pub async fn list_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let engine = OrderEngine::new(state.db.clone(), state.config.checkout.clone());
    let orders = engine.list_all(&user, query.limit, query.offset).await?;
    Ok(Json(orders))
}

/// PUT /api/admin/orders/{id} - update order status and fulfillment fields
pub async fn update_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let engine = OrderEngine::new(state.db.clone(), state.config.checkout.clone());
    let order = engine.update(&user, &id, payload).await?;

    tracing::info!(admin = %user.username, order = %id, "Order updated");

    Ok(Json(order))
}
