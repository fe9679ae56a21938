//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, ShippingAddress};
use crate::orders::{GuestOrderRequest, OrderEngine};
use crate::utils::AppResult;

/// Checkout request
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

fn engine(state: &ServerState) -> OrderEngine {
    OrderEngine::new(state.db.clone(), state.config.checkout.clone())
}

/// POST /api/orders - place an order from the caller's cart
pub async fn place_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = engine(&state)
        .place_from_cart(&user, payload.shipping_address, &payload.payment_method)
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/guest - guest checkout (public)
pub async fn place_guest_order(
    State(state): State<ServerState>,
    Json(payload): Json<GuestOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = engine(&state).place_guest(payload).await?;
    Ok(Json(order))
}

/// GET /api/orders - the caller's orders, newest first
pub async fn list_own(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = engine(&state).list_own(&user).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - a single order (owner or admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = engine(&state).get(&user, &id).await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/cancel - cancel an order (owner or admin)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = engine(&state).cancel(&user, &id).await?;
    Ok(Json(order))
}
