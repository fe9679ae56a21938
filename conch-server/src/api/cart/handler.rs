//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::cart::CartEngine;
use crate::core::ServerState;
use crate::db::models::Cart;
use crate::utils::AppResult;

/// Add item request
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

/// Update quantity request
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i64,
}

/// GET /api/cart - the caller's cart, created on first read
pub async fn get_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Cart>> {
    let engine = CartEngine::new(state.db.clone());
    let cart = engine.get_or_create(&user).await?;
    Ok(Json(cart))
}

/// POST /api/cart/items - add a product to the cart
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<Cart>> {
    let engine = CartEngine::new(state.db.clone());
    let cart = engine
        .add_item(
            &user,
            &payload.product,
            payload.quantity,
            payload.size,
            payload.color,
        )
        .await?;
    Ok(Json(cart))
}

/// PUT /api/cart/items/{item_id} - change a line's quantity
pub async fn update_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(item_id): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<Cart>> {
    let engine = CartEngine::new(state.db.clone());
    let cart = engine.update_item(&user, &item_id, payload.quantity).await?;
    Ok(Json(cart))
}

/// DELETE /api/cart/items/{item_id} - remove a line
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<Cart>> {
    let engine = CartEngine::new(state.db.clone());
    let cart = engine.remove_item(&user, &item_id).await?;
    Ok(Json(cart))
}

/// DELETE /api/cart - empty the cart
pub async fn clear_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Cart>> {
    let engine = CartEngine::new(state.db.clone());
    let cart = engine.clear(&user).await?;
    Ok(Json(cart))
}
