//! Admin back office API
//!
//! Catalog management and system-wide order management. Every route in
//! this tree requires the admin role; the engines check again underneath,
//! so a routing mistake cannot silently widen access.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::middleware::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", admin_routes())
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        // Catalog management
        .route("/products", post(handler::create_product).get(handler::list_products))
        .route(
            "/products/{id}",
            put(handler::update_product).delete(handler::deactivate_product),
        )
        // Order management
        .route("/orders", get(handler::list_orders))
        .route("/orders/{id}", put(handler::update_order))
        .route_layer(middleware::from_fn(require_admin))
}
