//! Order API module
//!
//! Customer-facing checkout and order access. Admin order management lives
//! under `/api/admin`. Guest checkout is the one public route here.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place_order).get(handler::list_own))
        .route("/guest", post(handler::place_guest_order))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel))
}
