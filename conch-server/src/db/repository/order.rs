//! Order Repository
//!
//! Orders are written once at checkout and only their status/fulfillment
//! fields move afterwards. Checkout and cancellation run as single
//! SurrealDB transactions so stock, order and cart can never disagree:
//!
//! - every stock decrement is guarded by `stock >= qty`; a failed guard
//!   THROWs and rolls the whole transaction back
//! - clearing the source cart is guarded by its version; a concurrent cart
//!   write rolls the checkout back
//! - cancellation is guarded by the cancellable status set, which also makes
//!   a double-cancel race lose cleanly

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// THROW marker for a failed stock guard
const ERR_OUT_OF_STOCK: &str = "OUT_OF_STOCK";
/// THROW marker for a failed cart version guard
const ERR_CART_CONFLICT: &str = "CART_CONFLICT";
/// THROW marker for a failed cancellable-status guard
const ERR_NOT_CANCELLABLE: &str = "NOT_CANCELLABLE";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Map a transaction error to a typed repo error via its THROW marker
    fn map_txn_error(err: surrealdb::Error) -> RepoError {
        let msg = err.to_string();
        if msg.contains(ERR_OUT_OF_STOCK) {
            RepoError::InsufficientStock("Stock changed during checkout".to_string())
        } else if msg.contains(ERR_CART_CONFLICT) {
            RepoError::Conflict("Cart was modified concurrently".to_string())
        } else if msg.contains(ERR_NOT_CANCELLABLE) {
            RepoError::Conflict("Order is no longer cancellable".to_string())
        } else {
            RepoError::Database(msg)
        }
    }

    /// Create an order from a cart, atomically.
    ///
    /// One transaction: decrement stock for every line (guarded), create the
    /// order, clear the cart (guarded by `cart_version`). Either all of it
    /// happens or none of it does.
    pub async fn create_from_cart(
        &self,
        order: Order,
        cart_id: RecordId,
        cart_version: i64,
        decrements: &[(RecordId, i64)],
    ) -> RepoResult<Order> {
        let order_number = order.order_number.clone();

        let mut q = String::from("BEGIN TRANSACTION;\n");
        for i in 0..decrements.len() {
            q.push_str(&format!(
                "LET $dec{i} = (UPDATE $prod{i} SET stock -= $qty{i} WHERE stock >= $qty{i} RETURN AFTER);\n\
                 IF array::len($dec{i}) == 0 {{ THROW '{ERR_OUT_OF_STOCK}' }};\n"
            ));
        }
        q.push_str(
            "LET $cleared = (UPDATE $cart SET \
                items = [], total_items = 0, total_price = 0.0, \
                version = version + 1, updated_at = $now \
             WHERE version = $cart_version RETURN AFTER);\n",
        );
        q.push_str(&format!(
            "IF array::len($cleared) == 0 {{ THROW '{ERR_CART_CONFLICT}' }};\n"
        ));
        q.push_str("CREATE order CONTENT $order;\nCOMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(q)
            .bind(("cart", cart_id))
            .bind(("cart_version", cart_version))
            .bind(("now", shared::util::now_rfc3339()))
            .bind(("order", order));

        for (i, (product, qty)) in decrements.iter().enumerate() {
            query = query
                .bind((format!("prod{i}"), product.clone()))
                .bind((format!("qty{i}"), *qty));
        }

        query
            .await
            .map_err(Self::map_txn_error)?
            .check()
            .map_err(Self::map_txn_error)?;

        self.find_by_number(&order_number)
            .await?
            .ok_or_else(|| RepoError::Database("Order missing after checkout".to_string()))
    }

    /// Create an order without a source cart (guest checkout), atomically
    /// decrementing stock for catalog-referenced lines.
    pub async fn create_direct(
        &self,
        order: Order,
        decrements: &[(RecordId, i64)],
    ) -> RepoResult<Order> {
        let order_number = order.order_number.clone();

        let mut q = String::from("BEGIN TRANSACTION;\n");
        for i in 0..decrements.len() {
            q.push_str(&format!(
                "LET $dec{i} = (UPDATE $prod{i} SET stock -= $qty{i} WHERE stock >= $qty{i} RETURN AFTER);\n\
                 IF array::len($dec{i}) == 0 {{ THROW '{ERR_OUT_OF_STOCK}' }};\n"
            ));
        }
        q.push_str("CREATE order CONTENT $order;\nCOMMIT TRANSACTION;");

        let mut query = self.base.db().query(q).bind(("order", order));
        for (i, (product, qty)) in decrements.iter().enumerate() {
            query = query
                .bind((format!("prod{i}"), product.clone()))
                .bind((format!("qty{i}"), *qty));
        }

        query
            .await
            .map_err(Self::map_txn_error)?
            .check()
            .map_err(Self::map_txn_error)?;

        self.find_by_number(&order_number)
            .await?
            .ok_or_else(|| RepoError::Database("Order missing after checkout".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find order by its human-facing number
    pub async fn find_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let number = order_number.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_number = $number LIMIT 1")
            .bind(("number", number))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders owned by a registered user, newest first
    pub async fn find_by_owner(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let user_id = user_id.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE owner.type = 'registered' AND owner.data = $user \
                 ORDER BY created_at DESC",
            )
            .bind(("user", user_id))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All orders system-wide, newest first, paginated (admin listings)
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Apply admin-updatable fields.
    ///
    /// `delivered_at` is passed only when the engine decided this update is
    /// the first transition to delivered; the same for `cancelled_at`.
    pub async fn update_fields(
        &self,
        id: &str,
        data: OrderUpdate,
        delivered_at: Option<String>,
        cancelled_at: Option<String>,
    ) -> RepoResult<Order> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.order_status.is_some() {
            set_parts.push("order_status = $order_status");
        }
        if data.payment_status.is_some() {
            set_parts.push("payment_status = $payment_status");
        }
        if data.tracking_number.is_some() {
            set_parts.push("tracking_number = $tracking_number");
        }
        if data.estimated_delivery.is_some() {
            set_parts.push("estimated_delivery = $estimated_delivery");
        }
        if data.notes.is_some() {
            set_parts.push("notes = $notes");
        }
        if delivered_at.is_some() {
            set_parts.push("delivered_at = $delivered_at");
        }
        if cancelled_at.is_some() {
            set_parts.push("cancelled_at = $cancelled_at");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(&query_str).bind(("thing", thing));

        if let Some(v) = data.order_status {
            query = query.bind(("order_status", v));
        }
        if let Some(v) = data.payment_status {
            query = query.bind(("payment_status", v));
        }
        if let Some(v) = data.tracking_number {
            query = query.bind(("tracking_number", v));
        }
        if let Some(v) = data.estimated_delivery {
            query = query.bind(("estimated_delivery", v));
        }
        if let Some(v) = data.notes {
            query = query.bind(("notes", v));
        }
        if let Some(v) = delivered_at {
            query = query.bind(("delivered_at", v));
        }
        if let Some(v) = cancelled_at {
            query = query.bind(("cancelled_at", v));
        }

        let mut result = query.await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Cancel an order and restore stock, atomically.
    ///
    /// The status guard lives inside the conditional update: only a
    /// still-cancellable order matches, so a racing second cancel (or a
    /// concurrent ship) makes this transaction lose and roll back the
    /// restores. `cancelled_at` is stamped by the same statement, which is
    /// what makes the stamp write-once.
    pub async fn cancel_with_restore(
        &self,
        id: &str,
        restores: &[(RecordId, i64)],
    ) -> RepoResult<Order> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut q = String::from("BEGIN TRANSACTION;\n");
        q.push_str(
            "LET $cancelled = (UPDATE $order SET \
                order_status = 'CANCELLED', cancelled_at = $now \
             WHERE order_status IN ['PENDING', 'CONFIRMED', 'PROCESSING'] \
             RETURN AFTER);\n",
        );
        q.push_str(&format!(
            "IF array::len($cancelled) == 0 {{ THROW '{ERR_NOT_CANCELLABLE}' }};\n"
        ));
        for i in 0..restores.len() {
            q.push_str(&format!("UPDATE $prod{i} SET stock += $qty{i};\n"));
        }
        q.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(q)
            .bind(("order", thing))
            .bind(("now", shared::util::now_rfc3339()));

        for (i, (product, qty)) in restores.iter().enumerate() {
            query = query
                .bind((format!("prod{i}"), product.clone()))
                .bind((format!("qty{i}"), *qty));
        }

        query
            .await
            .map_err(Self::map_txn_error)?
            .check()
            .map_err(Self::map_txn_error)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
