//! Order engine implementation
//!
//! Checkout snapshots cart lines into frozen order items, prices them
//! server-side, and hands the repository one transaction that decrements
//! stock, creates the order and clears the cart. Status changes afterwards
//! go through the state machine, with ownership enforced on every read.

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use crate::auth::{CurrentUser, policy};
use crate::core::CheckoutConfig;
use crate::db::models::{
    GuestContact, Order, OrderItem, OrderOwner, OrderStatus, OrderUpdate, PaymentMethod,
    PaymentStatus, ShippingAddress,
};
use crate::db::repository::{CartRepository, OrderRepository, ProductRepository, RepoError};
use crate::utils::{AppError, AppResult, ErrorCode};

/// One line of a guest checkout payload.
///
/// Lines that reference a catalog product are repriced from the catalog and
/// decrement stock; free-form lines (no `product`) carry their own name and
/// price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestOrderItem {
    pub product: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Guest checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestOrderRequest {
    pub guest_info: GuestContact,
    pub items: Vec<GuestOrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    /// Client-computed total; checked for plausibility only, the persisted
    /// totals are recomputed server-side
    pub computed_total: f64,
}

pub struct OrderEngine {
    orders: OrderRepository,
    carts: CartRepository,
    products: ProductRepository,
    checkout: CheckoutConfig,
}

impl OrderEngine {
    pub fn new(db: Surreal<Db>, checkout: CheckoutConfig) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            carts: CartRepository::new(db.clone()),
            products: ProductRepository::new(db),
            checkout,
        }
    }

    /// Place an order from the caller's cart.
    ///
    /// Atomic with clearing the cart: no interleaving can observe the order
    /// created with the cart still full, or the reverse.
    pub async fn place_from_cart(
        &self,
        user: &CurrentUser,
        shipping_address: ShippingAddress,
        payment_method: &str,
    ) -> AppResult<Order> {
        let payment_method = parse_payment_method(payment_method)?;

        let cart = self
            .carts
            .find_by_user(&user.id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| AppError::new(ErrorCode::CartEmpty))?;

        if cart.items.is_empty() {
            return Err(AppError::new(ErrorCode::CartEmpty));
        }

        let cart_id = cart
            .id
            .clone()
            .ok_or_else(|| AppError::database("Cart record has no id"))?;

        // Frozen copies of the cart lines; price stays the add-time snapshot
        let items: Vec<OrderItem> = cart
            .items
            .iter()
            .map(|line| OrderItem {
                product: Some(line.product.clone()),
                name: line.name.clone(),
                price: line.price,
                quantity: line.quantity,
                size: line.size.clone(),
                color: line.color.clone(),
            })
            .collect();

        let decrements: Vec<(surrealdb::RecordId, i64)> = cart
            .items
            .iter()
            .map(|line| (line.product.clone(), line.quantity))
            .collect();

        let order = self.build_order(
            OrderOwner::Registered(user.id.clone()),
            items,
            shipping_address,
            payment_method,
        );

        let created = self
            .orders
            .create_from_cart(order, cart_id, cart.version, &decrements)
            .await
            .map_err(|e| match e {
                RepoError::Conflict(_) => AppError::cart_conflict(),
                other => map_repo_error(other),
            })?;

        tracing::info!(
            order_number = %created.order_number,
            user_id = %user.id,
            total = created.total,
            "Order placed from cart"
        );

        Ok(created)
    }

    /// Place an order for a guest (no account, no stored cart).
    pub async fn place_guest(&self, req: GuestOrderRequest) -> AppResult<Order> {
        req.guest_info.validate().map_err(|e| {
            AppError::with_message(ErrorCode::GuestInfoIncomplete, e.to_string())
        })?;

        if req.items.is_empty() {
            return Err(AppError::validation("order must contain at least one item"));
        }
        if !req.computed_total.is_finite() || req.computed_total <= 0.0 {
            return Err(AppError::validation("order total must be positive"));
        }

        let payment_method = parse_payment_method(&req.payment_method)?;

        let mut items = Vec::with_capacity(req.items.len());
        let mut decrements: Vec<(surrealdb::RecordId, i64)> = Vec::new();

        for line in &req.items {
            if line.quantity < 1 {
                return Err(AppError::validation("quantity must be at least 1"));
            }

            match &line.product {
                Some(product_id) => {
                    let product = self
                        .products
                        .find_by_id(product_id)
                        .await
                        .map_err(map_repo_error)?
                        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
                    if !product.is_active {
                        return Err(AppError::new(ErrorCode::ProductUnavailable));
                    }
                    if line.quantity > product.stock {
                        return Err(AppError::insufficient_stock(
                            product_id.clone(),
                            line.quantity,
                            product.stock,
                        ));
                    }
                    let rid = product
                        .id
                        .clone()
                        .ok_or_else(|| AppError::database("Product record has no id"))?;
                    items.push(OrderItem {
                        product: Some(rid.clone()),
                        name: product.name.clone(),
                        // Catalog price wins over whatever the client sent
                        price: product.effective_price(),
                        quantity: line.quantity,
                        size: line.size.clone(),
                        color: line.color.clone(),
                    });
                    decrements.push((rid, line.quantity));
                }
                None => {
                    let name = line
                        .name
                        .clone()
                        .ok_or_else(|| AppError::validation("item name is required"))?;
                    let price = line
                        .price
                        .ok_or_else(|| AppError::validation("item price is required"))?;
                    if !price.is_finite() || price < 0.0 {
                        return Err(AppError::validation("item price must be non-negative"));
                    }
                    items.push(OrderItem {
                        product: None,
                        name,
                        price,
                        quantity: line.quantity,
                        size: line.size.clone(),
                        color: line.color.clone(),
                    });
                }
            }
        }

        let order = self.build_order(
            OrderOwner::Guest(req.guest_info),
            items,
            req.shipping_address,
            payment_method,
        );

        let created = self
            .orders
            .create_direct(order, &decrements)
            .await
            .map_err(map_repo_error)?;

        tracing::info!(
            order_number = %created.order_number,
            total = created.total,
            "Guest order placed"
        );

        Ok(created)
    }

    /// Fetch a single order.
    ///
    /// An order that exists but belongs to someone else reports as not
    /// found, indistinguishable from a nonexistent id.
    pub async fn get(&self, user: &CurrentUser, order_id: &str) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await
            .map_err(map_order_lookup_error)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        if !policy::can_access(user, &order.owner) {
            return Err(AppError::new(ErrorCode::OrderNotFound));
        }

        Ok(order)
    }

    /// All orders owned by the caller, newest first.
    pub async fn list_own(&self, user: &CurrentUser) -> AppResult<Vec<Order>> {
        self.orders
            .find_by_owner(&user.id)
            .await
            .map_err(map_repo_error)
    }

    /// All orders system-wide, paginated. Admin only.
    pub async fn list_all(
        &self,
        user: &CurrentUser,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Order>> {
        if !user.is_admin() {
            return Err(AppError::new(ErrorCode::AdminRequired));
        }
        self.orders
            .find_all(limit.clamp(1, 200), offset.max(0))
            .await
            .map_err(map_repo_error)
    }

    /// Apply admin-updatable fields to an order.
    ///
    /// Status changes go through the state machine. The first transition to
    /// delivered stamps `delivered_at`; repeating the same status later is
    /// rejected as an invalid transition, so the stamp can never be
    /// rewritten. A transition to cancelled takes the cancellation path,
    /// stock restore included.
    pub async fn update(
        &self,
        user: &CurrentUser,
        order_id: &str,
        data: OrderUpdate,
    ) -> AppResult<Order> {
        if !user.is_admin() {
            return Err(AppError::new(ErrorCode::AdminRequired));
        }

        let order = self
            .orders
            .find_by_id(order_id)
            .await
            .map_err(map_order_lookup_error)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        let mut delivered_at = None;

        if let Some(next) = data.order_status {
            if !order.order_status.can_transition_to(next) {
                return Err(AppError::order_invalid_state(format!(
                    "cannot move order from {} to {}",
                    order.order_status.as_str(),
                    next.as_str()
                )));
            }

            if next == OrderStatus::Cancelled {
                // Cancellation restores stock; route through the same
                // transaction the cancel endpoint uses
                let mut rest = data.clone();
                rest.order_status = None;
                if rest.payment_status.is_some()
                    || rest.tracking_number.is_some()
                    || rest.estimated_delivery.is_some()
                    || rest.notes.is_some()
                {
                    self.orders
                        .update_fields(order_id, rest, None, None)
                        .await
                        .map_err(map_repo_error)?;
                }
                return self.cancel_order(order_id, &order).await;
            }

            if next == OrderStatus::Delivered && order.delivered_at.is_none() {
                delivered_at = Some(shared::util::now_rfc3339());
            }
        }

        self.orders
            .update_fields(order_id, data, delivered_at, None)
            .await
            .map_err(map_repo_error)
    }

    /// Cancel an order. Allowed for the owner or an admin.
    pub async fn cancel(&self, user: &CurrentUser, order_id: &str) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await
            .map_err(map_order_lookup_error)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        if !policy::can_access(user, &order.owner) {
            return Err(AppError::new(ErrorCode::OrderNotFound));
        }

        if !order.order_status.can_cancel() {
            return Err(AppError::order_invalid_state(format!(
                "order in status {} cannot be cancelled",
                order.order_status.as_str()
            )));
        }

        self.cancel_order(order_id, &order).await
    }

    /// Shared cancellation path: restore stock for catalog-referenced lines
    /// and flip the status, in one transaction.
    async fn cancel_order(&self, order_id: &str, order: &Order) -> AppResult<Order> {
        let restores: Vec<(surrealdb::RecordId, i64)> = order
            .items
            .iter()
            .filter_map(|item| item.product.clone().map(|p| (p, item.quantity)))
            .collect();

        let cancelled = self
            .orders
            .cancel_with_restore(order_id, &restores)
            .await
            .map_err(|e| match e {
                // The status guard lost: someone cancelled or advanced the
                // order between our read and the transaction
                RepoError::Conflict(msg) => AppError::order_invalid_state(msg),
                other => map_repo_error(other),
            })?;

        tracing::info!(
            order_number = %cancelled.order_number,
            "Order cancelled, stock restored"
        );

        Ok(cancelled)
    }

    fn build_order(
        &self,
        owner: OrderOwner,
        items: Vec<OrderItem>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Order {
        let totals = super::totals::compute(&items, &self.checkout);

        Order {
            id: None,
            order_number: shared::util::order_number(),
            owner,
            items,
            shipping_address,
            subtotal: totals.subtotal,
            tax: totals.tax,
            shipping_cost: totals.shipping_cost,
            total: totals.total,
            payment_method,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            tracking_number: None,
            estimated_delivery: None,
            notes: None,
            delivered_at: None,
            cancelled_at: None,
            created_at: Some(shared::util::now_rfc3339()),
        }
    }
}

fn parse_payment_method(s: &str) -> AppResult<PaymentMethod> {
    PaymentMethod::parse(s).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::PaymentInvalidMethod,
            format!("unsupported payment method: {}", s),
        )
    })
}

/// Map repository errors into the order error surface
fn map_repo_error(err: RepoError) -> AppError {
    match err {
        RepoError::InsufficientStock(msg) => {
            AppError::with_message(ErrorCode::InsufficientStock, msg)
        }
        RepoError::Conflict(msg) => AppError::order_invalid_state(msg),
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Duplicate(msg) => AppError::already_exists(msg),
        RepoError::Database(msg) => AppError::database(msg),
    }
}

/// Lookup errors never reveal whether an id was merely malformed; a bad id
/// is the same "not found" a missing or foreign order reports
fn map_order_lookup_error(err: RepoError) -> AppError {
    match err {
        RepoError::Validation(_) => AppError::new(ErrorCode::OrderNotFound),
        other => map_repo_error(other),
    }
}
