//! Cart engine implementation
//!
//! Orchestrates catalog lookups, cart mutation and persistence. The engine
//! never retries a lost write; contention surfaces as `CartConflict` and the
//! caller decides whether to re-issue the request.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::cart::MAX_LINE_QUANTITY;
use crate::db::models::{Cart, CartItem, Product};
use crate::db::repository::{CartRepository, ProductRepository, RepoError};
use crate::utils::{AppError, AppResult, ErrorCode};

pub struct CartEngine {
    carts: CartRepository,
    products: ProductRepository,
}

impl CartEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            carts: CartRepository::new(db.clone()),
            products: ProductRepository::new(db),
        }
    }

    /// Get the caller's cart, creating an empty one on first use.
    pub async fn get_or_create(&self, user: &CurrentUser) -> AppResult<Cart> {
        if let Some(cart) = self
            .carts
            .find_by_user(&user.id)
            .await
            .map_err(map_repo_error)?
        {
            return Ok(cart);
        }

        match self.carts.create_empty(&user.id).await {
            Ok(cart) => Ok(cart),
            // Lost a create race against another request; the winner's cart
            // is the caller's cart
            Err(RepoError::Duplicate(_)) => self
                .carts
                .find_by_user(&user.id)
                .await
                .map_err(map_repo_error)?
                .ok_or_else(|| AppError::database("Cart vanished after create race")),
            Err(e) => Err(map_repo_error(e)),
        }
    }

    /// Add a product to the caller's cart.
    ///
    /// Merges into an existing line when `(product, size, color)` matches;
    /// otherwise appends a new line with a price snapshot of the current
    /// effective price.
    pub async fn add_item(
        &self,
        user: &CurrentUser,
        product_id: &str,
        quantity: i64,
        size: Option<String>,
        color: Option<String>,
    ) -> AppResult<Cart> {
        if quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(AppError::validation(format!(
                "quantity must not exceed {}",
                MAX_LINE_QUANTITY
            )));
        }

        let product = self.lookup_product(product_id).await?;
        if !product.is_active {
            return Err(AppError::new(ErrorCode::ProductUnavailable));
        }

        let mut cart = self.get_or_create(user).await?;

        let product_rid = product
            .id
            .clone()
            .ok_or_else(|| AppError::database("Product record has no id"))?;

        // The stock ceiling applies to the merged line quantity, not just
        // the increment
        let new_quantity = match cart.find_matching(&product_rid, &size, &color) {
            Some(idx) => cart.items[idx].quantity + quantity,
            None => quantity,
        };
        if new_quantity > MAX_LINE_QUANTITY {
            return Err(AppError::validation(format!(
                "quantity must not exceed {}",
                MAX_LINE_QUANTITY
            )));
        }
        if new_quantity > product.stock {
            return Err(AppError::insufficient_stock(
                product_rid.to_string(),
                new_quantity,
                product.stock,
            ));
        }

        match cart.find_matching(&product_rid, &size, &color) {
            Some(idx) => {
                cart.items[idx].quantity = new_quantity;
            }
            None => {
                cart.items.push(CartItem {
                    item_id: Uuid::new_v4().to_string(),
                    product: product_rid,
                    name: product.name.clone(),
                    price: product.effective_price(),
                    quantity,
                    size,
                    color,
                });
            }
        }

        cart.recompute_totals();
        self.carts.save(&cart).await.map_err(map_repo_error)
    }

    /// Change a line's quantity.
    ///
    /// Stock is re-checked against the catalog at update time; the ceiling
    /// seen at add time may have moved.
    pub async fn update_item(
        &self,
        user: &CurrentUser,
        item_id: &str,
        quantity: i64,
    ) -> AppResult<Cart> {
        if quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(AppError::validation(format!(
                "quantity must not exceed {}",
                MAX_LINE_QUANTITY
            )));
        }

        let mut cart = self.get_or_create(user).await?;

        let idx = cart
            .find_item(item_id)
            .ok_or_else(|| AppError::new(ErrorCode::CartItemNotFound))?;

        let product_id = cart.items[idx].product.to_string();
        let product = self.lookup_product(&product_id).await?;
        if quantity > product.stock {
            return Err(AppError::insufficient_stock(
                product_id,
                quantity,
                product.stock,
            ));
        }

        cart.items[idx].quantity = quantity;
        cart.recompute_totals();
        self.carts.save(&cart).await.map_err(map_repo_error)
    }

    /// Remove a line from the caller's cart.
    pub async fn remove_item(&self, user: &CurrentUser, item_id: &str) -> AppResult<Cart> {
        let mut cart = self.get_or_create(user).await?;

        let idx = cart
            .find_item(item_id)
            .ok_or_else(|| AppError::new(ErrorCode::CartItemNotFound))?;

        cart.items.remove(idx);
        cart.recompute_totals();
        self.carts.save(&cart).await.map_err(map_repo_error)
    }

    /// Empty the caller's cart unconditionally.
    pub async fn clear(&self, user: &CurrentUser) -> AppResult<Cart> {
        let mut cart = self.get_or_create(user).await?;

        if cart.items.is_empty() {
            return Ok(cart);
        }

        cart.items.clear();
        cart.recompute_totals();
        self.carts.save(&cart).await.map_err(map_repo_error)
    }

    async fn lookup_product(&self, product_id: &str) -> AppResult<Product> {
        self.products
            .find_by_id(product_id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))
    }
}

/// Map repository errors into the cart error surface
fn map_repo_error(err: RepoError) -> AppError {
    match err {
        RepoError::Conflict(_) => AppError::cart_conflict(),
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Duplicate(msg) => AppError::already_exists(msg),
        RepoError::InsufficientStock(msg) => {
            AppError::with_message(ErrorCode::InsufficientStock, msg)
        }
        RepoError::Database(msg) => AppError::database(msg),
    }
}
