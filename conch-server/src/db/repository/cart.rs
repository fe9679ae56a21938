//! Cart Repository
//!
//! One cart document per user (unique index on `user`). Every persist is a
//! conditional update on the cart's `version` field; a stale write returns
//! [`RepoError::Conflict`] and nothing is written.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartItem};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CART_TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the cart owned by a user
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Option<Cart>> {
        let user = user_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user LIMIT 1")
            .bind(("user", user))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Create an empty cart for a user
    ///
    /// The unique index on `user` rejects a concurrent double-create; the
    /// caller falls back to [`find_by_user`](Self::find_by_user).
    pub async fn create_empty(&self, user_id: &str) -> RepoResult<Cart> {
        let cart = Cart::empty(user_id.to_string());
        let created: Option<Cart> = self
            .base
            .db()
            .create(CART_TABLE)
            .content(cart)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("cart_user") {
                    RepoError::Duplicate(format!("Cart already exists for {}", user_id))
                } else {
                    RepoError::Database(msg)
                }
            })?;

        created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    /// Persist a cart's items and derived totals.
    ///
    /// Conditional on the version the caller read; bumps the version on
    /// success. An empty result means another request got there first.
    pub async fn save(&self, cart: &Cart) -> RepoResult<Cart> {
        let id = cart
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Cart has no id".into()))?;

        let items: Vec<CartItem> = cart.items.clone();

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    items = $items,
                    total_items = $total_items,
                    total_price = $total_price,
                    version = version + 1,
                    updated_at = $updated_at
                WHERE version = $version
                RETURN AFTER"#,
            )
            .bind(("id", id))
            .bind(("items", items))
            .bind(("total_items", cart.total_items))
            .bind(("total_price", cart.total_price))
            .bind(("version", cart.version))
            .bind(("updated_at", shared::util::now_rfc3339()))
            .await?;

        let carts: Vec<Cart> = result.take(0)?;
        carts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Conflict("Cart was modified concurrently".to_string()))
    }
}
