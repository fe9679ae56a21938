//! Cart Model
//!
//! Exactly one cart per user. Totals are derived from the item list and
//! recomputed before every persist; they are never accepted from a caller.

use super::serde_helpers;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One line in a cart
///
/// Merge identity is the `(product, size, color)` triple: adding the same
/// triple again increments quantity instead of appending a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Stable line id, used by update/remove endpoints
    pub item_id: String,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    /// Product name at add time
    pub name: String,
    /// Effective price snapshot at add time
    pub price: f64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartItem {
    /// Whether this line matches the merge identity triple
    pub fn matches(&self, product: &RecordId, size: &Option<String>, color: &Option<String>) -> bool {
        &self.product == product && &self.size == size && &self.color == color
    }
}

/// Per-user cart document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Owning user id, "user:xxxx" form (unique index)
    pub user: String,
    pub items: Vec<CartItem>,
    /// Derived: sum of line quantities
    pub total_items: i64,
    /// Derived: sum of line price * quantity, 2 decimal places
    pub total_price: f64,
    /// Optimistic concurrency counter, bumped by every persist
    pub version: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Cart {
    /// Fresh empty cart for a user
    pub fn empty(user: String) -> Self {
        let now = shared::util::now_rfc3339();
        Self {
            id: None,
            user,
            items: Vec::new(),
            total_items: 0,
            total_price: 0.0,
            version: 0,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }
    }

    /// Recompute `total_items` and `total_price` from the item list.
    ///
    /// Decimal arithmetic, rounded half-up to 2 places at the end.
    pub fn recompute_totals(&mut self) {
        let mut total_items: i64 = 0;
        let mut total_price = Decimal::ZERO;

        for item in &self.items {
            total_items += item.quantity;
            let price = Decimal::from_f64(item.price).unwrap_or_default();
            total_price += price * Decimal::from(item.quantity);
        }

        self.total_items = total_items;
        self.total_price = total_price
            .round_dp(2)
            .to_f64()
            .unwrap_or_default();
    }

    /// Find a line by its id
    pub fn find_item(&self, item_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.item_id == item_id)
    }

    /// Find a line by merge identity
    pub fn find_matching(
        &self,
        product: &RecordId,
        size: &Option<String>,
        color: &Option<String>,
    ) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.matches(product, size, color))
    }
}
