//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// Product entity
///
/// `stock` is mutated in exactly two places: admin catalog updates and the
/// order engine's transactional decrement/restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Regular price
    pub price: f64,
    /// Discounted price; must be below `price` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    /// Units on hand
    pub stock: i64,
    #[serde(default)]
    pub category: Option<String>,
    /// Available size options (empty = one-size)
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Available color options
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Sale price when present, regular price otherwise
    pub fn effective_price(&self) -> f64 {
        self.sale_price.unwrap_or(self.price)
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub stock: i64,
    pub category: Option<String>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub sale_price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64, sale: Option<f64>) -> Product {
        Product {
            id: None,
            name: "Shell Lamp".to_string(),
            description: String::new(),
            price,
            sale_price: sale,
            stock: 10,
            category: None,
            sizes: vec![],
            colors: vec![],
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_effective_price_regular() {
        assert_eq!(product(25.0, None).effective_price(), 25.0);
    }

    #[test]
    fn test_effective_price_on_sale() {
        assert_eq!(product(25.0, Some(19.99)).effective_price(), 19.99);
    }
}
