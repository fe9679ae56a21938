//! Product Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const PRODUCT_TABLE: &str = "product";

/// Validate pricing invariants shared by create and update paths
fn check_pricing(price: f64, sale_price: Option<f64>, stock: i64) -> RepoResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(RepoError::Validation(
            "price must be a non-negative number".into(),
        ));
    }
    if let Some(sale) = sale_price {
        if !sale.is_finite() || sale < 0.0 {
            return Err(RepoError::Validation(
                "sale_price must be a non-negative number".into(),
            ));
        }
        if sale >= price {
            return Err(RepoError::Validation(
                "sale_price must be below the regular price".into(),
            ));
        }
    }
    if stock < 0 {
        return Err(RepoError::Validation("stock must not be negative".into()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find all products including deactivated ones (admin listings)
    pub async fn find_all_with_inactive(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        check_pricing(data.price, data.sale_price, data.stock)?;

        let now = shared::util::now_rfc3339();
        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            price: data.price,
            sale_price: data.sale_price,
            stock: data.stock,
            category: data.category,
            sizes: data.sizes.unwrap_or_default(),
            colors: data.colors.unwrap_or_default(),
            is_active: true,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        // Validate the resulting pricing, not just the changed fields
        let price = data.price.unwrap_or(existing.price);
        let sale_price = data.sale_price.or(existing.sale_price);
        let stock = data.stock.unwrap_or(existing.stock);
        check_pricing(price, sale_price, stock)?;

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = Vec::new();

        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.sale_price.is_some() {
            set_parts.push("sale_price = $sale_price");
        }
        if data.stock.is_some() {
            set_parts.push("stock = $stock");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.sizes.is_some() {
            set_parts.push("sizes = $sizes");
        }
        if data.colors.is_some() {
            set_parts.push("colors = $colors");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        if set_parts.is_empty() {
            return Ok(existing);
        }
        set_parts.push("updated_at = $updated_at");

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("thing", thing))
            .bind(("updated_at", shared::util::now_rfc3339()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.sale_price {
            query = query.bind(("sale_price", v));
        }
        if let Some(v) = data.stock {
            query = query.bind(("stock", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.sizes {
            query = query.bind(("sizes", v));
        }
        if let Some(v) = data.colors {
            query = query.bind(("colors", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;

        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Deactivate a product (soft delete; placed orders keep their snapshots)
    pub async fn deactivate(&self, id: &str) -> RepoResult<Product> {
        self.update(
            id,
            ProductUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }
}
