//! Database Module
//!
//! Embedded SurrealDB connection and schema definition

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "conch";
const DATABASE: &str = "store";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database and apply schema definitions
    pub async fn new(db_dir: &Path) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(
            "Database connection established (RocksDB at {})",
            db_dir.display()
        );

        Self::define_schema(&db).await?;

        Ok(Self { db })
    }

    /// Open an in-memory database (tests)
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::define_schema(&db).await?;

        Ok(Self { db })
    }

    /// Define unique indexes. Idempotent, runs at every startup.
    ///
    /// - one account per username
    /// - exactly one cart per user
    /// - order numbers globally unique (backstop for the random suffix)
    async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(
            r#"
            DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE;
            DEFINE INDEX IF NOT EXISTS cart_user ON TABLE cart COLUMNS user UNIQUE;
            DEFINE INDEX IF NOT EXISTS order_order_number ON TABLE order COLUMNS order_number UNIQUE;
            "#,
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Schema definition failed: {e}")))?;

        tracing::info!("Database schema definitions applied");
        Ok(())
    }
}
