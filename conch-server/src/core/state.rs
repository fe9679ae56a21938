use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::UserRepository;

/// Server state - shared handles for all services
///
/// `ServerState` is the core data structure of the storefront server and
/// holds shared references to every service. Cloning is shallow (`Arc`
/// internally), so handlers can take it by value.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | configuration (immutable) |
/// | db | Surreal<Db> | embedded database |
/// | jwt_service | Arc<JwtService> | JWT authentication service |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT authentication service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Create server state from pre-built parts
    ///
    /// Usually [`ServerState::initialize`] is what you want.
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// Initialize server state
    ///
    /// In order:
    /// 1. work directory structure
    /// 2. database (work_dir/database)
    /// 3. bootstrap admin account
    /// 4. JWT service
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be initialized; the server cannot
    /// run without storage.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_service = DbService::new(&config.database_dir())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        // Bootstrap admin as a regular user row; authorization has no
        // hardcoded credential branch
        let users = UserRepository::new(db.clone());
        if let Err(e) = users
            .ensure_admin(
                &config.admin_username,
                &config.admin_email,
                &config.admin_password,
            )
            .await
        {
            tracing::error!("Failed to bootstrap admin account: {}", e);
        }

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self::new(config.clone(), db, jwt_service)
    }

    /// Get a database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
