use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Checkout pricing knobs
///
/// The payment gateway is simulated, but tax and shipping still have to be
/// computed deterministically on the server so order totals stay derived.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Tax rate applied to the subtotal (e.g. 0.10 = 10%)
    pub tax_rate: f64,
    /// Flat shipping cost below the free-shipping threshold
    pub shipping_flat: f64,
    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: f64,
}

impl CheckoutConfig {
    fn from_env() -> Self {
        Self {
            tax_rate: std::env::var("TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.10),
            shipping_flat: std::env::var("SHIPPING_FLAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5.99),
            free_shipping_threshold: std::env::var("FREE_SHIPPING_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50.0),
        }
    }
}

/// Server configuration
///
/// # Environment variables
///
/// All settings can be overridden through environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/conch/store | working directory |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | runtime environment |
/// | ADMIN_USERNAME | admin | bootstrap admin account |
/// | ADMIN_PASSWORD | (dev default) | bootstrap admin password |
/// | TAX_RATE | 0.10 | checkout tax rate |
/// | SHIPPING_FLAT | 5.99 | flat shipping cost |
/// | FREE_SHIPPING_THRESHOLD | 50.0 | free shipping from this subtotal |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/conch HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory, stores the database and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Bootstrap admin username
    pub admin_username: String,
    /// Bootstrap admin password
    pub admin_password: String,
    /// Bootstrap admin email
    pub admin_email: String,
    /// Checkout pricing
    pub checkout: CheckoutConfig,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Falls back to defaults for anything unset.
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let admin_password = match std::env::var("ADMIN_PASSWORD") {
            Ok(p) => p,
            Err(_) => {
                if environment == "production" {
                    tracing::warn!(
                        "ADMIN_PASSWORD not set in production; bootstrap admin will use the development default"
                    );
                }
                "conch-admin-dev".to_string()
            }
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/conch/store".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment,
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password,
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@conch.local".into()),
            checkout: CheckoutConfig::from_env(),
        }
    }

    /// Override work dir and port, typically for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Database directory under the work dir
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Ensure the work directory structure exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(PathBuf::from(&self.work_dir).join("logs"))?;
        Ok(())
    }

    /// Whether running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
