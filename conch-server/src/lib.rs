//! Conch Store Server - retail storefront backend
//!
//! # Architecture overview
//!
//! This crate is the main entry point for the storefront server:
//!
//! - **Catalog** (`db/repository/product`): product records, admin-managed
//! - **Cart** (`cart`): one mutable cart per user, stock-checked mutations
//! - **Orders** (`orders`): checkout, guest checkout, status lifecycle
//! - **Auth** (`auth`): JWT + Argon2 authentication, ownership policy
//! - **HTTP API** (`api`): RESTful API endpoints
//!
//! # Module structure
//!
//! ```text
//! conch-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT auth, ownership policy
//! ├── db/            # database layer (models + repositories)
//! ├── cart/          # cart engine
//! ├── orders/        # order engine
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, re-exports
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use cart::CartEngine;
pub use core::{Config, Server, ServerState};
pub use orders::OrderEngine;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

// Security logging macro - structured security events via tracing
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Set up process environment: dotenv and logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        log_dir.as_deref(),
    );

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______                 __
  / ____/___  ____  _____/ /_
 / /   / __ \/ __ \/ ___/ __ \
/ /___/ /_/ / / / / /__/ / / /
\____/\____/_/ /_/\___/_/ /_/
    _____ __
   / ___// /_____  ________
   \__ \/ __/ __ \/ ___/ _ \
  ___/ / /_/ /_/ / /  /  __/
 /____/\__/\____/_/   \___/
    "#
    );
}
