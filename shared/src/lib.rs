//! Shared types for the Conch storefront
//!
//! Common types used across server and client crates: the unified error
//! system, API request/response DTOs, and small utility functions.

pub mod client;
pub mod error;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
