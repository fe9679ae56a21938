//! Utility module - logging and error re-exports
//!
//! # Contents
//!
//! - [`AppError`] - application error type (from shared::error)
//! - [`ApiResponse`] - API response structure (from shared::error)
//! - [`logger`] - tracing subscriber setup

pub mod logger;

// Re-export error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
