//! Cart Engine
//!
//! One mutable cart per authenticated user. Every mutation re-validates
//! against the catalog (stock ceilings, availability), recomputes the
//! derived totals, and persists through a version-checked write.

pub mod engine;

pub use engine::CartEngine;

/// Quantity cap per cart line
pub const MAX_LINE_QUANTITY: i64 = 99;
