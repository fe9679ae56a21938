//! Order Engine
//!
//! Turns a cart (or a guest payload) into an immutable, priced,
//! stock-checked order, and owns the status lifecycle afterwards.

pub mod engine;
pub mod totals;

pub use engine::{GuestOrderItem, GuestOrderRequest, OrderEngine};
pub use totals::OrderTotals;
