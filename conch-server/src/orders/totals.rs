//! Order totals computation
//!
//! All money arithmetic runs in `Decimal` and is rounded half-up to two
//! places; only the rounded values are stored. Totals are a pure function
//! of the item list and the checkout configuration, never taken from a
//! client.

use rust_decimal::prelude::*;

use crate::core::CheckoutConfig;
use crate::db::models::OrderItem;

/// Derived money fields of an order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping_cost: f64,
    pub total: f64,
}

/// Compute subtotal, tax, shipping and total for a set of order lines.
pub fn compute(items: &[OrderItem], checkout: &CheckoutConfig) -> OrderTotals {
    let mut subtotal = Decimal::ZERO;
    for item in items {
        let price = Decimal::from_f64(item.price).unwrap_or_default();
        subtotal += price * Decimal::from(item.quantity);
    }
    let subtotal = subtotal.round_dp(2);

    let tax_rate = Decimal::from_f64(checkout.tax_rate).unwrap_or_default();
    let tax = (subtotal * tax_rate).round_dp(2);

    let threshold = Decimal::from_f64(checkout.free_shipping_threshold).unwrap_or_default();
    let shipping = if subtotal >= threshold {
        Decimal::ZERO
    } else {
        Decimal::from_f64(checkout.shipping_flat)
            .unwrap_or_default()
            .round_dp(2)
    };

    let total = (subtotal + tax + shipping).round_dp(2);

    OrderTotals {
        subtotal: subtotal.to_f64().unwrap_or_default(),
        tax: tax.to_f64().unwrap_or_default(),
        shipping_cost: shipping.to_f64().unwrap_or_default(),
        total: total.to_f64().unwrap_or_default(),
    }
}
