//! Order Model
//!
//! Orders are created once at checkout and never change their item list.
//! Only status and fulfillment metadata may move after creation, and only
//! through the state machine below.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

// =============================================================================
// Status state machine
// =============================================================================

/// Order fulfillment status
///
/// ```text
/// pending → confirmed → processing → shipped → delivered   (terminal)
/// pending | confirmed | processing → cancelled             (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Position on the forward path; terminal states have none beyond
    fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Confirmed => 1,
            Self::Processing => 2,
            Self::Shipped => 3,
            Self::Delivered => 4,
            Self::Cancelled => 5,
        }
    }

    /// Whether no further transition is allowed out of this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether an order in this status may still be cancelled
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Processing)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// Forward-only along the fulfillment path; cancellation only from
    /// statuses that have not shipped. Self-transitions are rejected.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() || *self == next {
            return false;
        }
        match next {
            Self::Cancelled => self.can_cancel(),
            _ => next.rank() > self.rank(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// Payment status (payment processing is simulated)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Accepted payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    CashOnDelivery,
    BankTransfer,
}

impl PaymentMethod {
    /// Parse a client-supplied method string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "card" => Some(Self::Card),
            "cash_on_delivery" => Some(Self::CashOnDelivery),
            "bank_transfer" => Some(Self::BankTransfer),
            _ => None,
        }
    }
}

// =============================================================================
// Owner
// =============================================================================

/// Guest contact information, embedded in guest orders
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GuestContact {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
}

/// Who an order belongs to
///
/// Registered orders reference a user id; guest orders embed the contact
/// record, since no account exists to point at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OrderOwner {
    Registered(String),
    Guest(GuestContact),
}

impl OrderOwner {
    /// Whether the given user id owns this order (guest orders own nothing)
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        matches!(self, Self::Registered(id) if id == user_id)
    }
}

// =============================================================================
// Order
// =============================================================================

/// One frozen line of an order
///
/// A copy of the cart line at checkout time, not a live catalog reference;
/// later price or name changes do not touch placed orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Catalog reference, kept for stock restore on cancellation.
    /// Absent for free-form guest lines.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub product: Option<RecordId>,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Delivery address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Human-facing unique identifier, distinct from the record id
    pub order_number: String,
    pub owner: OrderOwner,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    /// Derived: sum of line price * quantity
    pub subtotal: f64,
    /// Derived from subtotal and the configured tax rate
    pub tax: f64,
    pub shipping_cost: f64,
    /// Derived: subtotal + tax + shipping_cost
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Stamped exactly once, on the first transition to delivered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<String>,
    /// Stamped exactly once, on the first transition to cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
    pub created_at: Option<String>,
}

/// Admin-updatable order fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub order_status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Delivered));
        assert!(Confirmed.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
    }

    #[test]
    fn test_no_backward_transitions() {
        use OrderStatus::*;
        assert!(!Shipped.can_transition_to(Processing));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Pending));
    }

    #[test]
    fn test_no_self_transitions() {
        use OrderStatus::*;
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Delivered));
    }

    #[test]
    fn test_cancellation_rules() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Cancelled));
        // Shipped and delivered orders may not be cancelled
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        use OrderStatus::*;
        assert!(Delivered.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!Shipped.is_terminal());
        // Nothing leaves a terminal state
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Delivered.can_transition_to(Cancelled));
    }

    #[test]
    fn test_owner_matching() {
        let owner = OrderOwner::Registered("user:alice".to_string());
        assert!(owner.is_owned_by("user:alice"));
        assert!(!owner.is_owned_by("user:bob"));

        let guest = OrderOwner::Guest(GuestContact {
            name: "Walk In".to_string(),
            phone: "555-0100".to_string(),
            email: "walkin@example.com".to_string(),
            address: "1 Beach Rd".to_string(),
        });
        assert!(!guest.is_owned_by("user:alice"));
    }

    #[test]
    fn test_owner_serialization_is_tagged() {
        let owner = OrderOwner::Registered("user:alice".to_string());
        let json = serde_json::to_string(&owner).unwrap();
        assert_eq!(json, r#"{"type":"registered","data":"user:alice"}"#);
    }

    #[test]
    fn test_guest_contact_validation() {
        use validator::Validate;

        let ok = GuestContact {
            name: "Walk In".to_string(),
            phone: "555-0100".to_string(),
            email: "walkin@example.com".to_string(),
            address: "1 Beach Rd".to_string(),
        };
        assert!(ok.validate().is_ok());

        let missing_email = GuestContact {
            email: "not-an-email".to_string(),
            ..ok.clone()
        };
        assert!(missing_email.validate().is_err());

        let missing_phone = GuestContact {
            phone: String::new(),
            ..ok
        };
        assert!(missing_phone.validate().is_err());
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(PaymentMethod::parse("card"), Some(PaymentMethod::Card));
        assert_eq!(
            PaymentMethod::parse("cash_on_delivery"),
            Some(PaymentMethod::CashOnDelivery)
        );
        assert_eq!(PaymentMethod::parse("bitcoin"), None);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Refunded).unwrap(),
            "\"REFUNDED\""
        );
    }
}
