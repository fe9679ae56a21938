//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod user;

// Catalog
pub mod product;

// Cart
pub mod cart;

// Orders
pub mod order;

// Re-exports
pub use cart::{Cart, CartItem};
pub use order::{
    GuestContact, Order, OrderItem, OrderOwner, OrderStatus, OrderUpdate, PaymentMethod,
    PaymentStatus, ShippingAddress,
};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
pub use user::{User, UserCreate, UserId, UserRole};
