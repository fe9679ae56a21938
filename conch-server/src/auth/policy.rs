//! Ownership policy
//!
//! The single access rule both the cart and order engines evaluate:
//! an admin may touch any resource, everyone else only their own.
//!
//! Callers decide how a denial surfaces. Order reads deliberately report
//! a denied resource as not found, so callers cannot probe which order
//! ids exist.

use crate::auth::CurrentUser;
use crate::db::models::OrderOwner;

/// Whether `user` may read or mutate a resource owned by `owner`.
///
/// Guest-owned orders have no owning account; only admins reach them
/// after placement.
pub fn can_access(user: &CurrentUser, owner: &OrderOwner) -> bool {
    if user.is_admin() {
        return true;
    }
    owner.is_owned_by(&user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::GuestContact;

    fn customer(id: &str) -> CurrentUser {
        CurrentUser {
            id: id.to_string(),
            username: "someone".to_string(),
            role: "customer".to_string(),
        }
    }

    fn admin() -> CurrentUser {
        CurrentUser {
            id: "user:admin".to_string(),
            username: "admin".to_string(),
            role: "admin".to_string(),
        }
    }

    fn guest_owner() -> OrderOwner {
        OrderOwner::Guest(GuestContact {
            name: "Walk In".to_string(),
            phone: "555-0100".to_string(),
            email: "walkin@example.com".to_string(),
            address: "1 Beach Rd".to_string(),
        })
    }

    #[test]
    fn test_owner_can_access_own_order() {
        let user = customer("user:alice");
        let owner = OrderOwner::Registered("user:alice".to_string());
        assert!(can_access(&user, &owner));
    }

    #[test]
    fn test_stranger_cannot_access() {
        let user = customer("user:bob");
        let owner = OrderOwner::Registered("user:alice".to_string());
        assert!(!can_access(&user, &owner));
    }

    #[test]
    fn test_admin_can_access_everything() {
        let owner = OrderOwner::Registered("user:alice".to_string());
        assert!(can_access(&admin(), &owner));
        assert!(can_access(&admin(), &guest_owner()));
    }

    #[test]
    fn test_customer_cannot_access_guest_order() {
        let user = customer("user:alice");
        assert!(!can_access(&user, &guest_owner()));
    }
}
