//! Client-side wishlist state.
//!
//! Membership toggles are optimistic: the local set flips immediately so the
//! heart icon responds, the network call runs after, and a failure rolls the
//! flip back. [`PendingActions`] stops a second toggle for the same product
//! while the first is still in flight, which would otherwise race the
//! rollback.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::instrument;

use glownest_core::ProductId;

use crate::api::types::Product;
use crate::api::{ApiClient, ApiError};
use crate::session::Session;

// =============================================================================
// Pending actions
// =============================================================================

/// Keys with an operation currently in flight.
///
/// `begin` returns false while the key is held, so overlapping submissions
/// for the same key are dropped instead of queued.
#[derive(Debug)]
pub struct PendingActions<K> {
    in_flight: HashSet<K>,
}

impl<K: Eq + Hash + Clone> PendingActions<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            in_flight: HashSet::new(),
        }
    }

    /// Claim the key. Returns false if an operation already holds it.
    pub fn begin(&mut self, key: &K) -> bool {
        self.in_flight.insert(key.clone())
    }

    /// Release the key once its operation finishes, on any path.
    pub fn finish(&mut self, key: &K) {
        self.in_flight.remove(key);
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.in_flight.contains(key)
    }
}

impl<K: Eq + Hash + Clone> Default for PendingActions<K> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Membership
// =============================================================================

/// The direction a toggle took, so the caller knows which call to make and
/// which flip to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Added,
    Removed,
}

/// Local view of which products are wishlisted.
#[derive(Debug, Default)]
pub struct WishlistMembership {
    members: HashSet<ProductId>,
    pending: PendingActions<ProductId>,
}

impl WishlistMembership {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the local set with the server's wishlist.
    pub fn replace(&mut self, products: &[Product]) {
        self.members = products.iter().map(|p| p.id.clone()).collect();
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.members.contains(product_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Start a toggle: flip membership locally and claim the product.
    ///
    /// Returns `None` when a toggle for this product is already in flight;
    /// the caller makes no network call in that case.
    pub fn begin_toggle(&mut self, product_id: &ProductId) -> Option<ToggleAction> {
        if !self.pending.begin(product_id) {
            return None;
        }
        if self.members.remove(product_id) {
            Some(ToggleAction::Removed)
        } else {
            self.members.insert(product_id.clone());
            Some(ToggleAction::Added)
        }
    }

    /// Finish a toggle: release the product and, on failure, undo the flip.
    pub fn finish_toggle(
        &mut self,
        product_id: &ProductId,
        action: ToggleAction,
        succeeded: bool,
    ) {
        self.pending.finish(product_id);
        if succeeded {
            return;
        }
        match action {
            ToggleAction::Added => {
                self.members.remove(product_id);
            }
            ToggleAction::Removed => {
                self.members.insert(product_id.clone());
            }
        }
    }

    /// Toggle a product end to end against the backend.
    ///
    /// Optimistic: membership flips before the call and rolls back if the
    /// call fails. Returns `None` when the product already has a toggle in
    /// flight.
    ///
    /// # Errors
    ///
    /// Returns the API error after rolling back the local flip.
    #[instrument(skip(self, api, session), fields(product_id = %product_id))]
    pub async fn toggle(
        &mut self,
        api: &ApiClient,
        session: &Session,
        product_id: &ProductId,
    ) -> Result<Option<ToggleAction>, ApiError> {
        let Some(action) = self.begin_toggle(product_id) else {
            return Ok(None);
        };
        let result = match action {
            ToggleAction::Added => api.add_to_wishlist(session, product_id).await,
            ToggleAction::Removed => api.remove_from_wishlist(session, product_id).await,
        };
        match result {
            Ok(()) => {
                self.finish_toggle(product_id, action, true);
                Ok(Some(action))
            }
            Err(err) => {
                tracing::warn!(error = %err, "wishlist toggle failed, rolling back");
                self.finish_toggle(product_id, action, false);
                Err(err)
            }
        }
    }

    /// Drop the local set, for sign-out.
    pub fn reset(&mut self) {
        self.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    #[test]
    fn toggle_flips_membership_optimistically() {
        let mut wishlist = WishlistMembership::new();
        assert_eq!(wishlist.begin_toggle(&id("p1")), Some(ToggleAction::Added));
        assert!(wishlist.contains(&id("p1")));
        wishlist.finish_toggle(&id("p1"), ToggleAction::Added, true);

        assert_eq!(
            wishlist.begin_toggle(&id("p1")),
            Some(ToggleAction::Removed)
        );
        assert!(!wishlist.contains(&id("p1")));
        wishlist.finish_toggle(&id("p1"), ToggleAction::Removed, true);
        assert!(wishlist.is_empty());
    }

    #[test]
    fn failed_toggle_rolls_back_the_flip() {
        let mut wishlist = WishlistMembership::new();
        let action = wishlist.begin_toggle(&id("p1")).expect("claimed");
        wishlist.finish_toggle(&id("p1"), action, false);
        assert!(!wishlist.contains(&id("p1")));

        wishlist.begin_toggle(&id("p2")).expect("claimed");
        wishlist.finish_toggle(&id("p2"), ToggleAction::Added, true);
        let action = wishlist.begin_toggle(&id("p2")).expect("claimed");
        assert_eq!(action, ToggleAction::Removed);
        wishlist.finish_toggle(&id("p2"), action, false);
        assert!(wishlist.contains(&id("p2")), "removal was rolled back");
    }

    #[test]
    fn overlapping_toggle_for_the_same_product_is_dropped() {
        let mut wishlist = WishlistMembership::new();
        assert!(wishlist.begin_toggle(&id("p1")).is_some());
        assert!(wishlist.begin_toggle(&id("p1")).is_none());
        // A different product is unaffected.
        assert!(wishlist.begin_toggle(&id("p2")).is_some());
        wishlist.finish_toggle(&id("p1"), ToggleAction::Added, true);
        assert!(wishlist.begin_toggle(&id("p1")).is_some());
    }

    #[test]
    fn replace_mirrors_the_server_list() {
        use rust_decimal::Decimal;

        use crate::api::types::Product;

        let mut wishlist = WishlistMembership::new();
        wishlist.begin_toggle(&id("stale"));
        wishlist.finish_toggle(&id("stale"), ToggleAction::Added, true);

        let product = Product {
            id: id("p1"),
            product_name: "Toner".to_string(),
            brand: Some("GlowLab".to_string()),
            price: Decimal::new(1899, 2),
            is_available: true,
            image_url: None,
        };
        wishlist.replace(&[product]);
        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.contains(&id("p1")));
        assert!(!wishlist.contains(&id("stale")));
    }
}
