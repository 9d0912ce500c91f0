//! Typed write specifications for targeted array-element updates.
//!
//! Patches are a closed list of field operations rather than raw update
//! documents, so the mutation table stays compiler-checked. The in-memory
//! store applies them structurally; the Mongo store translates them to
//! `$inc`/`$set` with `$[elem]` array filters.

use chrono::{DateTime, Utc};
use common::ProductId;
use uuid::Uuid;

use crate::document::{
    CartEntry, CartStatus, NotificationEntry, OrderEntry, OrderStatus, RatingEntry,
};

/// Addresses one element of a user's embedded array by semantic key.
///
/// Array positions shift on insertion, so elements are never addressed by
/// index.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSelector {
    /// A cart entry, matched by product id (first match wins).
    Cart { product: ProductId },

    /// An order entry, matched by product id and full-precision order time.
    Order {
        product: ProductId,
        placed_at: DateTime<Utc>,
    },

    /// A notification, matched by its stable id.
    Notification { id: Uuid },
}

/// A single field operation on the selected element.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Atomic increment of the quantity field.
    IncQuantity(i64),
    /// Overwrite of the quantity field.
    SetQuantity(u32),
    SetCartStatus(CartStatus),
    SetWishlist(bool),
    SetOrderStatus(OrderStatus),
    SetCancelled(bool),
    SetRead(bool),
}

/// An ordered list of field operations applied to one array element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementPatch {
    ops: Vec<FieldOp>,
}

impl ElementPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_quantity(mut self, delta: i64) -> Self {
        self.ops.push(FieldOp::IncQuantity(delta));
        self
    }

    pub fn set_quantity(mut self, quantity: u32) -> Self {
        self.ops.push(FieldOp::SetQuantity(quantity));
        self
    }

    pub fn set_cart_status(mut self, status: CartStatus) -> Self {
        self.ops.push(FieldOp::SetCartStatus(status));
        self
    }

    pub fn set_wishlist(mut self, wishlist: bool) -> Self {
        self.ops.push(FieldOp::SetWishlist(wishlist));
        self
    }

    pub fn set_order_status(mut self, status: OrderStatus) -> Self {
        self.ops.push(FieldOp::SetOrderStatus(status));
        self
    }

    pub fn set_cancelled(mut self, cancelled: bool) -> Self {
        self.ops.push(FieldOp::SetCancelled(cancelled));
        self
    }

    pub fn set_read(mut self, read: bool) -> Self {
        self.ops.push(FieldOp::SetRead(read));
        self
    }

    /// Returns the operations in application order.
    pub fn ops(&self) -> &[FieldOp] {
        &self.ops
    }

    /// Returns true if the patch carries no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// A new element appended to one of the embedded arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayPush {
    Cart(CartEntry),
    Order(OrderEntry),
    Rating(RatingEntry),
    Notification(NotificationEntry),
}

impl ArrayPush {
    /// The document field the element is appended to.
    pub fn array_field(&self) -> &'static str {
        match self {
            ArrayPush::Cart(_) => "cart",
            ArrayPush::Order(_) => "orders",
            ArrayPush::Rating(_) => "ratings",
            ArrayPush::Notification(_) => "notifications",
        }
    }
}

/// Outcome of a write, as reported by the store.
///
/// `matched` doubles as the "found" signal for targeted element updates:
/// a write that matched no document means the user or the element was gone
/// by write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteSummary {
    /// Documents the filter matched.
    pub matched: u64,

    /// Documents the write actually modified.
    pub modified: u64,
}

impl WriteSummary {
    /// Returns true if the write found its target document.
    pub fn matched_any(&self) -> bool {
        self.matched > 0
    }
}

/// Outcome of a profile upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// True when a new user document was created.
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_builder_preserves_order() {
        let patch = ElementPatch::new()
            .set_cart_status(CartStatus::Deleted)
            .set_quantity(0);
        assert_eq!(
            patch.ops(),
            &[
                FieldOp::SetCartStatus(CartStatus::Deleted),
                FieldOp::SetQuantity(0),
            ]
        );
    }

    #[test]
    fn write_summary_found_signal() {
        assert!(WriteSummary { matched: 1, modified: 1 }.matched_any());
        assert!(WriteSummary { matched: 1, modified: 0 }.matched_any());
        assert!(!WriteSummary::default().matched_any());
    }

    #[test]
    fn array_push_field_names() {
        use crate::document::ProductSnapshot;

        let entry = CartEntry::new(ProductSnapshot::new("P-1", "Widget", 100), CartStatus::Pending);
        assert_eq!(ArrayPush::Cart(entry).array_field(), "cart");
        assert_eq!(
            ArrayPush::Notification(NotificationEntry::new("hi", chrono::Utc::now()))
                .array_field(),
            "notifications"
        );
    }
}
