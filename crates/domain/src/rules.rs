//! Mutation rule engine.
//!
//! A pure function of (current entry, requested operation) to either a
//! field patch or a rejection. No I/O happens here, so every branch of the
//! operation table is unit-testable in isolation.

use std::str::FromStr;

use doc_store::{CartEntry, CartStatus, ElementPatch, OrderStatus};
use thiserror::Error;

/// Highest quantity an active cart entry may hold.
pub const MAX_QUANTITY: u32 = 5;

/// Lowest quantity an active cart entry may hold.
pub const MIN_QUANTITY: u32 = 1;

/// Error for operation names outside the recognized set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid modifyType")]
pub struct UnknownOp;

/// Cart mutation requested by the caller, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
    /// `increase` — one more unit, capped at [`MAX_QUANTITY`].
    Increase,
    /// `decrease` — one less unit, floored at [`MIN_QUANTITY`].
    Decrease,
    /// `delete` — soft delete: status deleted, quantity 0.
    Delete,
    /// `confirmed` — checkout: status confirmed, quantity 0.
    Confirm,
    /// `wishlist_false` — clear the wishlist flag.
    WishlistFalse,
}

impl FromStr for CartOp {
    type Err = UnknownOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(CartOp::Increase),
            "decrease" => Ok(CartOp::Decrease),
            "delete" => Ok(CartOp::Delete),
            "confirmed" => Ok(CartOp::Confirm),
            "wishlist_false" => Ok(CartOp::WishlistFalse),
            _ => Err(UnknownOp),
        }
    }
}

/// Order mutation requested by the caller, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOp {
    Cancel,
    Processing,
    Packaged,
    Shipping,
    Shipped,
    Delivered,
    Reviewed,
    /// `newOrder` and `pending` are two explicit labels for the same
    /// effect: reset the order to its initial status.
    Placed,
}

impl FromStr for OrderOp {
    type Err = UnknownOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancel" => Ok(OrderOp::Cancel),
            "processing" => Ok(OrderOp::Processing),
            "packaged" => Ok(OrderOp::Packaged),
            "shipping" => Ok(OrderOp::Shipping),
            "shipped" => Ok(OrderOp::Shipped),
            "delivered" => Ok(OrderOp::Delivered),
            "reviewed" => Ok(OrderOp::Reviewed),
            "newOrder" | "pending" => Ok(OrderOp::Placed),
            _ => Err(UnknownOp),
        }
    }
}

impl OrderOp {
    /// The status the operation transitions an order to.
    pub fn status(self) -> OrderStatus {
        match self {
            OrderOp::Cancel => OrderStatus::Cancelled,
            OrderOp::Processing => OrderStatus::Processing,
            OrderOp::Packaged => OrderStatus::Packaged,
            OrderOp::Shipping => OrderStatus::Shipping,
            OrderOp::Shipped => OrderStatus::Shipped,
            OrderOp::Delivered => OrderStatus::Delivered,
            OrderOp::Reviewed => OrderStatus::Reviewed,
            OrderOp::Placed => OrderStatus::Pending,
        }
    }
}

/// Precondition violations from the cart operation table.
///
/// A violation never clamps silently; the requested item is left untouched
/// and the reason is surfaced verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("Cannot increase quantity above {}", MAX_QUANTITY)]
    QuantityCeiling,

    #[error("Cannot decrease quantity below {}", MIN_QUANTITY)]
    QuantityFloor,
}

/// Applies a cart operation to the entry's current state.
pub fn apply_cart(entry: &CartEntry, op: CartOp) -> Result<ElementPatch, RuleViolation> {
    match op {
        CartOp::Increase => {
            if entry.quantity >= MAX_QUANTITY {
                return Err(RuleViolation::QuantityCeiling);
            }
            Ok(ElementPatch::new().inc_quantity(1))
        }
        CartOp::Decrease => {
            if entry.quantity <= MIN_QUANTITY {
                return Err(RuleViolation::QuantityFloor);
            }
            Ok(ElementPatch::new().inc_quantity(-1))
        }
        CartOp::Delete => Ok(ElementPatch::new()
            .set_cart_status(CartStatus::Deleted)
            .set_quantity(0)),
        CartOp::Confirm => Ok(ElementPatch::new()
            .set_cart_status(CartStatus::Confirmed)
            .set_quantity(0)),
        CartOp::WishlistFalse => Ok(ElementPatch::new().set_wishlist(false)),
    }
}

/// Applies an order operation.
///
/// Order transitions have no preconditions: each sets the named status,
/// and `isCancelled` is true only for cancel.
pub fn apply_order(op: OrderOp) -> ElementPatch {
    ElementPatch::new()
        .set_order_status(op.status())
        .set_cancelled(matches!(op, OrderOp::Cancel))
}
