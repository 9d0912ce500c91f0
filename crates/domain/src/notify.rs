//! Notification emitter for order status transitions.
//!
//! Each triggering transition produces exactly one notification entry.
//! Placement notifications ride in the same document write as the order
//! entry; later transitions are appended separately once the status write
//! is confirmed.

use chrono::Utc;
use doc_store::{NotificationEntry, ProductSnapshot};

use crate::rules::OrderOp;

/// Notification for the initial placement of an order.
pub fn placement(product: &ProductSnapshot) -> NotificationEntry {
    NotificationEntry::new(
        format!(
            "We have received your order for {}. We will let you know as soon as it ships.",
            product.title
        ),
        Utc::now(),
    )
    .about(product)
}

/// Notification for a later status transition, if the transition notifies.
///
/// `reviewed` and the pending reset are bookkeeping transitions and stay
/// silent.
pub fn for_transition(op: OrderOp, product: &ProductSnapshot) -> Option<NotificationEntry> {
    let details = match op {
        OrderOp::Processing => format!("Your order for {} is being processed.", product.title),
        OrderOp::Packaged => format!("Your order for {} has been packaged.", product.title),
        OrderOp::Shipping => {
            format!("Your order for {} has been handed to the carrier.", product.title)
        }
        OrderOp::Shipped => format!("Your order for {} has been shipped.", product.title),
        OrderOp::Delivered => format!("Your order for {} has been delivered.", product.title),
        OrderOp::Cancel => format!("Your order for {} has been cancelled.", product.title),
        OrderOp::Reviewed | OrderOp::Placed => return None,
    };

    Some(NotificationEntry::new(details, Utc::now()).about(product))
}
