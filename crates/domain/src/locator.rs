//! Line-item locator: semantic-key lookups in a user's embedded arrays.
//!
//! Entries are never addressed by array position; positions shift on
//! insertion, keys do not.

use chrono::{DateTime, Utc};
use common::ProductId;
use doc_store::{CartEntry, OrderEntry};

/// Finds a cart entry by product id. First match wins; ids are expected
/// unique among active entries.
pub fn find_cart_entry<'a>(cart: &'a [CartEntry], product: &ProductId) -> Option<&'a CartEntry> {
    cart.iter().find(|entry| entry.product_id() == product)
}

/// Finds an order entry by its composite key (product id, order time).
///
/// The same product can be ordered multiple times, so both parts of the
/// key must match; timestamps compare at full precision.
pub fn find_order_entry<'a>(
    orders: &'a [OrderEntry],
    product: &ProductId,
    placed_at: DateTime<Utc>,
) -> Option<&'a OrderEntry> {
    orders
        .iter()
        .find(|entry| entry.product_id() == product && entry.order_time == placed_at)
}

/// Normalizes a textual order time to the stored timestamp representation.
///
/// Returns None for text that is not a valid RFC 3339 timestamp.
pub fn parse_order_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
