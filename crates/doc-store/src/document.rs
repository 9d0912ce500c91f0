//! The user-document schema.
//!
//! Field names are camelCase on the wire and in stored documents.

use chrono::{DateTime, Utc};
use common::{ProductId, UserKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a cart entry.
///
/// `Deleted` is a soft state: the entry stays in the array with quantity 0
/// and is never physically removed, so array positions of other entries
/// are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    /// Sitting in the cart, quantity adjustable.
    #[default]
    Pending,

    /// Checked out; the entry is frozen at quantity 0.
    Confirmed,

    /// Removed from the cart (soft delete, quantity 0).
    Deleted,
}

impl CartStatus {
    /// Returns the status name as stored on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartStatus::Pending => "pending",
            CartStatus::Confirmed => "confirmed",
            CartStatus::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of an order entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order received, not yet picked up for fulfillment.
    #[default]
    Pending,

    /// Being prepared.
    Processing,

    /// Packaged and awaiting handover.
    Packaged,

    /// Handed to the carrier.
    Shipping,

    /// In transit.
    Shipped,

    /// Arrived at the customer.
    Delivered,

    /// Cancelled by customer or seller.
    Cancelled,

    /// Customer left a review for this order.
    Reviewed,
}

impl OrderStatus {
    /// Returns the status name as stored on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Packaged => "packaged",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Reviewed => "reviewed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog snapshot embedded in cart, order and rating entries.
///
/// The snapshot is copied at insertion time; later catalog edits do not
/// rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// The product identifier.
    pub product_id: ProductId,

    /// Human-readable product title.
    pub title: String,

    /// Price per unit in cents.
    pub price: i64,

    /// Product image URL, if the catalog had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductSnapshot {
    /// Creates a snapshot from catalog fields.
    pub fn new(product_id: impl Into<ProductId>, title: impl Into<String>, price: i64) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            price,
            image: None,
        }
    }

    /// Attaches an image URL to the snapshot.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// One product in a user's cart.
///
/// Identity key within the array: the product id. Invariant: quantity stays
/// in 1..=5 while the entry is active (`Pending`); `Deleted` and `Confirmed`
/// entries are parked at quantity 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: ProductSnapshot,

    /// Units of the product in the cart.
    pub quantity: u32,

    /// Lifecycle state of the entry.
    pub status: CartStatus,

    /// Set when the product was saved to the wishlist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wishlist: Option<bool>,
}

impl CartEntry {
    /// Creates a fresh cart entry at quantity 1.
    pub fn new(product: ProductSnapshot, status: CartStatus) -> Self {
        Self {
            product,
            quantity: 1,
            status,
            wishlist: None,
        }
    }

    /// Creates a wishlist entry (quantity 1, pending, wishlist flag set).
    pub fn wishlisted(product: ProductSnapshot) -> Self {
        Self {
            product,
            quantity: 1,
            status: CartStatus::Pending,
            wishlist: Some(true),
        }
    }

    /// Returns the entry's identity key.
    pub fn product_id(&self) -> &ProductId {
        &self.product.product_id
    }
}

/// One placed order line.
///
/// Identity key within the array: (product id, order time). The same
/// product can be ordered multiple times; the timestamp disambiguates.
/// Entries are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
    #[serde(flatten)]
    pub product: ProductSnapshot,

    /// Units ordered.
    pub quantity: u32,

    /// Lifecycle state of the order.
    pub status: OrderStatus,

    /// Mirror flag kept alongside `status` for cancelled orders.
    pub is_cancelled: bool,

    /// Placement timestamp; part of the entry's identity.
    pub order_time: DateTime<Utc>,
}

impl OrderEntry {
    /// Creates a new pending order entry placed at `order_time`.
    pub fn placed(product: ProductSnapshot, quantity: u32, order_time: DateTime<Utc>) -> Self {
        Self {
            product,
            quantity,
            status: OrderStatus::Pending,
            is_cancelled: false,
            order_time,
        }
    }

    /// Returns the entry's identity key.
    pub fn product_id(&self) -> &ProductId {
        &self.product.product_id
    }
}

/// One product rating left by the user. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    #[serde(flatten)]
    pub product: ProductSnapshot,

    /// Star rating.
    pub rating: f64,

    /// When the rating was recorded.
    pub order_time: DateTime<Utc>,
}

/// One notification for the user. Append-only; only `is_read` ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEntry {
    /// Stable key for read-flag updates.
    pub id: Uuid,

    /// Human-readable message.
    pub details: String,

    /// Whether the user has seen the notification.
    pub is_read: bool,

    /// Emission timestamp; reads sort by this, newest first.
    pub created_at: DateTime<Utc>,

    /// Product title the notification refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Product image the notification refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NotificationEntry {
    /// Creates an unread notification stamped `created_at`.
    pub fn new(details: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            details: details.into(),
            is_read: false,
            created_at,
            title: None,
            image: None,
        }
    }

    /// Attaches the product the notification refers to.
    pub fn about(mut self, product: &ProductSnapshot) -> Self {
        self.title = Some(product.title.clone());
        self.image = product.image.clone();
        self
    }
}

/// Profile fields written by the upsert endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The user's identity key.
    pub email: UserKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The arena document: one per user, holding every embedded array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    /// Identity key (unique).
    pub email: UserKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub cart: Vec<CartEntry>,

    #[serde(default)]
    pub orders: Vec<OrderEntry>,

    #[serde(default)]
    pub ratings: Vec<RatingEntry>,

    #[serde(default)]
    pub notifications: Vec<NotificationEntry>,
}

impl UserDocument {
    /// Creates an empty document for a fresh profile.
    pub fn from_profile(profile: UserProfile) -> Self {
        Self {
            email: profile.email,
            name: profile.name,
            role: profile.role,
            cart: Vec::new(),
            orders: Vec::new(),
            ratings: Vec::new(),
            notifications: Vec::new(),
        }
    }
}
