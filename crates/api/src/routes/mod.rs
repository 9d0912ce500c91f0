//! Route modules and shared request/response plumbing.

pub mod cart;
pub mod health;
pub mod metrics;
pub mod notifications;
pub mod orders;
pub mod ratings;
pub mod users;

use axum::Json;
use axum::http::StatusCode;
use doc_store::{DocumentStore, ProductSnapshot};
use domain::{
    BatchOutcome, CartService, ItemFailure, NotificationService, OrderService, ProfileService,
    RatingService,
};
use serde::{Deserialize, Serialize};

/// Shared application state accessible from all handlers.
pub struct AppState<S: DocumentStore> {
    pub profiles: ProfileService<S>,
    pub cart: CartService<S>,
    pub orders: OrderService<S>,
    pub ratings: RatingService<S>,
    pub notifications: NotificationService<S>,
}

/// Accepts either a single value or an array where the original clients
/// send both shapes; a single value is normalized to a one-element batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Normalizes to a batch.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Product snapshot as sent by clients.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub product_id: String,
    pub title: String,
    pub price: i64,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<ProductPayload> for ProductSnapshot {
    fn from(payload: ProductPayload) -> Self {
        ProductSnapshot {
            product_id: payload.product_id.into(),
            title: payload.title,
            price: payload.price,
            image: payload.image,
        }
    }
}

/// Aggregate envelope for batch mutation endpoints.
///
/// Full success carries the batch-level message only; per-item outcomes are
/// echoed only when something was not applied.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemFailure>,
}

/// Renders a batch outcome as the response envelope.
pub fn batch_response(
    outcome: BatchOutcome,
    success_message: &str,
) -> (StatusCode, Json<BatchResponse>) {
    if outcome.all_applied() {
        (
            StatusCode::OK,
            Json(BatchResponse {
                message: success_message.to_string(),
                errors: Vec::new(),
            }),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(BatchResponse {
                message: "Some operations failed".to_string(),
                errors: outcome.into_failures(),
            }),
        )
    }
}
