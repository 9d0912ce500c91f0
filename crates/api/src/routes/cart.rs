//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::UserKey;
use doc_store::{CartEntry, DocumentStore};
use domain::{CartAddEffect, CartAddIntent};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::{AppState, BatchResponse, OneOrMany, ProductPayload, batch_response};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub email: String,
    pub product: ProductPayload,
    pub status: CartAddIntent,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRef {
    pub product_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyCartRequest {
    pub email: String,
    pub data: OneOrMany<CartItemRef>,
    pub modify_type: String,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub cart: Vec<CartEntry>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /cart — add a product to the cart (or bump/confirm/wishlist an
/// existing entry).
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn add<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = UserKey::new(req.email);
    let effect = state
        .cart
        .add(&email, req.product.into(), req.status)
        .await?;

    let message = match effect {
        CartAddEffect::AddedToCart => "Product added to the cart",
        CartAddEffect::ConfirmedOrder => "Thank you for your order!",
        CartAddEffect::Wishlisted => "Product added to the wishlist",
    };

    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

/// PATCH /cart — apply one operation to a batch of cart items.
#[tracing::instrument(skip(state, req), fields(email = %req.email, modify_type = %req.modify_type))]
pub async fn modify<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ModifyCartRequest>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let email = UserKey::new(req.email);
    let products = req
        .data
        .into_vec()
        .into_iter()
        .map(|item| item.product_id.into())
        .collect();

    let outcome = state.cart.modify(&email, products, &req.modify_type).await?;

    Ok(batch_response(outcome, "All cart items updated successfully"))
}

/// GET /cart/{email} — the user's cart (empty array for unknown users).
#[tracing::instrument(skip(state))]
pub async fn read<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(email): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state.cart.cart(&UserKey::new(email)).await?;
    Ok(Json(CartResponse { cart }))
}
