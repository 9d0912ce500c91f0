//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::UserKey;
use doc_store::{DocumentStore, OrderEntry};
use domain::{OrderLineRef, OrderPlacement};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::{AppState, BatchResponse, OneOrMany, ProductPayload, batch_response};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductPayload {
    #[serde(flatten)]
    pub product: ProductPayload,
    pub quantity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrdersRequest {
    pub email: String,
    pub data: OneOrMany<OrderProductPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRef {
    pub product_id: String,
    pub order_time: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOrdersRequest {
    pub email: String,
    pub data: OneOrMany<OrderItemRef>,
    pub modify_type: String,
}

#[derive(Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderEntry>,
}

/// POST /orders — place one order entry per product, each with its
/// placement notification appended atomically.
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn place<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<PlaceOrdersRequest>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let email = UserKey::new(req.email);
    let lines = req
        .data
        .into_vec()
        .into_iter()
        .map(|payload| OrderPlacement {
            product: payload.product.into(),
            quantity: payload.quantity,
        })
        .collect();

    let outcome = state.orders.place(&email, lines).await?;

    Ok(batch_response(outcome, "All products processed successfully"))
}

/// PATCH /orders — apply one status transition to a batch of order lines.
#[tracing::instrument(skip(state, req), fields(email = %req.email, modify_type = %req.modify_type))]
pub async fn modify<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ModifyOrdersRequest>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let email = UserKey::new(req.email);
    let lines = req
        .data
        .into_vec()
        .into_iter()
        .map(|item| OrderLineRef {
            product_id: item.product_id.into(),
            order_time: item.order_time,
        })
        .collect();

    let outcome = state.orders.modify(&email, lines, &req.modify_type).await?;

    Ok(batch_response(outcome, "All orders updated successfully"))
}

/// GET /orders/{email} — the user's orders (empty array for unknown users).
#[tracing::instrument(skip(state))]
pub async fn read<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(email): Path<String>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let orders = state.orders.orders(&UserKey::new(email)).await?;
    Ok(Json(OrdersResponse { orders }))
}
