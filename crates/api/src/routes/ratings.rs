//! Rating endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::UserKey;
use doc_store::{DocumentStore, RatingEntry};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::{AppState, ProductPayload};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRatingRequest {
    pub email: String,
    pub data: ProductPayload,
    pub rating: f64,
}

#[derive(Serialize)]
pub struct RatingsResponse {
    pub ratings: Vec<RatingEntry>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /ratings — append a rating for a product.
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn add<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<AddRatingRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = UserKey::new(req.email);
    state
        .ratings
        .add(&email, req.data.into(), req.rating)
        .await?;

    Ok(Json(MessageResponse {
        message: "Ratings added successfully".to_string(),
    }))
}

/// GET /ratings/{email} — the user's ratings (empty array for unknown users).
#[tracing::instrument(skip(state))]
pub async fn read<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(email): Path<String>,
) -> Result<Json<RatingsResponse>, ApiError> {
    let ratings = state.ratings.ratings(&UserKey::new(email)).await?;
    Ok(Json(RatingsResponse { ratings }))
}
