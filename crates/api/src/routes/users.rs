//! User profile endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::UserKey;
use doc_store::{DocumentStore, UserDocument, UserProfile};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /users — create or update a user profile.
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn upsert<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UpsertUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let profile = UserProfile {
        email: UserKey::new(req.email),
        name: req.name,
        role: req.role,
    };

    let outcome = state.profiles.upsert(profile).await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "New user created successfully")
    } else {
        (StatusCode::OK, "User updated successfully")
    };

    Ok((
        status,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    ))
}

/// GET /users/{email} — full user document.
#[tracing::instrument(skip(state))]
pub async fn info<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(email): Path<String>,
) -> Result<Json<UserDocument>, ApiError> {
    let doc = state.profiles.user_info(&UserKey::new(email)).await?;
    Ok(Json(doc))
}
