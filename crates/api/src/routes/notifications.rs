//! Notification endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::UserKey;
use doc_store::{DocumentStore, NotificationEntry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub email: String,
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<NotificationEntry>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /notifications/{email} — the user's notifications, newest first.
#[tracing::instrument(skip(state))]
pub async fn read<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(email): Path<String>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let notifications = state.notifications.list(&UserKey::new(email)).await?;
    Ok(Json(NotificationsResponse { notifications }))
}

/// PATCH /notifications — mark one notification as read.
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn mark_read<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = UserKey::new(req.email);
    state.notifications.mark_read(&email, req.id).await?;

    Ok(Json(MessageResponse {
        message: "Notification marked as read".to_string(),
    }))
}
