//! Domain error types.

use common::UserKey;
use doc_store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that abort a whole request.
///
/// Per-item outcomes (not found, rejected, write mismatch) are not errors;
/// they travel inside [`crate::BatchOutcome`] so one bad item never stops
/// the rest of its batch.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the document store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// No user document exists under the given key.
    #[error("User not found: {0}")]
    UserNotFound(UserKey),

    /// No notification exists under the given id.
    #[error("Notification not found: {0}")]
    NotificationNotFound(Uuid),
}
