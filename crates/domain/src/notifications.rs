//! Notification service: newest-first reads and read-flag flips.

use common::UserKey;
use doc_store::{DocumentStore, ElementPatch, ElementSelector, NotificationEntry};
use uuid::Uuid;

use crate::error::DomainError;

/// Service for notification reads and read-flag updates.
pub struct NotificationService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> NotificationService<S> {
    /// Creates a new notification service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the user's notifications, newest first.
    ///
    /// Emission is batched and concurrent, so insertion order is not
    /// trustworthy; the sort happens here at read time.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, email: &UserKey) -> Result<Vec<NotificationEntry>, DomainError> {
        let mut notifications = self
            .store
            .find_user(email)
            .await?
            .map(|user| user.notifications)
            .unwrap_or_default();

        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Marks one notification as read.
    #[tracing::instrument(skip(self))]
    pub async fn mark_read(&self, email: &UserKey, id: Uuid) -> Result<(), DomainError> {
        let summary = self
            .store
            .update_element(
                email,
                ElementSelector::Notification { id },
                ElementPatch::new().set_read(true),
            )
            .await?;

        if !summary.matched_any() {
            return Err(DomainError::NotificationNotFound(id));
        }
        Ok(())
    }
}
