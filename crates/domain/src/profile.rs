//! Profile service: upsert and lookup of user documents.

use common::UserKey;
use doc_store::{DocumentStore, UpsertOutcome, UserDocument, UserProfile};

use crate::error::DomainError;

/// Service for profile upserts and user-document reads.
pub struct ProfileService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> ProfileService<S> {
    /// Creates a new profile service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates or updates the user's profile fields.
    ///
    /// A created document starts with empty embedded arrays.
    #[tracing::instrument(skip(self), fields(email = %profile.email))]
    pub async fn upsert(&self, profile: UserProfile) -> Result<UpsertOutcome, DomainError> {
        Ok(self.store.upsert_profile(profile).await?)
    }

    /// Returns the full user document.
    #[tracing::instrument(skip(self))]
    pub async fn user_info(&self, email: &UserKey) -> Result<UserDocument, DomainError> {
        self.store
            .find_user(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.clone()))
    }
}
