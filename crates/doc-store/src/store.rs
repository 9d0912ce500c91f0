use async_trait::async_trait;
use common::UserKey;

use crate::document::{UserDocument, UserProfile};
use crate::update::{ArrayPush, ElementPatch, ElementSelector, UpsertOutcome, WriteSummary};
use crate::Result;

/// Core trait for user-document store implementations.
///
/// Every operation is atomic at the single-document level; no
/// multi-document transactions are required. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches the full user document for a key.
    ///
    /// Returns None if no user exists under that key.
    async fn find_user(&self, key: &UserKey) -> Result<Option<UserDocument>>;

    /// Creates or updates the profile fields of a user document.
    ///
    /// A created document starts with empty cart/orders/ratings/notifications
    /// arrays; an update leaves the arrays untouched.
    async fn upsert_profile(&self, profile: UserProfile) -> Result<UpsertOutcome>;

    /// Applies a patch to the single array element addressed by `selector`.
    ///
    /// The write is filtered by the element's semantic key, so
    /// `WriteSummary::matched` reports whether the user and the element
    /// still existed at write time.
    async fn update_element(
        &self,
        key: &UserKey,
        selector: ElementSelector,
        patch: ElementPatch,
    ) -> Result<WriteSummary>;

    /// Appends elements to the user's embedded arrays in one atomic write.
    ///
    /// Pushes may target different arrays (e.g. an order entry plus its
    /// placement notification); either all land or none do.
    async fn push_elements(&self, key: &UserKey, pushes: Vec<ArrayPush>) -> Result<WriteSummary>;
}
