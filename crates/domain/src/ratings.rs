//! Rating service: append-only product ratings.

use chrono::Utc;
use common::UserKey;
use doc_store::{ArrayPush, DocumentStore, ProductSnapshot, RatingEntry};

use crate::error::DomainError;

/// Service for rating reads and appends.
pub struct RatingService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> RatingService<S> {
    /// Creates a new rating service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Appends a rating for a product.
    ///
    /// A single atomic push; a write that matches no document means the
    /// user does not exist.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub async fn add(
        &self,
        email: &UserKey,
        product: ProductSnapshot,
        rating: f64,
    ) -> Result<(), DomainError> {
        let entry = RatingEntry {
            product,
            rating,
            order_time: Utc::now(),
        };

        let summary = self
            .store
            .push_elements(email, vec![ArrayPush::Rating(entry)])
            .await?;
        if !summary.matched_any() {
            return Err(DomainError::UserNotFound(email.clone()));
        }

        metrics::counter!("ratings_added_total").increment(1);
        Ok(())
    }

    /// Returns the user's ratings, or an empty array for an unknown user.
    #[tracing::instrument(skip(self))]
    pub async fn ratings(&self, email: &UserKey) -> Result<Vec<RatingEntry>, DomainError> {
        Ok(self
            .store
            .find_user(email)
            .await?
            .map(|user| user.ratings)
            .unwrap_or_default())
    }
}
