use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserKey;
use tokio::sync::RwLock;

use crate::document::{UserDocument, UserProfile};
use crate::store::DocumentStore;
use crate::update::{ArrayPush, ElementPatch, ElementSelector, FieldOp, UpsertOutcome, WriteSummary};
use crate::Result;

/// In-memory document store implementation for testing.
///
/// Stores user documents in a map and provides the same interface and
/// matched/modified semantics as the MongoDB implementation.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    users: Arc<RwLock<HashMap<UserKey, UserDocument>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of user documents stored.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Inserts a pre-built document, replacing any existing one. Test seeding.
    pub async fn insert_user(&self, doc: UserDocument) {
        self.users.write().await.insert(doc.email.clone(), doc);
    }

    /// Clears all documents.
    pub async fn clear(&self) {
        self.users.write().await.clear();
    }
}

fn apply_op(doc: &mut UserDocument, selector: &ElementSelector, op: &FieldOp) -> bool {
    match selector {
        ElementSelector::Cart { product } => {
            let Some(entry) = doc.cart.iter_mut().find(|e| e.product_id() == product) else {
                return false;
            };
            match op {
                FieldOp::IncQuantity(delta) => {
                    let next = (entry.quantity as i64 + delta).max(0) as u32;
                    let changed = next != entry.quantity;
                    entry.quantity = next;
                    changed
                }
                FieldOp::SetQuantity(q) => {
                    let changed = entry.quantity != *q;
                    entry.quantity = *q;
                    changed
                }
                FieldOp::SetCartStatus(status) => {
                    let changed = entry.status != *status;
                    entry.status = *status;
                    changed
                }
                FieldOp::SetWishlist(wishlist) => {
                    let changed = entry.wishlist != Some(*wishlist);
                    entry.wishlist = Some(*wishlist);
                    changed
                }
                _ => false,
            }
        }
        ElementSelector::Order { product, placed_at } => {
            let Some(entry) = doc
                .orders
                .iter_mut()
                .find(|e| e.product_id() == product && e.order_time == *placed_at)
            else {
                return false;
            };
            match op {
                FieldOp::SetOrderStatus(status) => {
                    let changed = entry.status != *status;
                    entry.status = *status;
                    changed
                }
                FieldOp::SetCancelled(cancelled) => {
                    let changed = entry.is_cancelled != *cancelled;
                    entry.is_cancelled = *cancelled;
                    changed
                }
                FieldOp::SetQuantity(q) => {
                    let changed = entry.quantity != *q;
                    entry.quantity = *q;
                    changed
                }
                _ => false,
            }
        }
        ElementSelector::Notification { id } => {
            let Some(entry) = doc.notifications.iter_mut().find(|e| e.id == *id) else {
                return false;
            };
            match op {
                FieldOp::SetRead(read) => {
                    let changed = entry.is_read != *read;
                    entry.is_read = *read;
                    changed
                }
                _ => false,
            }
        }
    }
}

fn selector_matches(doc: &UserDocument, selector: &ElementSelector) -> bool {
    match selector {
        ElementSelector::Cart { product } => doc.cart.iter().any(|e| e.product_id() == product),
        ElementSelector::Order { product, placed_at } => doc
            .orders
            .iter()
            .any(|e| e.product_id() == product && e.order_time == *placed_at),
        ElementSelector::Notification { id } => doc.notifications.iter().any(|e| e.id == *id),
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_user(&self, key: &UserKey) -> Result<Option<UserDocument>> {
        let users = self.users.read().await;
        Ok(users.get(key).cloned())
    }

    async fn upsert_profile(&self, profile: UserProfile) -> Result<UpsertOutcome> {
        let mut users = self.users.write().await;
        match users.get_mut(&profile.email) {
            Some(doc) => {
                doc.name = profile.name;
                doc.role = profile.role;
                Ok(UpsertOutcome { created: false })
            }
            None => {
                users.insert(profile.email.clone(), UserDocument::from_profile(profile));
                Ok(UpsertOutcome { created: true })
            }
        }
    }

    async fn update_element(
        &self,
        key: &UserKey,
        selector: ElementSelector,
        patch: ElementPatch,
    ) -> Result<WriteSummary> {
        if patch.is_empty() {
            return Ok(WriteSummary::default());
        }

        let mut users = self.users.write().await;

        let Some(doc) = users.get_mut(key) else {
            return Ok(WriteSummary::default());
        };
        if !selector_matches(doc, &selector) {
            return Ok(WriteSummary::default());
        }

        let mut modified = false;
        for op in patch.ops() {
            modified |= apply_op(doc, &selector, op);
        }

        Ok(WriteSummary {
            matched: 1,
            modified: modified as u64,
        })
    }

    async fn push_elements(&self, key: &UserKey, pushes: Vec<ArrayPush>) -> Result<WriteSummary> {
        let mut users = self.users.write().await;

        let Some(doc) = users.get_mut(key) else {
            return Ok(WriteSummary::default());
        };

        for push in pushes {
            match push {
                ArrayPush::Cart(entry) => doc.cart.push(entry),
                ArrayPush::Order(entry) => doc.orders.push(entry),
                ArrayPush::Rating(entry) => doc.ratings.push(entry),
                ArrayPush::Notification(entry) => doc.notifications.push(entry),
            }
        }

        Ok(WriteSummary {
            matched: 1,
            modified: 1,
        })
    }
}
