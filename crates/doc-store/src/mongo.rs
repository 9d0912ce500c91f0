use std::collections::HashMap;

use async_trait::async_trait;
use common::UserKey;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::{Client, Collection, Database};

use crate::document::{UserDocument, UserProfile};
use crate::store::DocumentStore;
use crate::update::{ArrayPush, ElementPatch, ElementSelector, FieldOp, UpsertOutcome, WriteSummary};
use crate::Result;

/// MongoDB-backed document store implementation.
///
/// Element patches become single `update_one` calls with `$[elem]` array
/// filters, so each targeted array-element update is atomic at the document
/// level.
#[derive(Clone)]
pub struct MongoDocumentStore {
    users: Collection<UserDocument>,
}

impl MongoDocumentStore {
    /// Creates a store over the `users` collection of a database.
    pub fn new(db: Database) -> Self {
        Self {
            users: db.collection("users"),
        }
    }

    /// Connects to a MongoDB deployment and selects the given database.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::new(client.database(db_name)))
    }

    /// Gets a reference to the underlying collection.
    pub fn collection(&self) -> &Collection<UserDocument> {
        &self.users
    }

    fn user_filter(key: &UserKey) -> Document {
        doc! { "email": key.as_str() }
    }

    /// Renders a selector into (document filter, element array-filter,
    /// positional path prefix).
    fn render_selector(selector: &ElementSelector) -> Result<(Document, Document, &'static str)> {
        match selector {
            ElementSelector::Cart { product } => Ok((
                doc! { "cart.productId": product.as_str() },
                doc! { "elem.productId": product.as_str() },
                "cart.$[elem]",
            )),
            ElementSelector::Order { product, placed_at } => {
                let time = bson::to_bson(placed_at)?;
                Ok((
                    doc! { "orders.productId": product.as_str(), "orders.orderTime": time.clone() },
                    doc! { "elem.productId": product.as_str(), "elem.orderTime": time },
                    "orders.$[elem]",
                ))
            }
            ElementSelector::Notification { id } => {
                let id = bson::to_bson(id)?;
                Ok((
                    doc! { "notifications.id": id.clone() },
                    doc! { "elem.id": id },
                    "notifications.$[elem]",
                ))
            }
        }
    }

    /// Renders a patch into an update document of `$inc`/`$set` stages
    /// rooted at the positional path prefix.
    fn render_patch(prefix: &str, patch: &ElementPatch) -> Result<Document> {
        let mut inc = Document::new();
        let mut set = Document::new();

        for op in patch.ops() {
            match op {
                FieldOp::IncQuantity(delta) => {
                    inc.insert(format!("{prefix}.quantity"), *delta);
                }
                FieldOp::SetQuantity(quantity) => {
                    set.insert(format!("{prefix}.quantity"), *quantity as i64);
                }
                FieldOp::SetCartStatus(status) => {
                    set.insert(format!("{prefix}.status"), bson::to_bson(status)?);
                }
                FieldOp::SetWishlist(wishlist) => {
                    set.insert(format!("{prefix}.wishlist"), *wishlist);
                }
                FieldOp::SetOrderStatus(status) => {
                    set.insert(format!("{prefix}.status"), bson::to_bson(status)?);
                }
                FieldOp::SetCancelled(cancelled) => {
                    set.insert(format!("{prefix}.isCancelled"), *cancelled);
                }
                FieldOp::SetRead(read) => {
                    set.insert(format!("{prefix}.isRead"), *read);
                }
            }
        }

        let mut update = Document::new();
        if !inc.is_empty() {
            update.insert("$inc", inc);
        }
        if !set.is_empty() {
            update.insert("$set", set);
        }
        Ok(update)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn find_user(&self, key: &UserKey) -> Result<Option<UserDocument>> {
        let doc = self.users.find_one(Self::user_filter(key)).await?;
        Ok(doc)
    }

    async fn upsert_profile(&self, profile: UserProfile) -> Result<UpsertOutcome> {
        let filter = Self::user_filter(&profile.email);
        let set = bson::to_document(&profile)?;
        let update = doc! {
            "$set": set,
            "$setOnInsert": {
                "cart": [],
                "orders": [],
                "ratings": [],
                "notifications": [],
            },
        };

        let result = self.users.update_one(filter, update).upsert(true).await?;
        Ok(UpsertOutcome {
            created: result.upserted_id.is_some(),
        })
    }

    async fn update_element(
        &self,
        key: &UserKey,
        selector: ElementSelector,
        patch: ElementPatch,
    ) -> Result<WriteSummary> {
        let (element_filter, array_filter, prefix) = Self::render_selector(&selector)?;
        let mut filter = Self::user_filter(key);
        filter.extend(element_filter);

        let update = Self::render_patch(prefix, &patch)?;
        if update.is_empty() {
            return Ok(WriteSummary::default());
        }

        let result = self
            .users
            .update_one(filter, update)
            .array_filters(vec![array_filter])
            .await?;

        tracing::debug!(
            matched = result.matched_count,
            modified = result.modified_count,
            "targeted element update"
        );

        Ok(WriteSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn push_elements(&self, key: &UserKey, pushes: Vec<ArrayPush>) -> Result<WriteSummary> {
        let mut grouped: HashMap<&'static str, Vec<Bson>> = HashMap::new();
        for push in &pushes {
            let value = match push {
                ArrayPush::Cart(entry) => bson::to_bson(entry)?,
                ArrayPush::Order(entry) => bson::to_bson(entry)?,
                ArrayPush::Rating(entry) => bson::to_bson(entry)?,
                ArrayPush::Notification(entry) => bson::to_bson(entry)?,
            };
            grouped.entry(push.array_field()).or_default().push(value);
        }
        if grouped.is_empty() {
            return Ok(WriteSummary::default());
        }

        let mut push_doc = Document::new();
        for (field, mut values) in grouped {
            // A single element pushes directly; multiple use $each.
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                Bson::Document(doc! { "$each": values })
            };
            push_doc.insert(field, value);
        }

        let result = self
            .users
            .update_one(Self::user_filter(key), doc! { "$push": push_doc })
            .await?;

        Ok(WriteSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }
}
