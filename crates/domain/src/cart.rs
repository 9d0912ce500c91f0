//! Cart service: add-to-cart semantics and batch mutations.

use std::time::Instant;

use common::{ProductId, UserKey};
use doc_store::{
    ArrayPush, CartEntry, CartStatus, DocumentStore, ElementPatch, ElementSelector,
    ProductSnapshot,
};
use serde::Deserialize;

use crate::batch::{execute_batch, BatchOutcome, ItemFailure, Planned};
use crate::error::DomainError;
use crate::locator;
use crate::rules::{self, CartOp};

/// What an add-to-cart request intends for the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAddIntent {
    /// Put it in the cart (or bump the quantity if already there).
    Pending,
    /// Confirm the entry as ordered.
    Confirmed,
    /// Save it to the wishlist.
    Wishlist,
}

/// What an add-to-cart request actually did, for response messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAddEffect {
    AddedToCart,
    ConfirmedOrder,
    Wishlisted,
}

/// Service for cart reads and mutations.
pub struct CartService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> CartService<S> {
    /// Creates a new cart service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds a product to the user's cart.
    ///
    /// If the product is already present, `pending` bumps the quantity and
    /// resets the status, `confirmed` freezes the entry as ordered, and
    /// `wishlist` sets the wishlist flag. A product not yet in the cart is
    /// pushed as a fresh entry.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub async fn add(
        &self,
        email: &UserKey,
        product: ProductSnapshot,
        intent: CartAddIntent,
    ) -> Result<CartAddEffect, DomainError> {
        let user = self
            .store
            .find_user(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.clone()))?;

        let summary = if locator::find_cart_entry(&user.cart, &product.product_id).is_some() {
            let patch = match intent {
                CartAddIntent::Pending => ElementPatch::new()
                    .inc_quantity(1)
                    .set_cart_status(CartStatus::Pending),
                CartAddIntent::Confirmed => {
                    ElementPatch::new().set_cart_status(CartStatus::Confirmed)
                }
                CartAddIntent::Wishlist => ElementPatch::new().set_wishlist(true),
            };
            self.store
                .update_element(
                    email,
                    ElementSelector::Cart {
                        product: product.product_id.clone(),
                    },
                    patch,
                )
                .await?
        } else {
            let entry = match intent {
                CartAddIntent::Pending => CartEntry::new(product, CartStatus::Pending),
                CartAddIntent::Confirmed => CartEntry::new(product, CartStatus::Confirmed),
                CartAddIntent::Wishlist => CartEntry::wishlisted(product),
            };
            self.store
                .push_elements(email, vec![ArrayPush::Cart(entry)])
                .await?
        };

        if !summary.matched_any() {
            return Err(DomainError::UserNotFound(email.clone()));
        }

        metrics::counter!("cart_adds_total").increment(1);

        Ok(match intent {
            CartAddIntent::Pending => CartAddEffect::AddedToCart,
            CartAddIntent::Confirmed => CartAddEffect::ConfirmedOrder,
            CartAddIntent::Wishlist => CartAddEffect::Wishlisted,
        })
    }

    /// Applies one operation to a batch of cart items.
    ///
    /// The operation name is uniform across the batch; an unrecognized name
    /// fails every item. Each item is otherwise located, rule-checked and
    /// written independently against a single snapshot of the user document.
    #[tracing::instrument(skip(self, products), fields(items = products.len()))]
    pub async fn modify(
        &self,
        email: &UserKey,
        products: Vec<ProductId>,
        modify_type: &str,
    ) -> Result<BatchOutcome, DomainError> {
        let started = Instant::now();

        let user = self
            .store
            .find_user(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.clone()))?;

        let op = modify_type.parse::<CartOp>().ok();

        let planned = products
            .into_iter()
            .map(|product| {
                let Some(op) = op else {
                    return Planned::Failed(ItemFailure::new(product, 400, "Invalid modifyType"));
                };
                let Some(entry) = locator::find_cart_entry(&user.cart, &product) else {
                    return Planned::Failed(ItemFailure::new(
                        product,
                        404,
                        "Product not found in cart",
                    ));
                };
                match rules::apply_cart(entry, op) {
                    Ok(patch) => Planned::Write {
                        selector: ElementSelector::Cart {
                            product: product.clone(),
                        },
                        product,
                        patch,
                        follow_up: None,
                    },
                    Err(violation) => {
                        Planned::Failed(ItemFailure::new(product, 400, violation.to_string()))
                    }
                }
            })
            .collect();

        let outcome =
            execute_batch(&self.store, email, planned, "User or product not found").await?;

        metrics::counter!("cart_batch_items_total").increment(outcome.attempted() as u64);
        metrics::counter!("cart_batch_failures_total")
            .increment(outcome.failures().len() as u64);
        metrics::histogram!("cart_batch_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        Ok(outcome)
    }

    /// Returns the user's cart, or an empty array for an unknown user.
    #[tracing::instrument(skip(self))]
    pub async fn cart(&self, email: &UserKey) -> Result<Vec<CartEntry>, DomainError> {
        Ok(self
            .store
            .find_user(email)
            .await?
            .map(|user| user.cart)
            .unwrap_or_default())
    }
}
