//! Order service: placement and batch status transitions.

use std::time::Instant;

use chrono::Utc;
use common::{ProductId, UserKey};
use doc_store::{ArrayPush, DocumentStore, ElementSelector, OrderEntry, ProductSnapshot};

use crate::batch::{execute_batch, BatchOutcome, ItemFailure, Planned};
use crate::error::DomainError;
use crate::locator;
use crate::notify;
use crate::rules::{self, OrderOp};

/// One line of a placement request.
#[derive(Debug, Clone)]
pub struct OrderPlacement {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

/// Key identifying one order line in a modify batch, with the order time
/// as received on the wire.
#[derive(Debug, Clone)]
pub struct OrderLineRef {
    pub product_id: ProductId,
    pub order_time: String,
}

/// Service for order reads, placement and status transitions.
pub struct OrderService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> OrderService<S> {
    /// Creates a new order service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Places orders for a batch of products.
    ///
    /// Each line becomes an order entry stamped with its own placement
    /// time, pushed together with its placement notification in one atomic
    /// document write. Lines are written independently and concurrently.
    #[tracing::instrument(skip(self, lines), fields(items = lines.len()))]
    pub async fn place(
        &self,
        email: &UserKey,
        lines: Vec<OrderPlacement>,
    ) -> Result<BatchOutcome, DomainError> {
        let started = Instant::now();

        if self.store.find_user(email).await?.is_none() {
            return Err(DomainError::UserNotFound(email.clone()));
        }

        let planned = lines
            .into_iter()
            .map(|line| {
                let order_time = Utc::now();
                let notification = notify::placement(&line.product);
                let product_id = line.product.product_id.clone();
                let entry = OrderEntry::placed(line.product, line.quantity, order_time);
                Planned::Push {
                    product: product_id,
                    pushes: vec![
                        ArrayPush::Order(entry),
                        ArrayPush::Notification(notification),
                    ],
                }
            })
            .collect();

        let outcome = execute_batch(&self.store, email, planned, "Failed to add new product").await?;

        metrics::counter!("orders_placed_total")
            .increment((outcome.attempted() - outcome.failures().len()) as u64);
        metrics::histogram!("order_batch_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        Ok(outcome)
    }

    /// Applies one status transition to a batch of order lines.
    ///
    /// Lines are located by (product id, order time); an unparseable or
    /// mismatched time is the same as an absent entry. Transitions that
    /// notify append their notification after the status write is
    /// confirmed.
    #[tracing::instrument(skip(self, lines), fields(items = lines.len()))]
    pub async fn modify(
        &self,
        email: &UserKey,
        lines: Vec<OrderLineRef>,
        modify_type: &str,
    ) -> Result<BatchOutcome, DomainError> {
        let started = Instant::now();

        let user = self
            .store
            .find_user(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.clone()))?;

        let op = modify_type.parse::<OrderOp>().ok();

        let planned = lines
            .into_iter()
            .map(|line| {
                let Some(op) = op else {
                    return Planned::Failed(ItemFailure::new(
                        line.product_id,
                        400,
                        "Invalid modifyType",
                    ));
                };
                let Some(placed_at) = locator::parse_order_time(&line.order_time) else {
                    return Planned::Failed(ItemFailure::new(
                        line.product_id,
                        404,
                        "Product not found in order list",
                    ));
                };
                let Some(entry) =
                    locator::find_order_entry(&user.orders, &line.product_id, placed_at)
                else {
                    return Planned::Failed(ItemFailure::new(
                        line.product_id,
                        404,
                        "Product not found in order list",
                    ));
                };
                Planned::Write {
                    selector: ElementSelector::Order {
                        product: line.product_id.clone(),
                        placed_at,
                    },
                    product: line.product_id,
                    patch: rules::apply_order(op),
                    follow_up: notify::for_transition(op, &entry.product),
                }
            })
            .collect();

        let outcome =
            execute_batch(&self.store, email, planned, "User or product not found").await?;

        metrics::counter!("order_batch_items_total").increment(outcome.attempted() as u64);
        metrics::counter!("order_batch_failures_total")
            .increment(outcome.failures().len() as u64);
        metrics::histogram!("order_batch_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        Ok(outcome)
    }

    /// Returns the user's orders, or an empty array for an unknown user.
    #[tracing::instrument(skip(self))]
    pub async fn orders(&self, email: &UserKey) -> Result<Vec<OrderEntry>, DomainError> {
        Ok(self
            .store
            .find_user(email)
            .await?
            .map(|user| user.orders)
            .unwrap_or_default())
    }
}
