//! Batch orchestrator: fan-out/fan-in over independent element writes.
//!
//! Each item in a batch is located, rule-checked and written on its own;
//! one item's rejection never stops the others. Writes run concurrently and
//! the orchestrator waits for all of them to settle before aggregating.

use common::{ProductId, UserKey};
use doc_store::{ArrayPush, DocumentStore, ElementPatch, ElementSelector, NotificationEntry};
use futures_util::future::join_all;
use serde::Serialize;

use crate::error::DomainError;

/// Per-item failure surfaced in the aggregate response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    /// Identity key of the item the failure refers to.
    pub product_id: ProductId,

    /// HTTP-style status for this item (400 rejection, 404 not found).
    pub status: u16,

    /// Human-readable reason, surfaced verbatim to the caller.
    pub message: String,
}

impl ItemFailure {
    pub fn new(product_id: ProductId, status: u16, message: impl Into<String>) -> Self {
        Self {
            product_id,
            status,
            message: message.into(),
        }
    }
}

/// Aggregate result of one batch.
///
/// On full success the caller gets a batch-level message only; individual
/// applied items are not echoed. Anything else carries the non-applied
/// outcomes, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    attempted: usize,
    failures: Vec<ItemFailure>,
}

impl BatchOutcome {
    /// Number of items the batch carried.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// The non-applied outcomes, in request order.
    pub fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }

    /// Consumes the outcome, yielding the failures.
    pub fn into_failures(self) -> Vec<ItemFailure> {
        self.failures
    }

    /// True when every item in the batch was applied.
    pub fn all_applied(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One planned step for a batch item.
#[derive(Debug)]
pub(crate) enum Planned {
    /// A targeted update of one array element, plus an optional
    /// notification appended once the write is confirmed.
    Write {
        product: ProductId,
        selector: ElementSelector,
        patch: ElementPatch,
        follow_up: Option<NotificationEntry>,
    },

    /// An atomic append of new elements (e.g. an order entry together with
    /// its placement notification).
    Push {
        product: ProductId,
        pushes: Vec<ArrayPush>,
    },

    /// The item already failed during planning (unknown operation, entry
    /// not found, rule violation); no write is issued.
    Failed(ItemFailure),
}

/// Executes the planned steps concurrently and aggregates the outcomes.
///
/// A write whose filter matches nothing means the user or the element was
/// gone by write time; that item fails with `mismatch_message` (404). Store
/// errors abort the whole batch.
pub(crate) async fn execute_batch<S: DocumentStore>(
    store: &S,
    email: &UserKey,
    planned: Vec<Planned>,
    mismatch_message: &str,
) -> Result<BatchOutcome, DomainError> {
    let attempted = planned.len();

    let writes = planned.into_iter().map(|step| async move {
        match step {
            Planned::Failed(failure) => Ok::<_, DomainError>(Some(failure)),

            Planned::Write {
                product,
                selector,
                patch,
                follow_up,
            } => {
                let summary = store.update_element(email, selector, patch).await?;
                if !summary.matched_any() {
                    return Ok(Some(ItemFailure::new(product, 404, mismatch_message)));
                }
                if let Some(notification) = follow_up {
                    store
                        .push_elements(email, vec![ArrayPush::Notification(notification)])
                        .await?;
                    metrics::counter!("notifications_emitted_total").increment(1);
                }
                Ok(None)
            }

            Planned::Push { product, pushes } => {
                let emitted = pushes
                    .iter()
                    .filter(|p| matches!(p, ArrayPush::Notification(_)))
                    .count() as u64;
                let summary = store.push_elements(email, pushes).await?;
                if !summary.matched_any() {
                    return Ok(Some(ItemFailure::new(product, 404, mismatch_message)));
                }
                metrics::counter!("notifications_emitted_total").increment(emitted);
                Ok(None)
            }
        }
    });

    let mut failures = Vec::new();
    for result in join_all(writes).await {
        if let Some(failure) = result? {
            failures.push(failure);
        }
    }

    Ok(BatchOutcome {
        attempted,
        failures,
    })
}
