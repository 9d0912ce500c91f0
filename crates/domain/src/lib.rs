//! Domain layer for the storefront backend.
//!
//! This crate provides the cart/order mutation core:
//! - Line-item locator for semantic-key lookups in embedded arrays
//! - Mutation rule engine (pure operation table with quantity clamps)
//! - Batch orchestrator (fan-out/fan-in over independent element writes)
//! - Notification emitter for order status transitions
//! - Per-domain services over a generic document store

pub mod batch;
pub mod cart;
pub mod error;
pub mod locator;
pub mod notifications;
pub mod notify;
pub mod orders;
pub mod profile;
pub mod ratings;
pub mod rules;

pub use batch::{BatchOutcome, ItemFailure};
pub use cart::{CartAddEffect, CartAddIntent, CartService};
pub use error::DomainError;
pub use notifications::NotificationService;
pub use orders::{OrderLineRef, OrderPlacement, OrderService};
pub use profile::ProfileService;
pub use ratings::RatingService;
pub use rules::{CartOp, OrderOp, RuleViolation, UnknownOp, MAX_QUANTITY, MIN_QUANTITY};
