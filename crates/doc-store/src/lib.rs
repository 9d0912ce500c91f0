//! User-document store for the storefront backend.
//!
//! One document per user, keyed by email. Carts, orders, ratings and
//! notifications live as embedded arrays inside the document, and array
//! elements are addressed by semantic key (product id, and order time for
//! orders) rather than by position.

pub mod document;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod store;
pub mod update;

pub use common::{ProductId, UserKey};
pub use document::{
    CartEntry, CartStatus, NotificationEntry, OrderEntry, OrderStatus, ProductSnapshot,
    RatingEntry, UserDocument, UserProfile,
};
pub use error::{Result, StoreError};
pub use memory::InMemoryDocumentStore;
pub use mongo::MongoDocumentStore;
pub use store::DocumentStore;
pub use update::{ArrayPush, ElementPatch, ElementSelector, FieldOp, UpsertOutcome, WriteSummary};
