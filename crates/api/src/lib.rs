//! HTTP API server with observability for the storefront backend.
//!
//! Provides REST endpoints for user profiles, carts, orders, ratings and
//! notifications, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use doc_store::DocumentStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DocumentStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/users", post(routes::users::upsert::<S>))
        .route("/users/{email}", get(routes::users::info::<S>))
        .route("/cart", post(routes::cart::add::<S>))
        .route("/cart", patch(routes::cart::modify::<S>))
        .route("/cart/{email}", get(routes::cart::read::<S>))
        .route("/orders", post(routes::orders::place::<S>))
        .route("/orders", patch(routes::orders::modify::<S>))
        .route("/orders/{email}", get(routes::orders::read::<S>))
        .route("/ratings", post(routes::ratings::add::<S>))
        .route("/ratings/{email}", get(routes::ratings::read::<S>))
        .route("/notifications", patch(routes::notifications::mark_read::<S>))
        .route("/notifications/{email}", get(routes::notifications::read::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state with one service per domain over a shared
/// store.
pub fn create_default_state<S: DocumentStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    use domain::{
        CartService, NotificationService, OrderService, ProfileService, RatingService,
    };

    Arc::new(AppState {
        profiles: ProfileService::new(store.clone()),
        cart: CartService::new(store.clone()),
        orders: OrderService::new(store.clone()),
        ratings: RatingService::new(store.clone()),
        notifications: NotificationService::new(store),
    })
}
