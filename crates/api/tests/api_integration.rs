//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use doc_store::{DocumentStore, InMemoryDocumentStore, NotificationEntry, UserKey};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> Router {
    setup_with_store().0
}

fn setup_with_store() -> (Router, InMemoryDocumentStore) {
    let store = InMemoryDocumentStore::new();
    let state = api::create_default_state(store.clone());
    let app = api::create_app(state, get_metrics_handle());
    (app, store)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            builder
                .body(Body::from(serde_json::to_string(&json).unwrap()))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, email: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/users",
        Some(serde_json::json!({ "email": email, "name": "Test User", "role": "user" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn widget(id: &str) -> serde_json::Value {
    serde_json::json!({
        "productId": id,
        "title": format!("Product {id}"),
        "price": 1500,
        "image": "https://img/widget"
    })
}

async fn add_to_cart(app: &Router, email: &str, product_id: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/cart",
        Some(serde_json::json!({
            "email": email,
            "product": widget(product_id),
            "status": "pending"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();
    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_register_then_update_user() {
    let app = setup();

    let body = serde_json::json!({ "email": "alice@example.com", "name": "Alice" });
    let (status, json) = send(&app, "POST", "/users", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "New user created successfully");

    let (status, json) = send(&app, "POST", "/users", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "User updated successfully");
}

#[tokio::test]
async fn test_user_info() {
    let app = setup();

    let (status, _) = send(&app, "GET", "/users/ghost@example.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    register(&app, "alice@example.com").await;
    let (status, json) = send(&app, "GET", "/users/alice@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["name"], "Test User");
    assert_eq!(json["cart"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_add_to_cart_and_read_back() {
    let app = setup();
    register(&app, "alice@example.com").await;

    let (status, json) = send(
        &app,
        "POST",
        "/cart",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "product": widget("P-1"),
            "status": "pending"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Product added to the cart");

    let (status, json) = send(&app, "GET", "/cart/alice@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    let cart = json["cart"].as_array().unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["productId"], "P-1");
    assert_eq!(cart[0]["quantity"], 1);
    assert_eq!(cart[0]["status"], "pending");
}

#[tokio::test]
async fn test_adding_same_product_bumps_quantity() {
    let app = setup();
    register(&app, "alice@example.com").await;

    add_to_cart(&app, "alice@example.com", "P-1").await;
    add_to_cart(&app, "alice@example.com", "P-1").await;

    let (_, json) = send(&app, "GET", "/cart/alice@example.com", None).await;
    let cart = json["cart"].as_array().unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["quantity"], 2);
}

#[tokio::test]
async fn test_cart_read_for_unknown_user_is_empty() {
    let app = setup();
    let (status, json) = send(&app, "GET", "/cart/ghost@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cart"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_add_to_cart_unknown_user_is_404() {
    let app = setup();
    let (status, _) = send(
        &app,
        "POST",
        "/cart",
        Some(serde_json::json!({
            "email": "ghost@example.com",
            "product": widget("P-1"),
            "status": "pending"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_modify_cart_full_success_envelope() {
    let app = setup();
    register(&app, "alice@example.com").await;
    add_to_cart(&app, "alice@example.com", "P-1").await;
    add_to_cart(&app, "alice@example.com", "P-1").await;
    add_to_cart(&app, "alice@example.com", "P-1").await;

    // quantity 3 -> 4
    let (status, json) = send(
        &app,
        "PATCH",
        "/cart",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1" }],
            "modifyType": "increase"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "All cart items updated successfully");
    // Applied items are not echoed on full success.
    assert!(json.get("errors").is_none());

    let (_, json) = send(&app, "GET", "/cart/alice@example.com", None).await;
    assert_eq!(json["cart"][0]["quantity"], 4);
}

#[tokio::test]
async fn test_increase_at_ceiling_yields_exact_failure_envelope() {
    let app = setup();
    register(&app, "alice@example.com").await;
    for _ in 0..5 {
        add_to_cart(&app, "alice@example.com", "P-1").await;
    }
    let (_, json) = send(&app, "GET", "/cart/alice@example.com", None).await;
    assert_eq!(json["cart"][0]["quantity"], 5);

    let (status, json) = send(
        &app,
        "PATCH",
        "/cart",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1" }],
            "modifyType": "increase"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        serde_json::json!({
            "message": "Some operations failed",
            "errors": [{
                "productId": "P-1",
                "status": 400,
                "message": "Cannot increase quantity above 5"
            }]
        })
    );

    // Quantity is unchanged.
    let (_, json) = send(&app, "GET", "/cart/alice@example.com", None).await;
    assert_eq!(json["cart"][0]["quantity"], 5);
}

#[tokio::test]
async fn test_decrease_at_floor_rejects() {
    let app = setup();
    register(&app, "alice@example.com").await;
    add_to_cart(&app, "alice@example.com", "P-1").await;

    let (status, json) = send(
        &app,
        "PATCH",
        "/cart",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1" }],
            "modifyType": "decrease"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["message"], "Cannot decrease quantity below 1");
}

#[tokio::test]
async fn test_mixed_batch_applies_valid_items() {
    let app = setup();
    register(&app, "alice@example.com").await;
    add_to_cart(&app, "alice@example.com", "P-1").await;

    let (status, json) = send(
        &app,
        "PATCH",
        "/cart",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1" }, { "productId": "P-404" }],
            "modifyType": "increase"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Only the failed item appears in the envelope.
    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["productId"], "P-404");
    assert_eq!(errors[0]["status"], 404);
    assert_eq!(errors[0]["message"], "Product not found in cart");

    // The valid item in the same batch was still applied.
    let (_, json) = send(&app, "GET", "/cart/alice@example.com", None).await;
    assert_eq!(json["cart"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_single_item_body_normalizes_to_batch() {
    let app = setup();
    register(&app, "alice@example.com").await;
    add_to_cart(&app, "alice@example.com", "P-1").await;

    // `data` as a bare object instead of an array.
    let (status, json) = send(
        &app,
        "PATCH",
        "/cart",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": { "productId": "P-1" },
            "modifyType": "delete"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "All cart items updated successfully");

    let (_, json) = send(&app, "GET", "/cart/alice@example.com", None).await;
    assert_eq!(json["cart"][0]["status"], "deleted");
    assert_eq!(json["cart"][0]["quantity"], 0);
}

#[tokio::test]
async fn test_invalid_modify_type_fails_every_item() {
    let app = setup();
    register(&app, "alice@example.com").await;
    add_to_cart(&app, "alice@example.com", "P-1").await;

    let (status, json) = send(
        &app,
        "PATCH",
        "/cart",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1" }, { "productId": "P-2" }],
            "modifyType": "explode"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    for error in errors {
        assert_eq!(error["status"], 400);
        assert_eq!(error["message"], "Invalid modifyType");
    }
}

#[tokio::test]
async fn test_modify_cart_unknown_user_is_404() {
    let app = setup();
    let (status, _) = send(
        &app,
        "PATCH",
        "/cart",
        Some(serde_json::json!({
            "email": "ghost@example.com",
            "data": [{ "productId": "P-1" }],
            "modifyType": "increase"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_place_order_appends_placement_notification() {
    let app = setup();
    register(&app, "alice@example.com").await;

    let (status, json) = send(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{
                "productId": "P-1",
                "title": "Product P-1",
                "price": 1500,
                "quantity": 2
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "All products processed successfully");

    let (_, json) = send(&app, "GET", "/orders/alice@example.com", None).await;
    let orders = json["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], "pending");
    assert_eq!(orders[0]["quantity"], 2);
    assert_eq!(orders[0]["isCancelled"], false);

    let (_, json) = send(&app, "GET", "/notifications/alice@example.com", None).await;
    let notifications = json["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0]["details"]
        .as_str()
        .unwrap()
        .starts_with("We have received your order"));
    assert_eq!(notifications[0]["isRead"], false);
}

#[tokio::test]
async fn test_cancel_order_by_exact_key() {
    let app = setup();
    register(&app, "alice@example.com").await;
    send(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1", "title": "Product P-1", "price": 1500, "quantity": 1 }]
        })),
    )
    .await;

    let (_, json) = send(&app, "GET", "/orders/alice@example.com", None).await;
    let order_time = json["orders"][0]["orderTime"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        "PATCH",
        "/orders",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1", "orderTime": order_time }],
            "modifyType": "cancel"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "All orders updated successfully");

    let (_, json) = send(&app, "GET", "/orders/alice@example.com", None).await;
    assert_eq!(json["orders"][0]["status"], "cancelled");
    assert_eq!(json["orders"][0]["isCancelled"], true);

    // Placement + cancellation notifications.
    let (_, json) = send(&app, "GET", "/notifications/alice@example.com", None).await;
    let notifications = json["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 2);
}

#[tokio::test]
async fn test_order_with_wrong_time_is_not_found() {
    let app = setup();
    register(&app, "alice@example.com").await;
    send(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1", "title": "Product P-1", "price": 1500, "quantity": 1 }]
        })),
    )
    .await;

    let (status, json) = send(
        &app,
        "PATCH",
        "/orders",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1", "orderTime": "2020-01-01T00:00:00Z" }],
            "modifyType": "shipped"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["status"], 404);
    assert_eq!(json["errors"][0]["message"], "Product not found in order list");

    let (_, json) = send(&app, "GET", "/orders/alice@example.com", None).await;
    assert_eq!(json["orders"][0]["status"], "pending");
}

#[tokio::test]
async fn test_notifications_sorted_newest_first() {
    let (app, store) = setup_with_store();
    register(&app, "alice@example.com").await;

    let key = UserKey::new("alice@example.com");
    let t1 = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let t2 = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
    let t3 = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    // Insert scrambled: T2, T3, T1.
    for (details, created_at) in [("second", t2), ("third", t3), ("first", t1)] {
        store
            .push_elements(
                &key,
                vec![doc_store::ArrayPush::Notification(NotificationEntry::new(
                    details, created_at,
                ))],
            )
            .await
            .unwrap();
    }

    let (status, json) = send(&app, "GET", "/notifications/alice@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    let details: Vec<_> = json["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["details"].as_str().unwrap())
        .collect();
    assert_eq!(details, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_mark_notification_read() {
    let app = setup();
    register(&app, "alice@example.com").await;
    send(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": [{ "productId": "P-1", "title": "Product P-1", "price": 1500, "quantity": 1 }]
        })),
    )
    .await;

    let (_, json) = send(&app, "GET", "/notifications/alice@example.com", None).await;
    let id = json["notifications"][0]["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        "PATCH",
        "/notifications",
        Some(serde_json::json!({ "email": "alice@example.com", "id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Notification marked as read");

    let (_, json) = send(&app, "GET", "/notifications/alice@example.com", None).await;
    assert_eq!(json["notifications"][0]["isRead"], true);

    // Unknown ids are 404.
    let (status, _) = send(
        &app,
        "PATCH",
        "/notifications",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "id": uuid::Uuid::new_v4().to_string()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ratings_roundtrip() {
    let app = setup();
    register(&app, "alice@example.com").await;

    let (status, json) = send(
        &app,
        "POST",
        "/ratings",
        Some(serde_json::json!({
            "email": "alice@example.com",
            "data": widget("P-1"),
            "rating": 4.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Ratings added successfully");

    let (status, json) = send(&app, "GET", "/ratings/alice@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    let ratings = json["ratings"].as_array().unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["rating"], 4.5);
    assert_eq!(ratings[0]["productId"], "P-1");

    // Unknown users cannot rate.
    let (status, _) = send(
        &app,
        "POST",
        "/ratings",
        Some(serde_json::json!({
            "email": "ghost@example.com",
            "data": widget("P-1"),
            "rating": 5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let app = setup();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
