//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use orderflow_api::routes;
use orderflow_api::state::AppState;
use orderflow_orders::lines::LineService;
use orderflow_orders::service::OrderService;
use orderflow_test_support::{
    InMemoryItems, InMemoryOrders, RecordingPublisher, StaticUserDirectory,
};

/// A full application router plus handles to its collaborators, so tests
/// can seed state and assert on side effects.
pub struct TestApp {
    pub app: Router,
    pub items: Arc<InMemoryItems>,
    pub orders: Arc<InMemoryOrders>,
    pub users: Arc<StaticUserDirectory>,
    pub publisher: Arc<RecordingPublisher>,
    pub service: Arc<OrderService>,
}

/// Build the full app router over in-memory fakes, with user ids 1..=3
/// known to the user directory. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let items = Arc::new(InMemoryItems::new());
    let orders = Arc::new(InMemoryOrders::new());
    let users = Arc::new(StaticUserDirectory::with_users(&[1, 2, 3]));
    let publisher = Arc::new(RecordingPublisher::new());

    let service = Arc::new(OrderService::new(
        orders.clone(),
        items.clone(),
        users.clone(),
        publisher.clone(),
    ));
    let lines = Arc::new(LineService::new(
        orders.clone(),
        orders.clone(),
        items.clone(),
    ));
    let app_state = AppState::new(items.clone(), service.clone(), lines);

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/items", routes::items::router())
        .nest("/api/orders", routes::orders::router())
        .nest("/api/order-items", routes::order_lines::router())
        .with_state(app_state);

    TestApp {
        app,
        items,
        orders,
        users,
        publisher,
        service,
    }
}

async fn run(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    run(app, request).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    run(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    run(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    run(app, request).await
}
