//! Routes for standalone order-line operations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};

use orderflow_core::domain::{NewOrderLine, OrderLine};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate;

/// Query parameter naming the owning order on line creation.
#[derive(Debug, Deserialize)]
struct OwningOrder {
    #[serde(rename = "orderId")]
    order_id: i64,
}

/// POST /api/order-items?orderId={id}
#[instrument(skip(state, body), fields(order_id = owner.order_id))]
async fn create_line(
    State(state): State<AppState>,
    Query(owner): Query<OwningOrder>,
    Json(body): Json<NewOrderLine>,
) -> Result<impl IntoResponse, ApiError> {
    validate::validate_line(body)?;
    let line = state.lines.create(owner.order_id, body).await?;
    info!(line_id = line.id, "order line created");
    Ok((StatusCode::CREATED, Json(line)))
}

/// GET /api/order-items/{id}
async fn get_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderLine>, ApiError> {
    Ok(Json(state.lines.get(id).await?))
}

/// GET /api/order-items/order/{orderId}
async fn list_lines_by_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<Vec<OrderLine>>, ApiError> {
    Ok(Json(state.lines.list_by_order(order_id).await?))
}

/// PUT /api/order-items/{id}
#[instrument(skip(state, body))]
async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewOrderLine>,
) -> Result<Json<OrderLine>, ApiError> {
    validate::validate_line(body)?;
    let line = state.lines.update(id, body).await?;
    info!(line_id = id, "order line updated");
    Ok(Json(line))
}

/// DELETE /api/order-items/{id}
#[instrument(skip(state))]
async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.lines.delete(id).await?;
    info!(line_id = id, "order line deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for order-line endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_line))
        .route("/order/{order_id}", get(list_lines_by_order))
        .route("/{id}", get(get_line))
        .route("/{id}", put(update_line))
        .route("/{id}", delete(delete_line))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use orderflow_core::domain::{NewItem, NewOrder, OrderStatus};
    use orderflow_core::repository::OrderRepository;
    use orderflow_orders::lines::LineService;
    use orderflow_orders::service::OrderService;
    use orderflow_test_support::{
        InMemoryItems, InMemoryOrders, RecordingPublisher, StaticUserDirectory,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    struct Fixture {
        items: Arc<InMemoryItems>,
        orders: Arc<InMemoryOrders>,
        app: Router,
    }

    fn fixture() -> Fixture {
        let items = Arc::new(InMemoryItems::new());
        let orders = Arc::new(InMemoryOrders::new());
        let users = Arc::new(StaticUserDirectory::with_users(&[1]));
        let service = Arc::new(OrderService::new(
            orders.clone(),
            items.clone(),
            users,
            Arc::new(RecordingPublisher::new()),
        ));
        let lines = Arc::new(LineService::new(
            orders.clone(),
            orders.clone(),
            items.clone(),
        ));
        let app = router().with_state(AppState::new(items.clone(), service, lines));
        Fixture { items, orders, app }
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(json) => Body::from(serde_json::to_vec(&json).unwrap()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn seed_order(fx: &Fixture) -> i64 {
        OrderRepository::insert(
            fx.orders.as_ref(),
            NewOrder {
                user_id: 1,
                creation_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                lines: vec![],
            },
            OrderStatus::Created,
        )
        .await
        .unwrap()
        .id
    }

    fn seed_item(fx: &Fixture) -> i64 {
        fx.items.seed(NewItem {
            name: "widget".into(),
            price: "1.00".parse().unwrap(),
        })
    }

    #[tokio::test]
    async fn test_create_line_round_trips_through_order_listing() {
        let fx = fixture();
        let order_id = seed_order(&fx).await;
        let item_id = seed_item(&fx);

        let (status, created) = send(
            fx.app.clone(),
            "POST",
            &format!("/?orderId={order_id}"),
            Some(serde_json::json!({ "item_id": item_id, "quantity": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["order_id"].as_i64().unwrap(), order_id);

        let (status, listed) =
            send(fx.app, "GET", &format!("/order/{order_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["quantity"], 2);
    }

    #[tokio::test]
    async fn test_create_line_for_missing_order_returns_404() {
        let fx = fixture();
        let item_id = seed_item(&fx);

        let (status, body) = send(
            fx.app,
            "POST",
            "/?orderId=404",
            Some(serde_json::json!({ "item_id": item_id, "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_create_line_rejects_zero_quantity() {
        let fx = fixture();
        let order_id = seed_order(&fx).await;
        let item_id = seed_item(&fx);

        let (status, body) = send(
            fx.app,
            "POST",
            &format!("/?orderId={order_id}"),
            Some(serde_json::json!({ "item_id": item_id, "quantity": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_update_line_requires_existing_item() {
        let fx = fixture();
        let order_id = seed_order(&fx).await;
        let item_id = seed_item(&fx);
        let (_, created) = send(
            fx.app.clone(),
            "POST",
            &format!("/?orderId={order_id}"),
            Some(serde_json::json!({ "item_id": item_id, "quantity": 1 })),
        )
        .await;
        let line_id = created["id"].as_i64().unwrap();

        let (status, _) = send(
            fx.app.clone(),
            "PUT",
            &format!("/{line_id}"),
            Some(serde_json::json!({ "item_id": 404, "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, updated) = send(
            fx.app,
            "PUT",
            &format!("/{line_id}"),
            Some(serde_json::json!({ "item_id": item_id, "quantity": 7 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["quantity"], 7);
    }

    #[tokio::test]
    async fn test_delete_line_then_get_returns_404() {
        let fx = fixture();
        let order_id = seed_order(&fx).await;
        let item_id = seed_item(&fx);
        let (_, created) = send(
            fx.app.clone(),
            "POST",
            &format!("/?orderId={order_id}"),
            Some(serde_json::json!({ "item_id": item_id, "quantity": 1 })),
        )
        .await;
        let line_id = created["id"].as_i64().unwrap();

        let (status, _) = send(fx.app.clone(), "DELETE", &format!("/{line_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(fx.app, "GET", &format!("/{line_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }
}
