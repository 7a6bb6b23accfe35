//! Routes for catalog items.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::{info, instrument};

use orderflow_core::domain::{Item, NewItem};
use orderflow_core::error::DomainError;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate;

/// POST /api/items
#[instrument(skip(state, body), fields(name = %body.name))]
async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<NewItem>,
) -> Result<impl IntoResponse, ApiError> {
    validate::validate_item(&body)?;
    let item = state.items.insert(body).await?;
    info!(item_id = item.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/items/{id}
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, ApiError> {
    let item = state
        .items
        .find(id)
        .await?
        .ok_or_else(|| DomainError::not_found("item", id))?;
    Ok(Json(item))
}

/// GET /api/items
async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.items.list().await?))
}

/// PUT /api/items/{id}
#[instrument(skip(state, body))]
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewItem>,
) -> Result<Json<Item>, ApiError> {
    validate::validate_item(&body)?;
    let item = state
        .items
        .update(id, body)
        .await?
        .ok_or_else(|| DomainError::not_found("item", id))?;
    info!(item_id = id, "item updated");
    Ok(Json(item))
}

/// DELETE /api/items/{id}
#[instrument(skip(state))]
async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.items.delete(id).await? {
        return Err(DomainError::not_found("item", id).into());
    }
    info!(item_id = id, "item deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for item endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item))
        .route("/", get(list_items))
        .route("/{id}", get(get_item))
        .route("/{id}", put(update_item))
        .route("/{id}", delete(delete_item))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use orderflow_orders::lines::LineService;
    use orderflow_orders::service::OrderService;
    use orderflow_test_support::{
        InMemoryItems, InMemoryOrders, RecordingPublisher, StaticUserDirectory,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let items = Arc::new(InMemoryItems::new());
        let orders = Arc::new(InMemoryOrders::new());
        let users = Arc::new(StaticUserDirectory::with_users(&[1]));
        let publisher = Arc::new(RecordingPublisher::new());
        let service = Arc::new(OrderService::new(
            orders.clone(),
            items.clone(),
            users,
            publisher,
        ));
        let lines = Arc::new(LineService::new(orders.clone(), orders, items.clone()));
        AppState::new(items, service, lines)
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

    fn app() -> Router {
        router().with_state(test_state())
    }

    #[tokio::test]
    async fn test_create_item_round_trips_name_and_price() {
        let app = app();
        let body = serde_json::json!({ "name": "widget", "price": "19.99" });

        let (status, created) = send(app.clone(), "POST", "/", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, fetched) = send(app, "GET", &format!("/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "widget");
        assert_eq!(fetched["price"], "19.99");
    }

    #[tokio::test]
    async fn test_create_item_rejects_blank_name_and_zero_price() {
        let app = app();

        let (status, body) = send(
            app.clone(),
            "POST",
            "/",
            Some(serde_json::json!({ "name": " ", "price": "1.00" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");

        let (status, _) = send(
            app,
            "POST",
            "/",
            Some(serde_json::json!({ "name": "widget", "price": "0" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_item_returns_404() {
        let (status, body) = send(app(), "GET", "/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_update_replaces_name_and_price() {
        let app = app();
        let (_, created) = send(
            app.clone(),
            "POST",
            "/",
            Some(serde_json::json!({ "name": "widget", "price": "1.00" })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send(
            app,
            "PUT",
            &format!("/{id}"),
            Some(serde_json::json!({ "name": "gadget", "price": "2.50" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "gadget");
        assert_eq!(updated["price"], "2.50");
    }

    #[tokio::test]
    async fn test_delete_twice_returns_404_on_second_call() {
        let app = app();
        let (_, created) = send(
            app.clone(),
            "POST",
            "/",
            Some(serde_json::json!({ "name": "widget", "price": "1.00" })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, _) = send(app.clone(), "DELETE", &format!("/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(app, "DELETE", &format!("/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }
}
