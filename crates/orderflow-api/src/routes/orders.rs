//! Routes for orders.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::{info, instrument};

use orderflow_core::domain::NewOrder;
use orderflow_orders::view::OrderWithUser;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate;

/// POST /api/orders
#[instrument(skip(state, body), fields(user_id = body.user_id))]
async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<NewOrder>,
) -> Result<impl IntoResponse, ApiError> {
    validate::validate_order(&body)?;
    let view = state.orders.create(body).await?;
    info!(order_id = view.order.id, "order created");
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/orders/{id}
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderWithUser>, ApiError> {
    Ok(Json(state.orders.get(id).await?))
}

/// GET /api/orders
async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderWithUser>>, ApiError> {
    Ok(Json(state.orders.list().await?))
}

/// GET /api/orders/statuses?statuses=CREATED&statuses=PAID
///
/// The filter is a repeated query parameter; an empty filter is a
/// validation error.
async fn list_orders_by_statuses(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<OrderWithUser>>, ApiError> {
    let statuses: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == "statuses")
        .map(|(_, value)| value)
        .collect();
    validate::validate_statuses(&statuses)?;
    Ok(Json(state.orders.list_by_statuses(&statuses).await?))
}

/// PUT /api/orders/{id}
#[instrument(skip(state, body))]
async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewOrder>,
) -> Result<Json<OrderWithUser>, ApiError> {
    validate::validate_order(&body)?;
    let view = state.orders.update(id, body).await?;
    info!(order_id = id, "order updated");
    Ok(Json(view))
}

/// DELETE /api/orders/{id}
#[instrument(skip(state))]
async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete(id).await?;
    info!(order_id = id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for order endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/", get(list_orders))
        .route("/statuses", get(list_orders_by_statuses))
        .route("/{id}", get(get_order))
        .route("/{id}", put(update_order))
        .route("/{id}", delete(delete_order))
}
