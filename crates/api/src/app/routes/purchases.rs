use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::Utc;

use barstock_core::OrderId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", delete(delete_order))
        .route("/orders/:id/complete", post(complete_order))
        .route("/orders/:id/cancel", post(cancel_order))
}

pub async fn list_orders(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.purchasing.list().await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::CreateOrderRequest>, JsonRejection>,
) -> Response {
    let body = match errors::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services
        .purchasing
        .create(body.into_new_order(Utc::now()))
        .await
    {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Body is optional; the delivery date defaults to now. A body that is
/// present but malformed is refused before the order is touched.
pub async fn complete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    raw: Bytes,
) -> Response {
    let id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let body: Option<dto::CompleteOrderRequest> = match errors::optional_body(&raw) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let delivered_at = body
        .and_then(|b| b.delivery_date)
        .unwrap_or_else(Utc::now);

    match services.purchasing.complete(id, delivered_at).await {
        Ok(order) => Json(order).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn cancel_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.purchasing.cancel(id).await {
        Ok(order) => Json(order).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.purchasing.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
