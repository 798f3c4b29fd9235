use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};

use barstock_core::ItemId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(save_item))
        .route("/items/:id", delete(delete_item))
        .route("/items/:id/stock", put(set_stock))
        .route("/reset", post(reset_all))
}

pub async fn list_items(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.inventory.list().await {
        Ok(items) => Json(items).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn save_item(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::SaveItemRequest>, JsonRejection>,
) -> Response {
    let body = match errors::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let status = if body.id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    match services.inventory.save(body.into_item()).await {
        Ok(item) => (status, Json(item)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn set_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<dto::SetStockRequest>, JsonRejection>,
) -> Response {
    let id: ItemId = match errors::parse_id(&id, "item") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let body = match errors::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services
        .inventory
        .set_stock(id, &body.location, body.quantity)
        .await
    {
        Ok(item) => Json(item).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ItemId = match errors::parse_id(&id, "item") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn reset_all(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.inventory.reset_all().await {
        Ok(items) => Json(items).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
