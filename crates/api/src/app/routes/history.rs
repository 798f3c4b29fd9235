use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;

use barstock_core::RecordId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_records).delete(delete_history))
        .route("/snapshot", post(take_snapshot))
        .route("/analysis", post(run_analysis))
        .route("/:id/consumption", get(consumption))
}

pub async fn list_records(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.reconciliation.history().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn take_snapshot(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.reconciliation.take_snapshot(Utc::now()).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn run_analysis(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.reconciliation.run_analysis(Utc::now()).await {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "record": outcome.record,
                "resetItems": outcome.resets.len(),
                "archivedOrders": outcome.orders_to_archive.len(),
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn consumption(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: RecordId = match errors::parse_id(&id, "record") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.reconciliation.consumption_report(id).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// `DELETE /history?confirm=true`. Anything else is refused.
pub async fn delete_history(
    Extension(services): Extension<Arc<AppServices>>,
    q: Result<Query<dto::DeleteHistoryQuery>, QueryRejection>,
) -> Response {
    let q = match errors::query(q) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.reconciliation.delete_history(q.confirm).await {
        Ok(removed) => Json(serde_json::json!({ "removed": removed })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
