use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};

use barstock_core::SessionId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/sessions", get(list_sessions).post(save_session))
        .route("/sessions/:id", delete(delete_session))
        .route("/summary", get(summary))
}

pub async fn list_sessions(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.register.list().await {
        Ok(sessions) => Json(sessions).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn save_session(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::SaveSessionRequest>, JsonRejection>,
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

    match services.register.save(body.into_session()).await {
        Ok(session) => (status, Json(session)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_session(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: SessionId = match errors::parse_id(&id, "session") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.register.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    q: Result<Query<dto::SummaryQuery>, QueryRejection>,
) -> Response {
    let q = match errors::query(q) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.register.summary(q.from, q.to).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
