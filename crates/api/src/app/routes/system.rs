use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use barstock_core::RegistryKey;

use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Known locations and income sources, for building input forms.
pub async fn settings(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let locations = services.inventory.locations();
    Json(serde_json::json!({
        "locations": locations.keys().map(|k| k.as_str()).collect::<Vec<_>>(),
        "primaryLocation": locations.primary().map(|k| k.as_str()),
        "incomeSources": services.register.sources().keys().map(|k| k.as_str()).collect::<Vec<_>>(),
    }))
}
