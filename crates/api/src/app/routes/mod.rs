use axum::{Router, routing::get};

pub mod history;
pub mod inventory;
pub mod purchases;
pub mod register;
pub mod system;

/// Router for every domain endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/settings", get(system::settings))
        .nest("/inventory", inventory::router())
        .nest("/purchases", purchases::router())
        .nest("/history", history::router())
        .nest("/register", register::router())
}
