pub mod auth;
pub mod health;
pub mod items;
pub mod loans;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post, put},
};
use serde_json::{Value, json};

use crate::domain::DomainError;
use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_me))
        // Items
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/summary", get(items::inventory_summary))
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::submit_loan))
        .route("/loans/active", get(loans::list_active_loans))
        .route("/loans/:id/return", put(loans::return_loan))
        .with_state(state)
}

/// Map a domain error onto the HTTP surface. Conflict bodies carry the
/// human-readable reason ("item no longer available", "loan already
/// returned") so the presentation layer can show it as-is.
pub fn error_response(err: DomainError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        DomainError::Validation(_) | DomainError::InvalidTransition(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::DuplicateCode(_) | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::PermissionDenied => StatusCode::FORBIDDEN,
        DomainError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("internal error: {}", err);
    }

    (status, Json(json!({ "error": err.to_string() })))
}
