//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::auth::auth_middleware};
use defter_core::ledger::LedgerError;

pub mod accounts;
pub mod entries;
pub mod health;
pub mod products;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(accounts::routes())
        .merge(entries::routes())
        .merge(products::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Maps a ledger error to its JSON response.
///
/// Status and code come from the error taxonomy; 500s additionally log the
/// underlying cause and hide it from the caller.
pub(crate) fn ledger_error_response(e: &LedgerError) -> Response {
    let status = StatusCode::from_u16(e.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %e, "ledger operation failed");
        return (
            status,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response();
    }

    (
        status,
        Json(json!({
            "error": e.error_code().to_ascii_lowercase(),
            "message": e.to_string()
        })),
    )
        .into_response()
}
