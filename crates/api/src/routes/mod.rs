//! API route definitions.

use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse, response::Response};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use mikopo_core::workflow::WorkflowError;

pub mod auth;
pub mod health;
pub mod loans;
pub mod workflow;

/// Maps a workflow error to its HTTP error body.
pub(crate) fn workflow_error_response(e: &WorkflowError) -> Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": e.to_string()
        })),
    )
        .into_response()
}

/// Creates the API router with all routes.
///
/// Loan and workflow routes require a valid bearer token; health and
/// login are public.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(loans::routes())
        .merge(workflow::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
