//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service name.
    pub service: &'static str,
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Database reachability.
    pub database: &'static str,
}

/// Health check handler.
///
/// Reports degraded rather than failing the request when the
/// database does not answer a ping.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, database) = match state.db.ping().await {
        Ok(()) => ("healthy", "reachable"),
        Err(_) => ("degraded", "unreachable"),
    };

    Json(HealthResponse {
        service: "mikopo",
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_shape() {
        let resp = HealthResponse {
            service: "mikopo",
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            database: "reachable",
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["service"], "mikopo");
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["database"], "reachable");
        assert!(!value["version"].as_str().unwrap().is_empty());
    }
}
