/*!
 * # Health Check Module
 *
 * - Basic health check (`/health`) reports service status and database reachability
 * - Version check (`/health/version`) reports build information
 */

use crate::{db, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

/// Component health
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub database: HealthStatus,
    pub version: String,
}

impl HealthReport {
    fn from_database(database: HealthStatus) -> Self {
        Self {
            // The service cannot answer traces without the database.
            status: database,
            database,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Up => StatusCode::OK,
            HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Basic health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthReport),
        (status = 503, description = "Database unreachable", body = HealthReport)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Health check endpoint called");

    let database = match db::check_connection(&state.db).await {
        Ok(()) => HealthStatus::Up,
        Err(_) => HealthStatus::Down,
    };
    let report = HealthReport::from_database(database);

    (report.status_code(), Json(report))
}

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
    }))
}

/// Health routes, nested under `/health`.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/version", get(version_info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_down_makes_service_unavailable() {
        let report = HealthReport::from_database(HealthStatus::Down);
        assert_eq!(report.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let body = serde_json::to_value(&report).unwrap();
        assert_eq!(body["status"], "down");
        assert_eq!(body["database"], "down");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn database_up_is_ok() {
        let report = HealthReport::from_database(HealthStatus::Up);
        assert_eq!(report.status_code(), StatusCode::OK);
    }
}
