use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppConfig;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok", or "degraded" when no Sheets API key is configured)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether a Sheets API key was provided
    pub sheets_configured: bool,
}

/// Health check endpoint.
///
/// Returns the API status and version. Does not call the upstream sheet;
/// a missing API key reports "degraded" (still 200) because every dashboard
/// request would come back empty.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(config): State<AppConfig>) -> Json<HealthResponse> {
    let configured = config.has_api_key();

    Json(HealthResponse {
        status: if configured {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        sheets_configured: configured,
    })
}
