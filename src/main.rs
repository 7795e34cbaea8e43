// Reservoir Dashboard API v0.1
use axum::{
    routing::{get, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod routes;
mod services;

use config::AppConfig;
use services::session::{DashboardSession, SharedSession};
use services::sheets::SheetsClient;

/// Reservoir Dashboard API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reservoir Dashboard API",
        version = "0.1.0",
        description = "Reservoir status dashboard backed by a public spreadsheet. \
            Reads one sheet per reservoir, finds the row for a requested date and \
            returns water level, storage, rainfall and 15/30-day water-supply risk \
            as color-coded status cards.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Dashboard", description = "One-shot dashboard rendering"),
        (name = "Session", description = "Shared dashboard session"),
    ),
    paths(
        routes::health::health_check,
        routes::dashboard::get_dashboard,
        routes::session::get_session,
        routes::session::put_selection,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::dashboard::DashboardResponse,
            routes::session::SessionResponse,
            routes::session::SelectionAccepted,
            services::dashboard::Selection,
            services::dashboard::ViewStateKind,
            services::dashboard::ChartRequest,
            services::presentation::DashboardView,
            services::presentation::RainfallCard,
            services::presentation::CurrentStatusCard,
            services::presentation::PredictionCard,
            services::presentation::RiskBadge,
            services::presentation::RiskLevel,
            services::presentation::RiskColor,
            services::schema::ReservoirField,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "reservoir_dashboard_api=debug,tower_http=debug".into());
    if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if !config.has_api_key() {
        tracing::warn!("SHEETS_API_KEY is empty; every dashboard request will come back empty");
    }
    tracing::info!("Reading spreadsheet {}", config.spreadsheet_id);

    // Create Sheets client and the shared session
    let sheets_client = SheetsClient::new(&config);
    let session: SharedSession = Arc::new(DashboardSession::new(sheets_client.clone()));

    // CORS — GET for reads, PUT for changing the shared selection
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::PUT])
        .allow_headers(Any);

    // Build router
    let health_routes = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .with_state(config.clone());

    let dashboard_routes = Router::new()
        .route("/api/v1/dashboard", get(routes::dashboard::get_dashboard))
        .with_state(sheets_client);

    let session_routes = Router::new()
        .route("/api/v1/session", get(routes::session::get_session))
        .route(
            "/api/v1/session/selection",
            put(routes::session::put_selection),
        )
        .with_state(session);

    let app = Router::new()
        .merge(health_routes)
        .merge(dashboard_routes)
        .merge(session_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
