//! Dashboard HTTP endpoint.
//!
//! - GET /api/v1/dashboard?source=NAME&date=DD-MM-YYYY&sidebar_open=BOOL

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::services::dashboard::{render, ChartRequest, Selection, ViewState, ViewStateKind};
use crate::services::presentation::DashboardView;
use crate::services::sheets::SheetsClient;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// Reservoir sheet name; when absent nothing is fetched
    pub source: Option<String>,
    /// Date in DD-MM-YYYY form (defaults to 01-01-2011)
    pub date: Option<String>,
    /// Layout flag forwarded to the chart renderer
    #[serde(default)]
    pub sidebar_open: bool,
}

impl From<DashboardQuery> for Selection {
    fn from(q: DashboardQuery) -> Self {
        Selection {
            source_id: q.source,
            date: q.date,
            sidebar_open: q.sidebar_open,
        }
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Dashboard state for one selection.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// "loading", "no_source_selected", "empty_result" or "populated"
    pub state: ViewStateKind,
    /// Message to show instead of the cards. Null when populated.
    pub message: Option<String>,
    /// Selected source, if any
    pub source: Option<String>,
    /// Requested date after defaulting (DD-MM-YYYY)
    pub date: String,
    /// Cards. Null unless `state` is "populated".
    pub dashboard: Option<DashboardView>,
    /// Chart hand-off. Null when no source is selected.
    pub chart: Option<ChartRequest>,
    /// When this response was produced (ISO 8601)
    pub rendered_at: String,
}

impl DashboardResponse {
    pub fn new(selection: &Selection, state: &ViewState) -> Self {
        Self {
            state: state.kind(),
            message: state.message().map(str::to_string),
            source: selection.source().map(str::to_string),
            date: selection.effective_date().to_string(),
            dashboard: state.view().cloned(),
            chart: ChartRequest::for_selection(selection),
            rendered_at: Utc::now().to_rfc3339(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Render the dashboard for a reservoir and date.
///
/// Fetches the reservoir sheet, finds the row for the requested date and
/// returns the status cards. Upstream failures, missing columns and unknown
/// dates all produce the same "empty_result" state.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard state for the selection", body = DashboardResponse),
        (status = 400, description = "Malformed query string"),
    )
)]
pub async fn get_dashboard(
    State(client): State<SheetsClient>,
    Query(params): Query<DashboardQuery>,
) -> Json<DashboardResponse> {
    let selection = Selection::from(params);
    let state = render(&client, &selection).await;
    Json(DashboardResponse::new(&selection, &state))
}
