//! Shared session HTTP endpoints.
//!
//! - GET /api/v1/session — what the shared dashboard currently shows
//! - PUT /api/v1/session/selection — change the selection; the fetch runs in
//!   the background and only the newest selection's result is kept

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::dashboard::DashboardResponse;
use crate::services::dashboard::Selection;
use crate::services::session::SharedSession;

/// Current session state.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Token of the selection being shown (0 before any selection)
    pub token: u64,
    pub dashboard: DashboardResponse,
}

/// Acknowledgement of a new selection.
#[derive(Debug, Serialize, ToSchema)]
pub struct SelectionAccepted {
    /// Token issued for this selection; poll the session until it shows this token settled
    pub token: u64,
}

/// Get the shared dashboard session.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    tag = "Session",
    responses(
        (status = 200, description = "Current session state", body = SessionResponse),
    )
)]
pub async fn get_session(State(session): State<SharedSession>) -> Json<SessionResponse> {
    let snap = session.snapshot().await;
    Json(SessionResponse {
        token: snap.token,
        dashboard: DashboardResponse::new(&snap.selection, &snap.state),
    })
}

/// Change the session's selection.
///
/// Returns immediately with the issued token; the session shows "loading"
/// until the fetch settles. A result for an older token is discarded.
#[utoipa::path(
    put,
    path = "/api/v1/session/selection",
    tag = "Session",
    request_body = Selection,
    responses(
        (status = 202, description = "Selection accepted", body = SelectionAccepted),
    )
)]
pub async fn put_selection(
    State(session): State<SharedSession>,
    Json(selection): Json<Selection>,
) -> (StatusCode, Json<SelectionAccepted>) {
    let token = session.begin(selection.clone()).await;

    let background = session.clone();
    tokio::spawn(async move {
        background.settle(token, &selection).await;
    });

    (StatusCode::ACCEPTED, Json(SelectionAccepted { token }))
}
