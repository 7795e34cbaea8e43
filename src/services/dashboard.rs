//! Dashboard view states.
//!
//! `Loading` → one of `NoSourceSelected`, `EmptyResult`, `Populated`. The only
//! inputs are the selected source and date; there is no refresh action.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::presentation::DashboardView;
use crate::services::resolver::{fetch_and_resolve, target_date_or_default, Resolution};
use crate::services::schema::ReservoirRecord;
use crate::services::sheets::SheetsClient;

pub const MSG_LOADING: &str = "Loading";
pub const MSG_NO_SOURCE: &str = "No dam selected";
pub const MSG_NO_DATA: &str = "No data available for the selected date.";

/// What the user picked: a reservoir sheet and a `DD-MM-YYYY` date.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct Selection {
    /// Sheet (named range) to read; nothing is fetched when absent
    pub source_id: Option<String>,
    /// Date in DD-MM-YYYY form; defaults to 01-01-2011
    pub date: Option<String>,
    /// Layout flag passed through to the chart
    #[serde(default)]
    pub sidebar_open: bool,
}

impl Selection {
    /// The source id, with blank ids treated as "no source".
    pub fn source(&self) -> Option<&str> {
        self.source_id.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn effective_date(&self) -> &str {
        target_date_or_default(self.date.as_deref())
    }
}

/// Hand-off to the chart renderer: the same selection plus the layout flag.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartRequest {
    pub source_id: String,
    pub date: String,
    pub sidebar_open: bool,
}

impl ChartRequest {
    pub fn for_selection(selection: &Selection) -> Option<Self> {
        Some(Self {
            source_id: selection.source()?.to_string(),
            date: selection.effective_date().to_string(),
            sidebar_open: selection.sidebar_open,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewStateKind {
    Loading,
    NoSourceSelected,
    EmptyResult,
    Populated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    NoSourceSelected,
    EmptyResult,
    Populated(Box<DashboardView>),
}

impl ViewState {
    pub fn kind(&self) -> ViewStateKind {
        match self {
            ViewState::Loading => ViewStateKind::Loading,
            ViewState::NoSourceSelected => ViewStateKind::NoSourceSelected,
            ViewState::EmptyResult => ViewStateKind::EmptyResult,
            ViewState::Populated(_) => ViewStateKind::Populated,
        }
    }

    /// User-facing message; `None` when the cards are shown.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ViewState::Loading => Some(MSG_LOADING),
            ViewState::NoSourceSelected => Some(MSG_NO_SOURCE),
            ViewState::EmptyResult => Some(MSG_NO_DATA),
            ViewState::Populated(_) => None,
        }
    }

    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            ViewState::Populated(view) => Some(view.as_ref()),
            _ => None,
        }
    }

    /// Map a resolution onto the view for `source_id`. Every empty reason
    /// looks the same to the user.
    pub fn from_resolution(source_id: &str, resolution: Resolution) -> Self {
        match resolution {
            Resolution::Empty { reason, .. } => {
                tracing::debug!("Empty dashboard for '{}': {:?}", source_id, reason);
                ViewState::EmptyResult
            }
            Resolution::Matched {
                row,
                average_rainfall,
                layout_issues,
            } => {
                let record = ReservoirRecord::from_row(&row);
                ViewState::Populated(Box::new(DashboardView::build(
                    source_id,
                    &record,
                    average_rainfall,
                    layout_issues,
                )))
            }
        }
    }
}

/// Run one selection to its settled state.
pub async fn render(client: &SheetsClient, selection: &Selection) -> ViewState {
    let Some(source_id) = selection.source() else {
        return ViewState::NoSourceSelected;
    };

    let resolution = fetch_and_resolve(client, source_id, Some(selection.effective_date())).await;
    tracing::debug!(
        "Resolved '{}' for {}: average rainfall {:?}",
        source_id,
        selection.effective_date(),
        resolution.average_rainfall()
    );
    ViewState::from_resolution(source_id, resolution)
}
