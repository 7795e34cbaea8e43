//! Google Sheets values API client.
//!
//! Reads one named range (a sheet tab per reservoir) as a 2-D table of cell
//! strings. See: https://developers.google.com/sheets/api/reference/rest/v4/spreadsheets.values/get

use reqwest::Url;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Client for the spreadsheet values endpoint.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    api_key: String,
}

// --- Sheets JSON response types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[allow(dead_code)] // Echoed back by the API; useful when debugging responses
    range: Option<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Coerce a JSON cell into its display string.
fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SheetsClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: config.sheets_base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            api_key: config.sheets_api_key.clone(),
        }
    }

    /// Build the values URL for a range. The range is pushed as a single
    /// path segment so sheet names with spaces or slashes stay intact.
    fn values_url(&self, range: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::InternalError(format!("Invalid Sheets base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::InternalError(format!(
                    "Sheets base URL '{}' cannot take a path",
                    self.base_url
                ))
            })?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Fetch every row of `range`. Row 0 is the sheet's header row.
    ///
    /// An empty range yields an empty table (the API omits `values` then).
    pub async fn fetch_rows(&self, range: &str) -> Result<Vec<Vec<String>>, AppError> {
        let url = self.values_url(range)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Sheets request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Sheets returned HTTP {}",
                response.status()
            )));
        }

        let body: ValueRange = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Sheets JSON parse error: {}", e))
        })?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}
