/// Spreadsheet holding one tab (named range) per reservoir.
pub const DEFAULT_SPREADSHEET_ID: &str = "1x8WkZ5NJk9BgOsQIz1R4jShRC7hd3KcwE-NK9C45RdM";

/// Google Sheets v4 values endpoint root.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Application configuration, parsed from environment variables.
///
/// Built once at startup and handed to the components that need it; nothing
/// reads the environment after that.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sheets_api_key: String,
    pub spreadsheet_id: String,
    pub sheets_base_url: String,
    pub port: u16,
    /// Emit JSON log lines instead of plain text.
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            sheets_api_key: std::env::var("SHEETS_API_KEY").expect("SHEETS_API_KEY must be set"),
            spreadsheet_id: std::env::var("SPREADSHEET_ID")
                .unwrap_or_else(|_| DEFAULT_SPREADSHEET_ID.to_string()),
            sheets_base_url: std::env::var("SHEETS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SHEETS_BASE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            log_json: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Whether an API key was provided at all. An empty key still starts the
    /// service, but every upstream call will be rejected.
    pub fn has_api_key(&self) -> bool {
        !self.sheets_api_key.trim().is_empty()
    }
}
