//! Row resolution for one `(source, date)` selection.
//!
//! Steps, in order:
//! 1. Fetch the sheet for the source.
//! 2. Empty sheet → empty result.
//! 3. Resolve the `Date` and `Cumulative_Rainfall_Inside` columns; either
//!    missing → empty result.
//! 4. Find the first row whose date matches the requested date.
//! 5. Average the rainfall column over every data row, match or not.
//!
//! Every failure folds into [`Resolution::Empty`]. The reason is logged and
//! kept for callers but never changes what the user sees.

use rust_decimal::Decimal;

use crate::services::schema::{check_layout, ReservoirField};
use crate::services::sheets::SheetsClient;
use crate::services::table::{average_rainfall, find_record, ColumnIndex, Table};

/// Requested date used when none is given.
pub const DEFAULT_TARGET_DATE: &str = "01-01-2011";

/// Why a selection produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The sheet had no rows at all.
    EmptyTable,
    /// `Date` or `Cumulative_Rainfall_Inside` is not in the header.
    MissingColumns,
    /// The fetch itself failed.
    Transport,
    /// No data row carries the requested date.
    NoMatchingRow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Empty {
        reason: EmptyReason,
        /// Only computed when the columns resolved (i.e. for `NoMatchingRow`).
        average_rainfall: Option<Decimal>,
    },
    Matched {
        row: Vec<String>,
        average_rainfall: Option<Decimal>,
        /// Reservoir fields the sheet's header does not reach.
        layout_issues: Vec<ReservoirField>,
    },
}

impl Resolution {
    fn empty(reason: EmptyReason) -> Self {
        Resolution::Empty {
            reason,
            average_rainfall: None,
        }
    }

    pub fn average_rainfall(&self) -> Option<Decimal> {
        match self {
            Resolution::Empty {
                average_rainfall, ..
            }
            | Resolution::Matched {
                average_rainfall, ..
            } => *average_rainfall,
        }
    }
}

/// The requested date, or [`DEFAULT_TARGET_DATE`] when absent or empty.
pub fn target_date_or_default(date: Option<&str>) -> &str {
    match date {
        Some(d) if !d.trim().is_empty() => d,
        _ => DEFAULT_TARGET_DATE,
    }
}

/// Resolve a fetched sheet against a `DD-MM-YYYY` target date.
pub fn resolve(rows: Vec<Vec<String>>, target_date: &str) -> Resolution {
    let Some(table) = Table::from_rows(rows) else {
        tracing::warn!("Sheet returned no rows");
        return Resolution::empty(EmptyReason::EmptyTable);
    };

    let columns = ColumnIndex::resolve(&table.header);
    let Some((date_idx, rainfall_idx)) = columns.required() else {
        tracing::error!(
            "Required column(s) not found in sheet header: {}",
            columns.missing().join(", ")
        );
        return Resolution::empty(EmptyReason::MissingColumns);
    };

    let layout_issues = check_layout(&table.header);
    let average_rainfall = average_rainfall(&table, rainfall_idx);

    match find_record(&table, date_idx, target_date) {
        Some(row) => Resolution::Matched {
            row: row.to_vec(),
            average_rainfall,
            layout_issues,
        },
        None => {
            tracing::debug!("No row for date {}", target_date);
            Resolution::Empty {
                reason: EmptyReason::NoMatchingRow,
                average_rainfall,
            }
        }
    }
}

/// Fetch `source_id` and resolve it against `date` (defaulted when absent).
///
/// Never fails: transport errors are logged and become
/// `Empty { reason: Transport }`.
pub async fn fetch_and_resolve(
    client: &SheetsClient,
    source_id: &str,
    date: Option<&str>,
) -> Resolution {
    let target_date = target_date_or_default(date);

    match client.fetch_rows(source_id).await {
        Ok(rows) => resolve(rows, target_date),
        Err(e) => {
            tracing::error!("Error fetching sheet '{}': {}", source_id, e);
            Resolution::empty(EmptyReason::Transport)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::schema::tests::full_row;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Plain-text log output collected from a scoped subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
            let sink = self.clone();
            tracing_subscriber::fmt()
                .with_writer(move || sink.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .finish()
        }

        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn resolve_logged(rows: Vec<Vec<String>>, date: &str) -> (Resolution, String) {
        let logs = CapturedLogs::default();
        let res = tracing::subscriber::with_default(logs.subscriber(), || resolve(rows, date));
        (res, logs.contents())
    }

    fn full_layout_table() -> Vec<Vec<String>> {
        let mut header = full_row("Date");
        header[10] = "Cumulative_Rainfall_Inside".to_string();
        vec![header, full_row("03-02-2020")]
    }

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn scenario_table() -> Vec<Vec<String>> {
        rows(&[
            &["Date", "Cumulative_Rainfall_Inside"],
            &["01-01-2011", "10"],
            &["02-01-2011", "20"],
        ])
    }

    fn client_for(server: &MockServer) -> SheetsClient {
        SheetsClient::new(&AppConfig {
            sheets_api_key: "k".to_string(),
            spreadsheet_id: "doc".to_string(),
            sheets_base_url: server.uri(),
            port: 0,
            log_json: false,
        })
    }

    #[test]
    fn test_target_date_default() {
        assert_eq!(target_date_or_default(None), "01-01-2011");
        assert_eq!(target_date_or_default(Some("")), "01-01-2011");
        assert_eq!(target_date_or_default(Some("  ")), "01-01-2011");
        assert_eq!(target_date_or_default(Some("05-03-2021")), "05-03-2021");
    }

    #[test]
    fn test_scenario_match() {
        let res = resolve(scenario_table(), "01-01-2011");
        match res {
            Resolution::Matched {
                row,
                average_rainfall,
                ..
            } => {
                assert_eq!(row, vec!["01-01-2011", "10"]);
                assert_eq!(average_rainfall.unwrap().to_string(), "15.00");
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_scenario_no_match_still_averages() {
        let res = resolve(scenario_table(), "09-09-2099");
        assert!(matches!(
            res,
            Resolution::Empty {
                reason: EmptyReason::NoMatchingRow,
                ..
            }
        ));
        assert_eq!(res.average_rainfall().unwrap().to_string(), "15.00");
    }

    #[test]
    fn test_scenario_missing_rainfall_column() {
        let res = resolve(rows(&[&["Date", "X"]]), "01-01-2011");
        assert_eq!(
            res,
            Resolution::Empty {
                reason: EmptyReason::MissingColumns,
                average_rainfall: None,
            }
        );
    }

    #[test]
    fn test_missing_date_column() {
        let res = resolve(
            rows(&[&["Day", "Cumulative_Rainfall_Inside"], &["01-01-2011", "1"]]),
            "01-01-2011",
        );
        assert_eq!(res.average_rainfall(), None);
        assert!(matches!(
            res,
            Resolution::Empty {
                reason: EmptyReason::MissingColumns,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_table_any_date() {
        for date in ["01-01-2011", "09-09-2099", "garbage", ""] {
            assert_eq!(
                resolve(Vec::new(), date),
                Resolution::Empty {
                    reason: EmptyReason::EmptyTable,
                    average_rainfall: None,
                }
            );
        }
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let res = resolve(rows(&[&["Date", "Cumulative_Rainfall_Inside"]]), "01-01-2011");
        assert_eq!(
            res,
            Resolution::Empty {
                reason: EmptyReason::NoMatchingRow,
                average_rainfall: None,
            }
        );
    }

    #[test]
    fn test_malformed_date_does_not_match() {
        let res = resolve(scenario_table(), "2011");
        assert!(matches!(
            res,
            Resolution::Empty {
                reason: EmptyReason::NoMatchingRow,
                ..
            }
        ));
    }

    #[test]
    fn test_layout_issues_reported_on_match() {
        let res = resolve(scenario_table(), "02-01-2011");
        match res {
            Resolution::Matched { layout_issues, .. } => {
                assert_eq!(layout_issues.len(), ReservoirField::ALL.len());
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_full_layout_has_no_issues() {
        match resolve(full_layout_table(), "03-02-2020") {
            Resolution::Matched {
                layout_issues,
                average_rainfall,
                ..
            } => {
                assert!(layout_issues.is_empty());
                assert_eq!(average_rainfall.unwrap().to_string(), "812.35");
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_columns_logs_error() {
        let (res, logs) = resolve_logged(rows(&[&["Date", "X"]]), "01-01-2011");
        assert_eq!(res.average_rainfall(), None);
        assert!(logs.contains("ERROR"), "logs: {}", logs);
        assert!(logs.contains(
            "Required column(s) not found in sheet header: Cumulative_Rainfall_Inside"
        ));
    }

    #[test]
    fn test_empty_table_logs_warning() {
        let (_, logs) = resolve_logged(Vec::new(), "01-01-2011");
        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("Sheet returned no rows"));
        assert!(!logs.contains("ERROR"));
    }

    #[test]
    fn test_no_match_is_silent_above_debug() {
        let (res, logs) = resolve_logged(full_layout_table(), "09-09-2099");
        assert!(matches!(
            res,
            Resolution::Empty {
                reason: EmptyReason::NoMatchingRow,
                ..
            }
        ));
        assert!(logs.contains("No row for date 09-09-2099"), "logs: {}", logs);
        assert!(!logs.contains("WARN"));
        assert!(!logs.contains("ERROR"));
    }

    #[test]
    fn test_short_layout_logs_warning() {
        let (_, logs) = resolve_logged(scenario_table(), "01-01-2011");
        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("reservoir fields out of range: water_level, storage_volume"));
    }

    #[tokio::test]
    async fn test_transport_failure_logs_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let logs = CapturedLogs::default();
        let res = {
            let _guard = tracing::subscriber::set_default(logs.subscriber());
            fetch_and_resolve(&client_for(&server), "Mettur", None).await
        };
        assert_eq!(res.average_rainfall(), None);

        let logs = logs.contents();
        assert!(logs.contains("ERROR"), "logs: {}", logs);
        assert!(logs.contains("Error fetching sheet 'Mettur'"));
    }

    #[tokio::test]
    async fn test_fetch_and_resolve_defaults_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc/values/Mettur"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [
                    ["Date", "Cumulative_Rainfall_Inside"],
                    ["01-01-2011", "10"],
                    ["02-01-2011", "20"]
                ]
            })))
            .mount(&server)
            .await;

        let res = fetch_and_resolve(&client_for(&server), "Mettur", None).await;
        assert!(matches!(res, Resolution::Matched { ref row, .. } if row[1] == "10"));
    }

    #[tokio::test]
    async fn test_fetch_and_resolve_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let res = fetch_and_resolve(&client_for(&server), "Mettur", Some("01-01-2011")).await;
        assert_eq!(
            res,
            Resolution::Empty {
                reason: EmptyReason::Transport,
                average_rainfall: None,
            }
        );
    }
}
