//! Named view of the reservoir sheet's fixed column layout.
//!
//! The upstream sheet has no declared schema for the dashboard fields; they
//! live at fixed column positions. This module gives each position a name and
//! checks the header once per fetch so that a layout change is reported
//! instead of silently reading the wrong cells.

use serde::Serialize;
use utoipa::ToSchema;

use crate::services::table::cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservoirField {
    WaterLevel,
    StorageVolume,
    CumulativeRainfallInside,
    #[serde(rename = "water_level_15d")]
    WaterLevel15d,
    #[serde(rename = "water_level_30d")]
    WaterLevel30d,
    RiskCurrent,
    #[serde(rename = "risk_15d")]
    Risk15d,
    #[serde(rename = "risk_30d")]
    Risk30d,
    #[serde(rename = "accuracy_15d")]
    Accuracy15d,
    #[serde(rename = "accuracy_30d")]
    Accuracy30d,
}

impl ReservoirField {
    pub const ALL: [ReservoirField; 10] = [
        ReservoirField::WaterLevel,
        ReservoirField::StorageVolume,
        ReservoirField::CumulativeRainfallInside,
        ReservoirField::WaterLevel15d,
        ReservoirField::WaterLevel30d,
        ReservoirField::RiskCurrent,
        ReservoirField::Risk15d,
        ReservoirField::Risk30d,
        ReservoirField::Accuracy15d,
        ReservoirField::Accuracy30d,
    ];

    /// Zero-based column position in the sheet.
    pub fn column(self) -> usize {
        match self {
            ReservoirField::WaterLevel => 3,
            ReservoirField::StorageVolume => 6,
            ReservoirField::CumulativeRainfallInside => 10,
            ReservoirField::WaterLevel15d => 23,
            ReservoirField::WaterLevel30d => 24,
            ReservoirField::RiskCurrent => 25,
            ReservoirField::Risk15d => 26,
            ReservoirField::Risk30d => 27,
            ReservoirField::Accuracy15d => 29,
            ReservoirField::Accuracy30d => 30,
        }
    }

    /// Serialized name, as it appears in `layout_warnings`.
    pub fn name(self) -> String {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => name,
            _ => format!("{:?}", self),
        }
    }
}

/// Fields whose column lies beyond the header row.
///
/// Logged at warn level when non-empty; the caller carries the list into the
/// response so consumers can see which values are untrustworthy.
pub fn check_layout(header: &[String]) -> Vec<ReservoirField> {
    let missing: Vec<ReservoirField> = ReservoirField::ALL
        .into_iter()
        .filter(|f| f.column() >= header.len())
        .collect();

    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(|f| f.name()).collect();
        tracing::warn!(
            "Sheet layout has {} columns; reservoir fields out of range: {}",
            header.len(),
            names.join(", ")
        );
    }

    missing
}

/// One sheet row read through the named layout. Absent cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservoirRecord {
    pub water_level: Option<String>,
    pub storage_volume: Option<String>,
    pub cumulative_rainfall_inside: Option<String>,
    pub water_level_15d: Option<String>,
    pub water_level_30d: Option<String>,
    pub risk_current: Option<String>,
    pub risk_15d: Option<String>,
    pub risk_30d: Option<String>,
    pub accuracy_15d: Option<String>,
    pub accuracy_30d: Option<String>,
}

impl ReservoirRecord {
    pub fn from_row(row: &[String]) -> Self {
        let get = |field: ReservoirField| cell(row, field.column()).map(str::to_string);
        Self {
            water_level: get(ReservoirField::WaterLevel),
            storage_volume: get(ReservoirField::StorageVolume),
            cumulative_rainfall_inside: get(ReservoirField::CumulativeRainfallInside),
            water_level_15d: get(ReservoirField::WaterLevel15d),
            water_level_30d: get(ReservoirField::WaterLevel30d),
            risk_current: get(ReservoirField::RiskCurrent),
            risk_15d: get(ReservoirField::Risk15d),
            risk_30d: get(ReservoirField::Risk30d),
            accuracy_15d: get(ReservoirField::Accuracy15d),
            accuracy_30d: get(ReservoirField::Accuracy30d),
        }
    }
}
