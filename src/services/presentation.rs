//! Maps a resolved reservoir record onto labeled, formatted dashboard cards.
//!
//! No error conditions: missing or non-numeric values show as "N/A" and an
//! unrecognised risk level shows in neutral gray.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::helpers::{format_fixed, NOT_AVAILABLE};
use crate::services::schema::{ReservoirField, ReservoirRecord};

/// Decimal places for reservoir water levels.
const LEVEL_PLACES: u32 = 1;
/// Decimal places for volume, rainfall and accuracy.
const DETAIL_PLACES: u32 = 2;

/// Water-supply risk band reported by the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Unknown,
}

impl RiskLevel {
    /// Exact, case-sensitive match on the sheet's label.
    pub fn parse(label: Option<&str>) -> Self {
        match label {
            Some("Low") => RiskLevel::Low,
            Some("Moderate") => RiskLevel::Moderate,
            Some("High") => RiskLevel::High,
            _ => RiskLevel::Unknown,
        }
    }

    pub fn color(self) -> RiskColor {
        match self {
            RiskLevel::Low => RiskColor::Green,
            RiskLevel::Moderate => RiskColor::Amber,
            RiskLevel::High => RiskColor::Red,
            RiskLevel::Unknown => RiskColor::Gray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskColor {
    Green,
    Amber,
    Red,
    Gray,
}

impl RiskColor {
    pub fn hex(self) -> &'static str {
        match self {
            RiskColor::Green => "#00b67a",
            RiskColor::Amber => "#e49042",
            RiskColor::Red => "#ca0813",
            RiskColor::Gray => "#e9eaef",
        }
    }
}

/// Risk badge shown on each status card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RiskBadge {
    /// Raw label from the sheet, if any
    pub label: Option<String>,
    pub level: RiskLevel,
    pub color: RiskColor,
    /// Background color as a hex string, e.g. "#00b67a"
    pub color_hex: String,
}

impl RiskBadge {
    pub fn from_label(label: Option<&str>) -> Self {
        let level = RiskLevel::parse(label);
        let color = level.color();
        Self {
            label: label.map(str::to_string),
            level,
            color,
            color_hex: color.hex().to_string(),
        }
    }
}

/// "Cumulative Annual Rainfall in Catchment" card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RainfallCard {
    pub title: String,
    /// Cumulative rainfall for the selected date, mm (2 dp) or "N/A"
    pub cumulative_rainfall_mm: String,
    /// Average over every row of the sheet, mm (2 dp) or "N/A"
    pub average_annual_rainfall_mm: String,
}

/// "Current Reservoir Status" card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurrentStatusCard {
    pub title: String,
    pub risk: RiskBadge,
    /// Water level, height in ft (1 dp) or "N/A"
    pub water_level_ft: String,
    /// Storage volume in TMC (2 dp) or "N/A"
    pub volume_tmc: String,
}

/// 15- or 30-day prediction card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PredictionCard {
    pub title: String,
    pub horizon_days: u32,
    pub risk: RiskBadge,
    /// Predicted water level, height in ft (1 dp) or "N/A"
    pub water_level_ft: String,
    /// Prediction accuracy in % (2 dp) or "N/A"
    pub accuracy_pct: String,
}

impl PredictionCard {
    fn new(horizon_days: u32, risk: Option<&str>, level: Option<&str>, accuracy: Option<&str>) -> Self {
        Self {
            title: format!("{} Days Prediction", horizon_days),
            horizon_days,
            risk: RiskBadge::from_label(risk),
            water_level_ft: format_fixed(level, LEVEL_PLACES),
            accuracy_pct: format_fixed(accuracy, DETAIL_PLACES),
        }
    }
}

/// Everything the dashboard shows for one populated selection.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardView {
    /// Selected source (reservoir sheet name)
    pub title: String,
    pub rainfall: RainfallCard,
    pub current: CurrentStatusCard,
    pub prediction_15d: PredictionCard,
    pub prediction_30d: PredictionCard,
    /// Fields the sheet layout does not reach; their values show as "N/A"
    pub layout_warnings: Vec<ReservoirField>,
}

impl DashboardView {
    pub fn build(
        title: &str,
        record: &ReservoirRecord,
        average_rainfall: Option<Decimal>,
        layout_warnings: Vec<ReservoirField>,
    ) -> Self {
        Self {
            title: title.to_string(),
            rainfall: RainfallCard {
                title: "Cumulative Annual Rainfall in Catchment".to_string(),
                cumulative_rainfall_mm: format_fixed(
                    record.cumulative_rainfall_inside.as_deref(),
                    DETAIL_PLACES,
                ),
                average_annual_rainfall_mm: average_rainfall
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            },
            current: CurrentStatusCard {
                title: "Current Reservoir Status".to_string(),
                risk: RiskBadge::from_label(record.risk_current.as_deref()),
                water_level_ft: format_fixed(record.water_level.as_deref(), LEVEL_PLACES),
                volume_tmc: format_fixed(record.storage_volume.as_deref(), DETAIL_PLACES),
            },
            prediction_15d: PredictionCard::new(
                15,
                record.risk_15d.as_deref(),
                record.water_level_15d.as_deref(),
                record.accuracy_15d.as_deref(),
            ),
            prediction_30d: PredictionCard::new(
                30,
                record.risk_30d.as_deref(),
                record.water_level_30d.as_deref(),
                record.accuracy_30d.as_deref(),
            ),
            layout_warnings,
        }
    }
}
