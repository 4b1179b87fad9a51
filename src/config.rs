use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Logical tables of a station export, in registration order.
pub const TABLES: &[&str] = &[
    "fuel_types",
    "fuel_prices",
    "dispensing",
    "pumps",
    "tanks",
    "customers",
    "credit_sales",
];

/// File extensions probed for each table, most preferred first.
pub const TABLE_EXTENSIONS: &[&str] = &["parquet", "ndjson", "csv"];

/// Name of the optional station metadata document (may also be `.json.gz`).
pub const STATION_META: &str = "station.json";

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("fuel-reports")
    } else {
        PathBuf::from(".fuel-reports")
    }
}

// ---------------------------------------------------------------------------
// Report options
// ---------------------------------------------------------------------------

/// Which instant decides the "current" price of a (period, fuel) group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceAnchor {
    /// Earliest dispensing timestamp inside the group.
    #[default]
    FirstSale,
    /// Midnight of the period's first calendar day.
    PeriodStart,
}

/// What to do with a group whose fuel has no price active at the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPricePolicy {
    /// Drop the group from buckets and totals.
    #[default]
    Exclude,
    /// Keep the group's volume, priced at zero.
    ZeroPrice,
}

/// Fill-percentage thresholds used to classify tanks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankThresholds {
    pub critical_percent: Decimal,
    pub low_percent: Decimal,
    pub full_percent: Decimal,
}

impl Default for TankThresholds {
    fn default() -> Self {
        Self {
            critical_percent: Decimal::from(10),
            low_percent: Decimal::from(25),
            full_percent: Decimal::from(95),
        }
    }
}

/// Options shared by every report.
///
/// `currency_symbol` is never used in arithmetic; it is handed to whatever
/// renders the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub currency_symbol: String,
    pub price_anchor: PriceAnchor,
    pub missing_price: MissingPricePolicy,
    pub tank_thresholds: TankThresholds,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "грн".to_string(),
            price_anchor: PriceAnchor::default(),
            missing_price: MissingPricePolicy::default(),
            tank_thresholds: TankThresholds::default(),
        }
    }
}
