use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tank - storage tank snapshot (source row)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub tank_id: i64,
    pub fuel_type_id: i64,
    pub fuel_name: String,
    pub capacity: Decimal,
    pub current_volume: Decimal,
}

// ---------------------------------------------------------------------------
// TankStatus / TankLevel / FuelStock / TankReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TankStatus {
    Critical,
    Low,
    Normal,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankLevel {
    pub tank_id: i64,
    pub fuel_type_id: i64,
    pub fuel_name: String,
    pub capacity: Decimal,
    pub current_volume: Decimal,
    pub free_space: Decimal,
    pub fill_percent: Decimal,
    pub status: TankStatus,
}

/// Stock of one fuel across all of its tanks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStock {
    pub fuel_type_id: i64,
    pub fuel_name: String,
    pub tanks: usize,
    pub capacity: Decimal,
    pub stored: Decimal,
    pub free_space: Decimal,
    pub fill_percent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TankReport {
    /// Ordered by fuel name, then tank id.
    pub tanks: Vec<TankLevel>,
    pub fuels: Vec<FuelStock>,
    pub warnings: Vec<super::warning::ReportWarning>,
}

impl TankReport {
    /// Tanks at or below the low threshold.
    pub fn needing_refill(&self) -> impl Iterator<Item = &TankLevel> {
        self.tanks
            .iter()
            .filter(|t| matches!(t.status, TankStatus::Critical | TankStatus::Low))
    }
}
