use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::dispensing::DateRange;
use super::warning::ReportWarning;

// ---------------------------------------------------------------------------
// PumpPerformance - per-pump throughput for a date range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpPerformance {
    pub pump_id: i64,
    pub pump_name: String,
    pub transactions: usize,
    pub total_volume: Decimal,
    pub total_revenue: Decimal,
    pub average_volume: Decimal,
    /// Percentage of the station's volume in the range.
    pub volume_share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpReport {
    pub date_range: DateRange,
    /// Ordered by volume descending, then pump id.
    pub pumps: Vec<PumpPerformance>,
    pub total_transactions: usize,
    pub total_volume: Decimal,
    pub total_revenue: Decimal,
    pub warnings: Vec<ReportWarning>,
}

impl PumpReport {
    pub fn empty(date_range: DateRange) -> Self {
        Self {
            date_range,
            pumps: Vec::new(),
            total_transactions: 0,
            total_volume: Decimal::ZERO,
            total_revenue: Decimal::ZERO,
            warnings: Vec::new(),
        }
    }
}
