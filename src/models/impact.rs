use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::dispensing::DateRange;
use super::warning::ReportWarning;

// ---------------------------------------------------------------------------
// PriceChange - effect of one price entry taking effect
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub fuel_type_id: i64,
    pub fuel_name: String,
    pub effective_at: NaiveDateTime,
    /// When the next price took effect, if it did.
    pub superseded_at: Option<NaiveDateTime>,
    pub previous_price: Decimal,
    pub new_price: Decimal,
    pub delta: Decimal,
    pub delta_percent: Decimal,
    /// Volume sold while this price was active, within the report range.
    pub volume: Decimal,
    pub revenue: Decimal,
    pub lost_profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceImpactReport {
    pub date_range: DateRange,
    /// Ordered by fuel name, then effective instant.
    pub changes: Vec<PriceChange>,
    pub total_revenue: Decimal,
    pub total_lost_profit: Decimal,
    pub warnings: Vec<ReportWarning>,
}

impl PriceImpactReport {
    pub fn empty(date_range: DateRange) -> Self {
        Self {
            date_range,
            changes: Vec::new(),
            total_revenue: Decimal::ZERO,
            total_lost_profit: Decimal::ZERO,
            warnings: Vec::new(),
        }
    }

    /// Changes that lowered the price.
    pub fn decreases(&self) -> impl Iterator<Item = &PriceChange> {
        self.changes.iter().filter(|c| c.delta.is_sign_negative() && !c.delta.is_zero())
    }
}
