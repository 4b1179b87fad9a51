use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::dispensing::DateRange;
use super::period::{Granularity, PeriodKey};
use super::warning::ReportWarning;

// ---------------------------------------------------------------------------
// PeriodFuelAggregate - one fuel's sales inside one period
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodFuelAggregate {
    pub period: PeriodKey,
    pub fuel_type_id: i64,
    pub fuel_name: String,
    pub total_volume: Decimal,
    pub current_price: Decimal,
    pub previous_price: Decimal,
    pub total_revenue: Decimal,
    pub lost_profit: Decimal,
    /// When `current_price` took effect; `None` if the group was zero-priced.
    pub price_effective_at: Option<NaiveDateTime>,
    pub first_sale_at: NaiveDateTime,
    pub records: usize,
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_volume: Decimal,
    pub total_revenue: Decimal,
    pub lost_profit: Decimal,
}

impl Totals {
    pub fn add(&mut self, other: &Totals) {
        self.total_volume += other.total_volume;
        self.total_revenue += other.total_revenue;
        self.lost_profit += other.lost_profit;
    }
}

impl From<&PeriodFuelAggregate> for Totals {
    fn from(agg: &PeriodFuelAggregate) -> Self {
        Self {
            total_volume: agg.total_volume,
            total_revenue: agg.total_revenue,
            lost_profit: agg.lost_profit,
        }
    }
}

// ---------------------------------------------------------------------------
// PeriodBucket / SalesReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub period: PeriodKey,
    /// Ordered by fuel name, then fuel id.
    pub fuels: Vec<PeriodFuelAggregate>,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub granularity: Granularity,
    pub date_range: DateRange,
    /// Ordered by period start.
    pub buckets: Vec<PeriodBucket>,
    pub totals: Totals,
    pub warnings: Vec<ReportWarning>,
}

impl SalesReport {
    pub fn empty(granularity: Granularity, date_range: DateRange) -> Self {
        Self {
            granularity,
            date_range,
            buckets: Vec::new(),
            totals: Totals::default(),
            warnings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterate every fuel aggregate across all buckets.
    pub fn aggregates(&self) -> impl Iterator<Item = &PeriodFuelAggregate> {
        self.buckets.iter().flat_map(|b| b.fuels.iter())
    }
}
