use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// DispensingRecord - one metered sale at a pump
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispensingRecord {
    pub fuel_type_id: i64,
    pub fuel_name: String,
    pub pump_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub dispensed_at: NaiveDateTime,
    pub volume: Decimal,
}

// ---------------------------------------------------------------------------
// DateRange - inclusive calendar-date range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `from > to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(ReportError::InvalidArgument(format!(
                "date range starts after it ends: {} > {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// A range covering a single day.
    pub fn day(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let date = at.date();
        date >= self.from && date <= self.to
    }

    /// First instant of the range (midnight of `from`).
    pub fn start(&self) -> NaiveDateTime {
        self.from.and_time(chrono::NaiveTime::MIN)
    }

    /// First instant after the range (midnight of the day after `to`).
    pub fn end_exclusive(&self) -> NaiveDateTime {
        let next = self.to.succ_opt().unwrap_or(NaiveDate::MAX);
        next.and_time(chrono::NaiveTime::MIN)
    }

    pub fn first_day_param(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    pub fn last_day_param(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }
}

// ---------------------------------------------------------------------------
// ReportFilter - optional AND-ed restrictions
// ---------------------------------------------------------------------------

/// Optional restrictions applied as a conjunction.
///
/// An absent field places no restriction on that dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub fuel_type_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub pump_id: Option<i64>,
}

impl ReportFilter {
    pub fn fuel(mut self, fuel_type_id: i64) -> Self {
        self.fuel_type_id = Some(fuel_type_id);
        self
    }

    pub fn staff(mut self, staff_id: i64) -> Self {
        self.staff_id = Some(staff_id);
        self
    }

    pub fn pump(mut self, pump_id: i64) -> Self {
        self.pump_id = Some(pump_id);
        self
    }

    pub fn matches(&self, record: &DispensingRecord) -> bool {
        self.fuel_type_id.map_or(true, |id| record.fuel_type_id == id)
            && self.staff_id.map_or(true, |id| record.staff_id == Some(id))
            && self.pump_id.map_or(true, |id| record.pump_id == Some(id))
    }
}
