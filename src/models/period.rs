use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Granularity
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    /// ISO-8601 weeks: Monday start, week 1 holds the year's first Thursday.
    Weekly,
    Monthly,
}

impl Granularity {
    /// Parse a grouping value from a request, falling back to [`Granularity::Daily`].
    ///
    /// Unknown values are logged and never fail the report.
    pub fn from_request(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::Daily,
            Some(value) => value.parse().unwrap_or_else(|_| {
                warn!(value, "unrecognized grouping, falling back to daily");
                Self::Daily
            }),
        }
    }

    /// The period containing `date`.
    pub fn period_of(self, date: NaiveDate) -> PeriodKey {
        let start = match self {
            Self::Daily => date,
            Self::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Self::Monthly => date.with_day(1).unwrap_or(date),
        };
        PeriodKey {
            granularity: self,
            start,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for Granularity {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(ReportError::InvalidArgument(format!(
                "unknown grouping: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PeriodKey - a disjoint reporting period
// ---------------------------------------------------------------------------

/// A day, ISO week or calendar month, identified by its first day.
///
/// Ordering follows the start date, so a sorted collection of keys of one
/// granularity is in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodKey {
    pub start: NaiveDate,
    pub granularity: Granularity,
}

impl PeriodKey {
    /// Midnight of the period's first day.
    pub fn start_at(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Label used by the presentation layer: `2024-01-05`, `2025-W01`, `2024-01`.
    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Daily => self.start.format("%Y-%m-%d").to_string(),
            Granularity::Weekly => {
                let week = self.start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Monthly => self.start.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
