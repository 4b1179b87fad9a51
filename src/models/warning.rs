use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A data-quality condition a report degraded around instead of failing.
///
/// Reports collect these so the caller can decide whether to show them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    /// A source query failed; the report is empty.
    DataUnavailable { table: String, reason: String },
    /// Volume was sold for a fuel with no price active at the time.
    PriceGap {
        period: Option<String>,
        fuel_type_id: i64,
        fuel_name: String,
        volume: Decimal,
    },
    /// A source row could not be turned into a record.
    SkippedRecord { table: String, reason: String },
}

impl ReportWarning {
    pub fn data_unavailable(table: &str, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            table: table.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn skipped(table: &str, reason: impl ToString) -> Self {
        Self::SkippedRecord {
            table: table.to_string(),
            reason: reason.to_string(),
        }
    }
}
