//! Coercion of raw DuckDB rows into typed records.
//!
//! Report queries cast timestamps and numerics to VARCHAR so values arrive
//! as text and are parsed here without going through floating point.
//! A row that cannot be coerced is skipped on its own; it never fails the
//! whole fetch.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::models::ReportWarning;

pub type Row = HashMap<String, Value>;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// TIMESTAMPTZ columns render as `2024-01-05 14:00:00+02`.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Rows that converted cleanly, plus one warning per row that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub rows: Vec<T>,
    pub skipped: Vec<ReportWarning>,
}

impl<T> Fetched<T> {
    /// Convert every row with `convert`, collecting failures as warnings.
    pub fn collect(
        table: &str,
        rows: Vec<Row>,
        convert: impl Fn(&Row) -> std::result::Result<T, String>,
    ) -> Self {
        let mut out = Self {
            rows: Vec::with_capacity(rows.len()),
            skipped: Vec::new(),
        };
        for row in &rows {
            match convert(row) {
                Ok(item) => out.rows.push(item),
                Err(reason) => {
                    warn!(table, reason = %reason, "skipping malformed row");
                    out.skipped.push(ReportWarning::skipped(table, reason));
                }
            }
        }
        out
    }
}

/// Unwrap a fetch, or record it as unavailable.
///
/// Skipped-row warnings are moved into `warnings` either way.
pub fn rows_or_warn<T>(
    table: &str,
    fetched: Result<Fetched<T>>,
    warnings: &mut Vec<ReportWarning>,
) -> Option<Vec<T>> {
    match fetched {
        Ok(fetched) => {
            warnings.extend(fetched.skipped);
            Some(fetched.rows)
        }
        Err(e) => {
            warn!(table, error = %e, "report data unavailable");
            warnings.push(ReportWarning::data_unavailable(table, e));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Field accessors
// ---------------------------------------------------------------------------

fn field<'r>(row: &'r Row, col: &str) -> Option<&'r Value> {
    row.get(col).filter(|v| !v.is_null())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Naive timestamps are taken as-is; offset timestamps are normalized to UTC.
/// A bare date means midnight. Anything else is rejected.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            OFFSET_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
                .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

pub fn decimal(row: &Row, col: &str) -> std::result::Result<Decimal, String> {
    let value = field(row, col).ok_or_else(|| format!("{} is missing", col))?;
    text(value)
        .as_deref()
        .and_then(parse_decimal)
        .ok_or_else(|| format!("{} is not numeric: {}", col, value))
}

pub fn opt_decimal(row: &Row, col: &str) -> std::result::Result<Option<Decimal>, String> {
    match field(row, col) {
        None => Ok(None),
        Some(_) => decimal(row, col).map(Some),
    }
}

pub fn int(row: &Row, col: &str) -> std::result::Result<i64, String> {
    opt_int(row, col)?.ok_or_else(|| format!("{} is missing", col))
}

pub fn opt_int(row: &Row, col: &str) -> std::result::Result<Option<i64>, String> {
    let Some(value) = field(row, col) else {
        return Ok(None);
    };
    value
        .as_i64()
        .or_else(|| text(value).and_then(|s| s.parse().ok()))
        .map(Some)
        .ok_or_else(|| format!("{} is not an integer: {}", col, value))
}

pub fn opt_string(row: &Row, col: &str) -> Option<String> {
    field(row, col)
        .and_then(text)
        .filter(|s| !s.is_empty())
}

pub fn datetime(row: &Row, col: &str) -> std::result::Result<NaiveDateTime, String> {
    let value = field(row, col).ok_or_else(|| format!("{} is missing", col))?;
    text(value)
        .as_deref()
        .and_then(parse_datetime)
        .ok_or_else(|| format!("{} is not a timestamp: {}", col, value))
}

pub fn date(row: &Row, col: &str) -> std::result::Result<NaiveDate, String> {
    let value = field(row, col).ok_or_else(|| format!("{} is missing", col))?;
    text(value)
        .as_deref()
        .and_then(parse_date)
        .ok_or_else(|| format!("{} is not a date: {}", col, value))
}
