//! Price queries against the `fuel_prices` and `fuel_types` views.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::config::ReportConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{DateRange, PriceBook, PriceEntry, PriceImpactReport, ReportFilter};
use crate::queries::rows::{self, rows_or_warn, Fetched, Row};
use crate::queries::sales::SalesQuery;
use crate::reports;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface for fuel prices backed by the `fuel_prices` view.
pub struct PriceQuery<'a> {
    conn: &'a Connection,
    config: &'a ReportConfig,
}

impl<'a> PriceQuery<'a> {
    /// Create a new `PriceQuery` bound to the given connection.
    pub fn new(conn: &'a Connection, config: &'a ReportConfig) -> Self {
        Self { conn, config }
    }

    /// Full price history, optionally for a single fuel, ordered by
    /// fuel and effective instant.
    pub fn history(&self, fuel_type_id: Option<i64>) -> Result<Fetched<PriceEntry>> {
        self.conn.ensure_views(&["fuel_prices"])?;

        let mut qb = SqlBuilder::new("fuel_prices");
        qb.select(&[
            "fuel_type_id",
            "CAST(effective_at AS VARCHAR) AS effective_at",
            "CAST(price AS VARCHAR) AS price",
        ])
        .where_opt_id("fuel_type_id", fuel_type_id)
        .order_by(&["fuel_type_id ASC", "effective_at ASC"]);

        let (sql, params) = qb.build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(Fetched::collect("fuel_prices", rows, price_entry))
    }

    /// The price of `fuel_type_id` in force at `at`, if any was set by then.
    pub fn active_price(&self, fuel_type_id: i64, at: NaiveDateTime) -> Result<Option<PriceEntry>> {
        let history = self.history(Some(fuel_type_id))?;
        Ok(PriceBook::new(history.rows).active_at(fuel_type_id, at).cloned())
    }

    /// Display names of every fuel type keyed by id.
    pub fn fuel_names(&self) -> Result<BTreeMap<i64, String>> {
        self.conn.ensure_views(&["fuel_types"])?;

        let (sql, params) = SqlBuilder::new("fuel_types")
            .select(&["fuel_type_id", "name"])
            .order_by(&["fuel_type_id ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let id = rows::int(row, "fuel_type_id").ok()?;
                Some((id, rows::opt_string(row, "name")?))
            })
            .collect())
    }

    /// How each price change in `date_range` affected revenue.
    pub fn impact(&self, date_range: DateRange, filter: &ReportFilter) -> PriceImpactReport {
        let mut warnings = Vec::new();
        let sales = SalesQuery::new(self.conn, self.config);

        let records = rows_or_warn(
            "dispensing",
            sales.fetch_dispensing_records(&date_range, filter),
            &mut warnings,
        );
        let prices = rows_or_warn("fuel_prices", self.history(filter.fuel_type_id), &mut warnings);

        let (Some(records), Some(prices)) = (records, prices) else {
            let mut report = PriceImpactReport::empty(date_range);
            report.warnings = warnings;
            return report;
        };

        // Names are cosmetic; fall back to ids when the catalog is missing.
        let names = self.fuel_names().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "fuel catalog unavailable");
            BTreeMap::new()
        });

        let mut report =
            reports::price_impact(&records, &PriceBook::new(prices), &names, date_range, filter);
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report
    }
}

fn price_entry(row: &Row) -> std::result::Result<PriceEntry, String> {
    let price = rows::decimal(row, "price")?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(format!("price is negative: {}", price));
    }
    Ok(PriceEntry {
        fuel_type_id: rows::int(row, "fuel_type_id")?,
        effective_at: rows::datetime(row, "effective_at")?,
        price,
    })
}
