//! Pump performance queries against the `dispensing` and `pumps` views.

use std::collections::BTreeMap;

use crate::config::ReportConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{DateRange, PriceBook, PumpReport, ReportFilter};
use crate::queries::prices::PriceQuery;
use crate::queries::rows::{self, rows_or_warn};
use crate::queries::sales::SalesQuery;
use crate::reports;
use crate::sql_builder::SqlBuilder;

/// Query interface for per-pump throughput.
pub struct PumpQuery<'a> {
    conn: &'a Connection,
    config: &'a ReportConfig,
}

impl<'a> PumpQuery<'a> {
    /// Create a new `PumpQuery` bound to the given connection.
    pub fn new(conn: &'a Connection, config: &'a ReportConfig) -> Self {
        Self { conn, config }
    }

    /// Pump display names keyed by pump id.
    pub fn pump_names(&self) -> Result<BTreeMap<i64, String>> {
        self.conn.ensure_views(&["pumps"])?;

        let (sql, params) = SqlBuilder::new("pumps")
            .select(&["pump_id", "name"])
            .order_by(&["pump_id ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let id = rows::int(row, "pump_id").ok()?;
                let name = rows::opt_string(row, "name").unwrap_or_else(|| format!("Pump #{}", id));
                Some((id, name))
            })
            .collect())
    }

    /// Throughput and revenue per pump over `date_range`.
    pub fn report(&self, date_range: DateRange, filter: &ReportFilter) -> PumpReport {
        let mut warnings = Vec::new();

        let records = rows_or_warn(
            "dispensing",
            SalesQuery::new(self.conn, self.config).fetch_dispensing_records(&date_range, filter),
            &mut warnings,
        );
        let prices = rows_or_warn(
            "fuel_prices",
            PriceQuery::new(self.conn, self.config).history(filter.fuel_type_id),
            &mut warnings,
        );

        let (Some(records), Some(prices)) = (records, prices) else {
            let mut report = PumpReport::empty(date_range);
            report.warnings = warnings;
            return report;
        };

        // Pumps are listed from the dispensing rows alone when the pump
        // table is not exported.
        let names = self.pump_names().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "pump list unavailable");
            BTreeMap::new()
        });

        let mut report = reports::pump_performance(
            &records,
            &PriceBook::new(prices),
            &names,
            date_range,
            filter,
        );
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report
    }
}
