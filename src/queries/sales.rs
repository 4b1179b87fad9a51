//! Sales report queries against the `dispensing`, `fuel_types` and
//! `fuel_prices` views.

use crate::config::ReportConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{
    DateRange, DispensingRecord, Granularity, PriceBook, PriceEntry, ReportFilter, SalesReport,
};
use crate::queries::prices::PriceQuery;
use crate::queries::rows::{self, rows_or_warn, Fetched, Row};
use crate::reports::Aggregator;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// SalesReportParams
// ---------------------------------------------------------------------------

/// Parameters for the period sales report.
#[derive(Debug, Clone)]
pub struct SalesReportParams {
    pub date_range: DateRange,
    pub granularity: Granularity,
    pub filter: ReportFilter,
}

impl SalesReportParams {
    /// Daily report over `date_range` with no filters.
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            granularity: Granularity::Daily,
            filter: ReportFilter::default(),
        }
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn filter(mut self, filter: ReportFilter) -> Self {
        self.filter = filter;
        self
    }
}

// ---------------------------------------------------------------------------
// SalesQuery
// ---------------------------------------------------------------------------

/// Query interface for sales backed by the `dispensing` view.
pub struct SalesQuery<'a> {
    conn: &'a Connection,
    config: &'a ReportConfig,
}

impl<'a> SalesQuery<'a> {
    /// Create a new `SalesQuery` bound to the given connection.
    pub fn new(conn: &'a Connection, config: &'a ReportConfig) -> Self {
        Self { conn, config }
    }

    /// Dispensing records in `date_range` (inclusive) matching `filter`,
    /// ordered by time.
    pub fn fetch_dispensing_records(
        &self,
        date_range: &DateRange,
        filter: &ReportFilter,
    ) -> Result<Fetched<DispensingRecord>> {
        self.conn.ensure_views(&["dispensing", "fuel_types"])?;

        let mut qb = SqlBuilder::new("dispensing d");
        qb.select(&[
            "d.fuel_type_id",
            "f.name AS fuel_name",
            "d.pump_id",
            "d.staff_id",
            "CAST(d.dispensed_at AS VARCHAR) AS dispensed_at",
            "CAST(d.volume AS VARCHAR) AS volume",
        ])
        .join("LEFT JOIN fuel_types f ON f.fuel_type_id = d.fuel_type_id")
        .where_date_between(
            "d.dispensed_at",
            &date_range.first_day_param(),
            &date_range.last_day_param(),
        )
        .where_opt_id("d.fuel_type_id", filter.fuel_type_id)
        .where_opt_id("d.staff_id", filter.staff_id)
        .where_opt_id("d.pump_id", filter.pump_id)
        .order_by(&["d.dispensed_at ASC"]);

        let (sql, params) = qb.build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(Fetched::collect("dispensing", rows, dispensing_record))
    }

    /// Price history ordered by effective instant, for one fuel or all.
    pub fn fetch_price_history(&self, fuel_type_id: Option<i64>) -> Result<Fetched<PriceEntry>> {
        PriceQuery::new(self.conn, self.config).history(fuel_type_id)
    }

    /// Build the period sales report.
    ///
    /// A failed fetch yields an empty report with a `DataUnavailable`
    /// warning rather than an error.
    pub fn report(&self, params: &SalesReportParams) -> SalesReport {
        let mut warnings = Vec::new();
        let records = rows_or_warn(
            "dispensing",
            self.fetch_dispensing_records(&params.date_range, &params.filter),
            &mut warnings,
        );
        let prices = match records {
            Some(_) => rows_or_warn(
                "fuel_prices",
                self.fetch_price_history(params.filter.fuel_type_id),
                &mut warnings,
            ),
            None => None,
        };

        let (Some(records), Some(prices)) = (records, prices) else {
            let mut report = SalesReport::empty(params.granularity, params.date_range);
            report.warnings = warnings;
            return report;
        };

        let mut report = Aggregator::new(self.config).aggregate(
            &records,
            &PriceBook::new(prices),
            params.granularity,
            params.date_range,
            &params.filter,
        );
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report
    }
}

pub(crate) fn dispensing_record(row: &Row) -> std::result::Result<DispensingRecord, String> {
    let fuel_type_id = rows::int(row, "fuel_type_id")?;
    let volume = rows::decimal(row, "volume")?;
    if volume.is_sign_negative() && !volume.is_zero() {
        return Err(format!("volume is negative: {}", volume));
    }
    Ok(DispensingRecord {
        fuel_type_id,
        fuel_name: rows::opt_string(row, "fuel_name")
            .unwrap_or_else(|| format!("Fuel #{}", fuel_type_id)),
        pump_id: rows::opt_int(row, "pump_id")?,
        staff_id: rows::opt_int(row, "staff_id")?,
        dispensed_at: rows::datetime(row, "dispensed_at")?,
        volume,
    })
}
