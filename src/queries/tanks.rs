//! Tank capacity queries against the `tanks` and `fuel_types` views.

use crate::config::ReportConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{Tank, TankReport};
use crate::queries::rows::{self, rows_or_warn, Fetched, Row};
use crate::reports;
use crate::sql_builder::SqlBuilder;

/// Query interface for storage tanks.
pub struct TankQuery<'a> {
    conn: &'a Connection,
    config: &'a ReportConfig,
}

impl<'a> TankQuery<'a> {
    /// Create a new `TankQuery` bound to the given connection.
    pub fn new(conn: &'a Connection, config: &'a ReportConfig) -> Self {
        Self { conn, config }
    }

    /// Current snapshot of every tank, optionally for one fuel.
    pub fn fetch_tanks(&self, fuel_type_id: Option<i64>) -> Result<Fetched<Tank>> {
        self.conn.ensure_views(&["tanks", "fuel_types"])?;

        let mut qb = SqlBuilder::new("tanks t");
        qb.select(&[
            "t.tank_id",
            "t.fuel_type_id",
            "f.name AS fuel_name",
            "CAST(t.capacity AS VARCHAR) AS capacity",
            "CAST(t.current_volume AS VARCHAR) AS current_volume",
        ])
        .join("LEFT JOIN fuel_types f ON f.fuel_type_id = t.fuel_type_id")
        .where_opt_id("t.fuel_type_id", fuel_type_id)
        .order_by(&["t.tank_id ASC"]);

        let (sql, params) = qb.build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(Fetched::collect("tanks", rows, tank))
    }

    /// Fill levels classified against the configured thresholds.
    pub fn levels(&self, fuel_type_id: Option<i64>) -> TankReport {
        let mut warnings = Vec::new();
        let Some(tanks) = rows_or_warn("tanks", self.fetch_tanks(fuel_type_id), &mut warnings)
        else {
            return TankReport {
                warnings,
                ..TankReport::default()
            };
        };

        let mut report = reports::tank_levels(&tanks, &self.config.tank_thresholds);
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report
    }
}

fn tank(row: &Row) -> std::result::Result<Tank, String> {
    let fuel_type_id = rows::int(row, "fuel_type_id")?;
    Ok(Tank {
        tank_id: rows::int(row, "tank_id")?,
        fuel_type_id,
        fuel_name: rows::opt_string(row, "fuel_name")
            .unwrap_or_else(|| format!("Fuel #{}", fuel_type_id)),
        capacity: rows::decimal(row, "capacity")?,
        current_volume: rows::opt_decimal(row, "current_volume")?.unwrap_or_default(),
    })
}
