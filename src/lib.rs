//! Fuel station management reports.
//!
//! Reads the station's back-office exports (parquet, NDJSON or CSV files in a
//! data directory) through an in-process DuckDB database and builds typed
//! reports: period sales with lost profit, price-change impact, pump
//! performance, tank capacity and overdue credit.
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use fuel_reports::models::{DateRange, Granularity};
//! use fuel_reports::queries::SalesReportParams;
//! use fuel_reports::FuelReports;
//!
//! let reports = FuelReports::builder().data_dir("/var/lib/station").build().unwrap();
//!
//! let january = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//! )
//! .unwrap();
//! let sales = reports
//!     .sales()
//!     .report(&SalesReportParams::new(january).granularity(Granularity::Weekly));
//! println!("lost profit: {}", sales.totals.lost_profit);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod queries;
pub mod reports;
pub mod sql_builder;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncFuelReports;
pub use config::ReportConfig;
pub use connection::Connection;
pub use error::{ReportError, Result};
pub use reports::aggregate;
pub use sql_builder::SqlBuilder;
pub use store::DataStore;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

// ---------------------------------------------------------------------------
// FuelReportsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`FuelReports`] instance.
#[derive(Default)]
pub struct FuelReportsBuilder {
    data_dir: Option<PathBuf>,
    config: ReportConfig,
}

impl FuelReportsBuilder {
    /// Directory holding the station exports.
    ///
    /// Defaults to `fuel-reports` under the platform data directory
    /// (e.g. `~/.local/share/fuel-reports` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace the report options wholesale.
    pub fn config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Currency symbol handed to the presentation layer.
    pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.config.currency_symbol = symbol.into();
        self
    }

    /// Open the data directory and an in-memory DuckDB database.
    ///
    /// Export files are registered lazily on first query.
    pub fn build(self) -> Result<FuelReports> {
        let store = DataStore::new(self.data_dir)?;
        let conn = Connection::new(store)?;
        Ok(FuelReports {
            conn,
            config: self.config,
        })
    }
}

// ---------------------------------------------------------------------------
// FuelReports
// ---------------------------------------------------------------------------

/// Entry point for the station reports.
///
/// Owns the [`Connection`] and the [`ReportConfig`], and hands out
/// lightweight query interfaces that borrow both.
pub struct FuelReports {
    conn: Connection,
    config: ReportConfig,
}

impl FuelReports {
    /// Create a new builder.
    pub fn builder() -> FuelReportsBuilder {
        FuelReportsBuilder::default()
    }

    /// Build directly over an existing connection (tests, embedding).
    pub fn from_connection(conn: Connection, config: ReportConfig) -> Self {
        Self { conn, config }
    }

    // -- Query accessors ---------------------------------------------------

    /// Period sales with revenue and lost profit.
    pub fn sales(&self) -> queries::SalesQuery<'_> {
        queries::SalesQuery::new(&self.conn, &self.config)
    }

    /// Price history and price-change impact.
    pub fn prices(&self) -> queries::PriceQuery<'_> {
        queries::PriceQuery::new(&self.conn, &self.config)
    }

    /// Per-pump throughput.
    pub fn pumps(&self) -> queries::PumpQuery<'_> {
        queries::PumpQuery::new(&self.conn, &self.config)
    }

    /// Tank fill levels.
    pub fn tanks(&self) -> queries::TankQuery<'_> {
        queries::TankQuery::new(&self.conn, &self.config)
    }

    /// Overdue credit aging.
    pub fn credit(&self) -> queries::CreditQuery<'_> {
        queries::CreditQuery::new(&self.conn)
    }

    // -- Metadata and utility methods --------------------------------------

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Station metadata from `station.json`, or `Null` when absent.
    pub fn meta(&self) -> Result<serde_json::Value> {
        self.conn.store.borrow().load_meta()
    }

    /// Tables with an export file in the data directory.
    pub fn tables(&self) -> Vec<&'static str> {
        self.conn.store.borrow().available_tables()
    }

    /// Currently registered view names.
    pub fn views(&self) -> Vec<String> {
        self.conn.views()
    }

    /// Execute a raw SQL query with `?` placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Re-register views if any export file changed since it was read.
    ///
    /// Returns `true` when views were reset.
    pub fn refresh(&self) -> bool {
        let stale = self.conn.store.borrow().is_stale();
        if stale {
            self.conn.reset_views();
            info!("station exports changed; views reset");
        }
        stale
    }

    /// Return a reference to the underlying [`Connection`].
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Display for FuelReports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.conn.store.borrow();
        write!(
            f,
            "FuelReports(data_dir={}, views=[{}], currency={})",
            store.data_dir.display(),
            self.conn.views().join(", "),
            self.config.currency_symbol
        )
    }
}
