//! Async wrapper around [`FuelReports`] for use in async runtimes (Tokio, etc.).
//!
//! Every call runs on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the event loop free while
//! DuckDB scans the exports.
//!
//! # Example
//!
//! ```no_run
//! use fuel_reports::AsyncFuelReports;
//!
//! # async fn example() -> fuel_reports::Result<()> {
//! let reports = AsyncFuelReports::builder().data_dir("/var/lib/station").build().await?;
//! let tanks = reports.run(|r| Ok(r.tanks().levels(None))).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::FuelReports;

// ---------------------------------------------------------------------------
// AsyncFuelReportsBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncFuelReports`] instance.
#[derive(Default)]
pub struct AsyncFuelReportsBuilder {
    data_dir: Option<PathBuf>,
    config: ReportConfig,
}

impl AsyncFuelReportsBuilder {
    /// Directory holding the station exports.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace the report options wholesale.
    pub fn config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Build on the blocking pool.
    pub async fn build(self) -> Result<AsyncFuelReports> {
        tokio::task::spawn_blocking(move || {
            let mut builder = FuelReports::builder().config(self.config);
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            Ok(AsyncFuelReports::from_sync(builder.build()?))
        })
        .await
        .map_err(|e| ReportError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncFuelReports
// ---------------------------------------------------------------------------

/// Async wrapper around [`FuelReports`].
///
/// The connection keeps `RefCell` state, so the reports live behind a
/// [`Mutex`] and calls are serialized.
pub struct AsyncFuelReports {
    inner: Arc<Mutex<FuelReports>>,
}

impl AsyncFuelReports {
    pub fn builder() -> AsyncFuelReportsBuilder {
        AsyncFuelReportsBuilder::default()
    }

    /// Wrap an already-built [`FuelReports`].
    pub fn from_sync(reports: FuelReports) -> Self {
        Self {
            inner: Arc::new(Mutex::new(reports)),
        }
    }

    /// Run a sync report operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&FuelReports) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let reports = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = reports
                .lock()
                .map_err(|_| ReportError::InvalidArgument("reports lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| ReportError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Execute a raw SQL query asynchronously.
    pub async fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |r| r.sql(&query, &params)).await
    }

    /// Re-register views if the exports changed.
    pub async fn refresh(&self) -> Result<bool> {
        self.run(|r| Ok(r.refresh())).await
    }
}
