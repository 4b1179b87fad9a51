//! DuckDB connection wrapper with lazy view registration and query execution.
//!
//! Every station table is exposed as a view named after the table, backed by
//! whichever export file the [`DataStore`] finds (parquet, NDJSON or CSV).

use crate::error::{ReportError, Result};
use crate::store::DataStore;
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Days between 0001-01-01 and 1970-01-01 in the proleptic Gregorian calendar.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Wraps an in-memory DuckDB database and registers export files as views.
pub struct Connection {
    conn: DuckDbConnection,
    /// The store used to locate export files.
    pub store: RefCell<DataStore>,
    registered_views: RefCell<HashSet<String>>,
}

impl Connection {
    /// Create a connection backed by the given store.
    ///
    /// Opens an in-memory DuckDB database.
    pub fn new(store: DataStore) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            store: RefCell::new(store),
            registered_views: RefCell::new(HashSet::new()),
        })
    }

    /// Ensure one or more views are registered.
    pub fn ensure_views(&self, views: &[&str]) -> Result<()> {
        for name in views {
            if !self.registered_views.borrow().contains(*name) {
                self.ensure_view(name)?;
            }
        }
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// DATE columns come back as `YYYY-MM-DD` strings; other temporal and
    /// DECIMAL columns should be cast to VARCHAR in the query.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run
        let (column_names, column_count) = {
            let executed = rows_result.as_ref().ok_or_else(|| {
                ReportError::InvalidArgument("statement produced no result set".to_string())
            })?;
            let names: Vec<String> = executed
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            (names, executed.column_count())
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate() {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Create a DuckDB table from a newline-delimited JSON file.
    ///
    /// The table takes the place of the export file of the same name, so it
    /// must be registered before that view is first used.
    pub fn register_table_from_ndjson(&self, table_name: &str, ndjson_path: &str) -> Result<()> {
        let path_fwd = ndjson_path.replace('\\', "/");
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {name}; \
             CREATE TABLE {name} AS SELECT * FROM read_json_auto('{path}', format='newline_delimited')",
            name = table_name,
            path = path_fwd
        ))?;
        self.registered_views.borrow_mut().insert(table_name.to_string());
        Ok(())
    }

    /// Check whether a view has been registered.
    pub fn has_view(&self, name: &str) -> bool {
        self.registered_views.borrow().contains(name)
    }

    /// Return the registered view names, sorted.
    pub fn views(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registered_views.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Clear all registered views so they will be re-created on next access.
    pub fn reset_views(&self) {
        self.registered_views.borrow_mut().clear();
        self.store.borrow_mut().reset();
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    /// Register the export file for `view_name` as a view.
    fn ensure_view(&self, view_name: &str) -> Result<()> {
        if self.registered_views.borrow().contains(view_name) {
            return Ok(());
        }

        let path = self.store.borrow_mut().table_path(view_name)?;
        // DuckDB wants forward slashes
        let path_str = path.to_string_lossy().replace('\\', "/");

        let reader = match path.extension().and_then(|e| e.to_str()) {
            Some("parquet") => format!("read_parquet('{}')", path_str),
            Some("csv") => format!("read_csv_auto('{}', header=true)", path_str),
            _ => format!("read_json_auto('{}', format='newline_delimited')", path_str),
        };

        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE VIEW {} AS SELECT * FROM {}",
            view_name, reader
        ))?;
        self.registered_views.borrow_mut().insert(view_name.to_string());
        debug!(view = view_name, path = %path_str, "registered view");

        Ok(())
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => serde_json::Value::Number(i.into()),
            Err(_) => serde_json::Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f64::from(f))
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        ValueRef::Date32(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(chrono::NaiveDate::from_num_days_from_ce_opt)
            .map(|d| serde_json::Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(serde_json::Value::Null),
        // Timestamps, intervals, decimals and nested types are cast to
        // VARCHAR by the report queries.
        _ => serde_json::Value::Null,
    }
}
