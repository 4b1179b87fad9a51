//! Shared test fixtures for the station report integration tests.
//!
//! `setup_sample_db()` builds an in-memory DuckDB connection holding a small
//! January 2024 station: three fuels, a price history with a Diesel price
//! cut on New Year's Day, a handful of pump sales, tanks and credit invoices.

#![allow(dead_code)]

use fuel_reports::{Connection, DataStore, FuelReports, ReportConfig};
use std::io::Write;
use tempfile::NamedTempFile;

pub const A95: i64 = 1;
pub const DIESEL: i64 = 2;
pub const LPG: i64 = 3;

/// Create a `Connection` over a temporary data directory with the sample
/// tables loaded.
///
/// The caller must keep the returned `TempDir` alive for the duration of
/// the test.
pub fn setup_sample_db() -> (Connection, tempfile::TempDir) {
    let (conn, tmp_dir) = empty_db();

    register_fuel_types(&conn);
    register_fuel_prices(&conn);
    register_dispensing(&conn);
    register_pumps(&conn);
    register_tanks(&conn);
    register_customers(&conn);
    register_credit_sales(&conn);

    (conn, tmp_dir)
}

/// Same sample data wrapped in the reports facade.
pub fn sample_reports() -> (FuelReports, tempfile::TempDir) {
    let (conn, tmp_dir) = setup_sample_db();
    (FuelReports::from_connection(conn, ReportConfig::default()), tmp_dir)
}

/// A connection over an empty temporary data directory.
pub fn empty_db() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let store = DataStore::new(Some(tmp_dir.path().to_path_buf())).unwrap();
    let conn = Connection::new(store).unwrap();
    (conn, tmp_dir)
}

fn register_fuel_types(conn: &Connection) {
    let fuels = vec![
        serde_json::json!({"fuel_type_id": A95, "name": "A-95"}),
        serde_json::json!({"fuel_type_id": DIESEL, "name": "Diesel"}),
        serde_json::json!({"fuel_type_id": LPG, "name": "LPG"}),
    ];
    write_ndjson_and_register(conn, "fuel_types", &fuels);
}

fn register_fuel_prices(conn: &Connection) {
    // LPG never had a price set.
    let prices = vec![
        serde_json::json!({"fuel_type_id": A95, "effective_at": "2023-11-01 00:00:00", "price": 52.5}),
        serde_json::json!({"fuel_type_id": A95, "effective_at": "2024-01-08 00:00:00", "price": 51.0}),
        serde_json::json!({"fuel_type_id": DIESEL, "effective_at": "2023-12-01 00:00:00", "price": 100.0}),
        serde_json::json!({"fuel_type_id": DIESEL, "effective_at": "2024-01-01 00:00:00", "price": 90.0}),
        serde_json::json!({"fuel_type_id": DIESEL, "effective_at": "2024-01-10 00:00:00", "price": 95.0}),
    ];
    write_ndjson_and_register(conn, "fuel_prices", &prices);
}

fn register_dispensing(conn: &Connection) {
    let sales = vec![
        dispensing(1, DIESEL, 1, 10, "2024-01-01 08:00:00", 100.0),
        dispensing(2, A95, 2, 11, "2024-01-01 09:30:00", 40.5),
        dispensing(3, DIESEL, 1, 11, "2024-01-02 10:00:00", 50.0),
        dispensing(4, LPG, 3, 10, "2024-01-03 13:00:00", 30.0),
        dispensing(5, A95, 2, 10, "2024-01-08 12:00:00", 20.0),
        dispensing(6, DIESEL, 2, 10, "2024-01-10 07:00:00", 10.0),
        dispensing(7, A95, 1, 11, "2024-02-01 07:00:00", 15.0),
    ];
    write_ndjson_and_register(conn, "dispensing", &sales);
}

pub fn dispensing(
    id: i64,
    fuel: i64,
    pump: i64,
    staff: i64,
    at: &str,
    volume: f64,
) -> serde_json::Value {
    serde_json::json!({
        "dispensing_id": id,
        "fuel_type_id": fuel,
        "pump_id": pump,
        "staff_id": staff,
        "dispensed_at": at,
        "volume": volume
    })
}

fn register_pumps(conn: &Connection) {
    let pumps = vec![
        serde_json::json!({"pump_id": 1, "name": "Pump 1"}),
        serde_json::json!({"pump_id": 2, "name": "Pump 2"}),
        serde_json::json!({"pump_id": 3, "name": "Pump 3"}),
        serde_json::json!({"pump_id": 4, "name": "Pump 4"}),
    ];
    write_ndjson_and_register(conn, "pumps", &pumps);
}

fn register_tanks(conn: &Connection) {
    let tanks = vec![
        serde_json::json!({"tank_id": 1, "fuel_type_id": DIESEL, "capacity": 10000, "current_volume": 800}),
        serde_json::json!({"tank_id": 2, "fuel_type_id": A95, "capacity": 10000, "current_volume": 2500}),
        serde_json::json!({"tank_id": 3, "fuel_type_id": A95, "capacity": 20000, "current_volume": 12000}),
        serde_json::json!({"tank_id": 4, "fuel_type_id": LPG, "capacity": 5000, "current_volume": 4900}),
    ];
    write_ndjson_and_register(conn, "tanks", &tanks);
}

fn register_customers(conn: &Connection) {
    let customers = vec![
        serde_json::json!({"customer_id": 1, "name": "Agro LLC"}),
        serde_json::json!({"customer_id": 2, "name": "Bus Depot"}),
        serde_json::json!({"customer_id": 3, "name": "Taxi Co"}),
    ];
    write_ndjson_and_register(conn, "customers", &customers);
}

fn register_credit_sales(conn: &Connection) {
    let invoices = vec![
        serde_json::json!({"invoice_id": 100, "customer_id": 1, "amount": 5000.0, "paid_amount": 1000.0, "due_date": "2024-01-10"}),
        serde_json::json!({"invoice_id": 101, "customer_id": 1, "amount": 2000.0, "paid_amount": 0.0, "due_date": "2023-11-01"}),
        serde_json::json!({"invoice_id": 102, "customer_id": 2, "amount": 3000.0, "paid_amount": 3000.0, "due_date": "2023-12-01"}),
        serde_json::json!({"invoice_id": 103, "customer_id": 2, "amount": 1500.0, "paid_amount": 500.0, "due_date": "2024-02-20"}),
        serde_json::json!({"invoice_id": 104, "customer_id": 3, "amount": 800.0, "paid_amount": 0.0, "due_date": "2024-01-16"}),
    ];
    write_ndjson_and_register(conn, "credit_sales", &invoices);
}

/// Write a slice of JSON values as NDJSON to a temp file and register it
/// as a DuckDB table via `Connection::register_table_from_ndjson`.
pub fn write_ndjson_and_register(conn: &Connection, table_name: &str, rows: &[serde_json::Value]) {
    let mut file = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(file, "{}", serde_json::to_string(row).unwrap()).unwrap();
    }
    file.flush().unwrap();

    let path = file.path().to_str().unwrap();
    conn.register_table_from_ndjson(table_name, path).unwrap();
    // DuckDB copied the rows into an in-memory table, so the temp file can go.
}
