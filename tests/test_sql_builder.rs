//! Unit tests for the SqlBuilder query construction.

use fuel_reports::SqlBuilder;

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("dispensing").build();
    assert_eq!(sql, "SELECT *\nFROM dispensing");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("pumps")
        .select(&["pump_id", "name"])
        .build();
    assert!(sql.starts_with("SELECT pump_id, name\n"));
}

#[test]
fn join_follows_from_clause() {
    let (sql, _) = SqlBuilder::new("tanks t")
        .join("LEFT JOIN fuel_types f ON f.fuel_type_id = t.fuel_type_id")
        .build();
    assert_eq!(
        sql,
        "SELECT *\nFROM tanks t\nLEFT JOIN fuel_types f ON f.fuel_type_id = t.fuel_type_id"
    );
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_equality_with_param() {
    let (sql, params) = SqlBuilder::new("customers")
        .where_eq("name", "Agro LLC")
        .build();
    assert!(sql.contains("WHERE name = ?"));
    assert_eq!(params, vec!["Agro LLC"]);
}

#[test]
fn where_opt_id_some_binds_a_cast_parameter() {
    let (sql, params) = SqlBuilder::new("dispensing")
        .where_opt_id("pump_id", Some(7))
        .build();
    assert!(sql.contains("WHERE pump_id = CAST(? AS BIGINT)"));
    assert_eq!(params, vec!["7"]);
}

#[test]
fn where_opt_id_none_adds_nothing() {
    let (sql, params) = SqlBuilder::new("dispensing")
        .where_opt_id("pump_id", None)
        .build();
    assert!(!sql.contains("WHERE"));
    assert!(!sql.contains("IS NULL"));
    assert!(params.is_empty());
}

#[test]
fn where_date_between_binds_both_bounds() {
    let (sql, params) = SqlBuilder::new("dispensing")
        .where_date_between("dispensed_at", "2024-01-01", "2024-01-31")
        .build();
    assert!(sql.contains(
        "CAST(dispensed_at AS DATE) BETWEEN CAST(? AS DATE) AND CAST(? AS DATE)"
    ));
    assert_eq!(params, vec!["2024-01-01", "2024-01-31"]);
}

#[test]
fn where_clause_passes_params_through() {
    let (sql, params) = SqlBuilder::new("credit_sales")
        .where_clause("amount > ?", &["100"])
        .build();
    assert!(sql.contains("WHERE amount > ?"));
    assert_eq!(params, vec!["100"]);
}

#[test]
fn multiple_conditions_are_anded_in_order() {
    let (sql, params) = SqlBuilder::new("dispensing")
        .where_date_between("dispensed_at", "2024-01-01", "2024-01-07")
        .where_opt_id("fuel_type_id", Some(2))
        .where_opt_id("staff_id", None)
        .where_opt_id("pump_id", Some(1))
        .build();
    assert!(sql.contains(
        "WHERE CAST(dispensed_at AS DATE) BETWEEN CAST(? AS DATE) AND CAST(? AS DATE) \
         AND fuel_type_id = CAST(? AS BIGINT) AND pump_id = CAST(? AS BIGINT)"
    ));
    assert_eq!(params, vec!["2024-01-01", "2024-01-07", "2", "1"]);
}

// ---------------------------------------------------------------------------
// GROUP BY / ORDER BY / LIMIT
// ---------------------------------------------------------------------------

#[test]
fn group_by_order_by_and_limit_are_appended_in_order() {
    let (sql, _) = SqlBuilder::new("dispensing")
        .select(&["pump_id", "SUM(volume) AS volume"])
        .group_by(&["pump_id"])
        .order_by(&["volume DESC", "pump_id ASC"])
        .limit(5)
        .build();
    assert_eq!(
        sql,
        "SELECT pump_id, SUM(volume) AS volume\nFROM dispensing\nGROUP BY pump_id\n\
         ORDER BY volume DESC, pump_id ASC\nLIMIT 5"
    );
}

#[test]
fn injection_payload_stays_in_params() {
    let payload = "'; DROP TABLE dispensing; --";
    let (sql, params) = SqlBuilder::new("customers")
        .where_eq("name", payload)
        .build();
    assert!(!sql.contains("DROP TABLE"));
    assert_eq!(params, vec![payload]);
}
