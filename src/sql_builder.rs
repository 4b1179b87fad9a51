//! SQL builder with parameterized query construction.
//!
//! Every caller-supplied value is bound through a `?` placeholder; only
//! column and table names, which come from this crate, are spliced in.
//!
//! # Example
//!
//! ```rust
//! use fuel_reports::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("dispensing d")
//!     .join("JOIN fuel_types f ON f.fuel_type_id = d.fuel_type_id")
//!     .where_date_between("d.dispensed_at", "2024-01-01", "2024-01-31")
//!     .where_opt_id("d.pump_id", Some(3))
//!     .where_opt_id("d.staff_id", None)
//!     .order_by(&["d.dispensed_at ASC"])
//!     .build();
//! assert!(sql.contains("d.pump_id = CAST(? AS BIGINT)"));
//! assert!(!sql.contains("staff_id"));
//! assert_eq!(params, vec!["2024-01-01", "2024-01-31", "3"]);
//! ```

use std::fmt::Display;

/// Builds parameterized SQL queries.
///
/// Methods return `&mut Self` for chaining.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    joins: Vec<String>,
    where_clauses: Vec<String>,
    params: Vec<String>,
    group_by_cols: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table or view (an alias may follow the name).
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            joins: Vec::new(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by_cols: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a JOIN clause, e.g. `"LEFT JOIN pumps p ON p.pump_id = d.pump_id"`.
    pub fn join(&mut self, clause: &str) -> &mut Self {
        self.joins.push(clause.to_string());
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    pub fn where_clause(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params.iter().map(|p| p.to_string()));
        self
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: impl Display) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.params.push(value.to_string());
        self
    }

    /// Add an integer-key equality only when a value is present.
    ///
    /// Generates: `{column} = CAST(? AS BIGINT)`. `None` means "no
    /// restriction", never "column IS NULL".
    pub fn where_opt_id(&mut self, column: &str, value: Option<i64>) -> &mut Self {
        if let Some(id) = value {
            self.where_clauses
                .push(format!("{} = CAST(? AS BIGINT)", column));
            self.params.push(id.to_string());
        }
        self
    }

    /// Restrict a timestamp or date column to an inclusive calendar-date range.
    ///
    /// Generates: `CAST({column} AS DATE) BETWEEN CAST(? AS DATE) AND CAST(? AS DATE)`
    pub fn where_date_between(&mut self, column: &str, from: &str, to: &str) -> &mut Self {
        self.where_clauses.push(format!(
            "CAST({} AS DATE) BETWEEN CAST(? AS DATE) AND CAST(? AS DATE)",
            column
        ));
        self.params.push(from.to_string());
        self.params.push(to.to_string());
        self
    }

    /// Add GROUP BY columns.
    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group_by_cols.extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Add ORDER BY clauses (e.g. `"effective_at ASC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols.extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut parts = vec![
            format!("SELECT {}", self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];

        parts.extend(self.joins.iter().cloned());

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.group_by_cols.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_by_cols.join(", ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }
}
