//! Overdue credit queries against the `credit_sales` and `customers` views.

use chrono::NaiveDate;

use crate::connection::Connection;
use crate::error::Result;
use crate::models::{CreditReport, CreditSale};
use crate::queries::rows::{self, rows_or_warn, Fetched, Row};
use crate::reports;
use crate::sql_builder::SqlBuilder;

/// Query interface for sales on account.
pub struct CreditQuery<'a> {
    conn: &'a Connection,
}

impl<'a> CreditQuery<'a> {
    /// Create a new `CreditQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Credit invoices with a balance still owed, optionally for one customer.
    pub fn fetch_open_invoices(&self, customer_id: Option<i64>) -> Result<Fetched<CreditSale>> {
        self.conn.ensure_views(&["credit_sales", "customers"])?;

        let mut qb = SqlBuilder::new("credit_sales s");
        qb.select(&[
            "s.invoice_id",
            "s.customer_id",
            "c.name AS customer_name",
            "CAST(s.amount AS VARCHAR) AS amount",
            "CAST(s.paid_amount AS VARCHAR) AS paid_amount",
            "CAST(s.due_date AS VARCHAR) AS due_date",
        ])
        .join("LEFT JOIN customers c ON c.customer_id = s.customer_id")
        .where_clause("s.amount > COALESCE(s.paid_amount, 0)", &[])
        .where_opt_id("s.customer_id", customer_id)
        .order_by(&["s.due_date ASC", "s.invoice_id ASC"]);

        let (sql, params) = qb.build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(Fetched::collect("credit_sales", rows, credit_sale))
    }

    /// Aging report as of `as_of`, or today's local date when `None`.
    pub fn overdue(&self, as_of: Option<NaiveDate>, customer_id: Option<i64>) -> CreditReport {
        let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
        let mut warnings = Vec::new();

        let Some(sales) = rows_or_warn(
            "credit_sales",
            self.fetch_open_invoices(customer_id),
            &mut warnings,
        ) else {
            let mut report = CreditReport::empty(as_of);
            report.warnings = warnings;
            return report;
        };

        let mut report = reports::overdue_credit(&sales, as_of);
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report
    }
}

fn credit_sale(row: &Row) -> std::result::Result<CreditSale, String> {
    let customer_id = rows::int(row, "customer_id")?;
    Ok(CreditSale {
        invoice_id: rows::int(row, "invoice_id")?,
        customer_id,
        customer_name: rows::opt_string(row, "customer_name")
            .unwrap_or_else(|| format!("Customer #{}", customer_id)),
        amount: rows::decimal(row, "amount")?,
        paid_amount: rows::opt_decimal(row, "paid_amount")?.unwrap_or_default(),
        due_date: rows::date(row, "due_date")?,
    })
}
