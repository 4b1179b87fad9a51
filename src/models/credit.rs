use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::warning::ReportWarning;

// ---------------------------------------------------------------------------
// CreditSale - invoice sold on account (source row)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSale {
    pub invoice_id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub due_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// AgingBucket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    Current,
    Days1To30,
    Days31To60,
    Days61To90,
    Over90,
}

impl AgingBucket {
    pub fn for_days_overdue(days: i64) -> Self {
        match days {
            i64::MIN..=0 => Self::Current,
            1..=30 => Self::Days1To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Days1To30 => "1-30",
            Self::Days31To60 => "31-60",
            Self::Days61To90 => "61-90",
            Self::Over90 => "90+",
        }
    }
}

// ---------------------------------------------------------------------------
// OverdueInvoice / CustomerExposure / CreditReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueInvoice {
    pub invoice_id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub due_date: NaiveDate,
    pub days_overdue: i64,
    pub outstanding: Decimal,
    pub bucket: AgingBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerExposure {
    pub customer_id: i64,
    pub customer_name: String,
    pub invoices: usize,
    pub by_bucket: BTreeMap<AgingBucket, Decimal>,
    pub total_outstanding: Decimal,
    pub oldest_days_overdue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditReport {
    pub as_of: NaiveDate,
    /// Ordered by days overdue descending, then invoice id.
    pub invoices: Vec<OverdueInvoice>,
    /// Ordered by total outstanding descending, then customer name.
    pub customers: Vec<CustomerExposure>,
    pub by_bucket: BTreeMap<AgingBucket, Decimal>,
    pub total_outstanding: Decimal,
    pub warnings: Vec<ReportWarning>,
}

impl CreditReport {
    pub fn empty(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            invoices: Vec::new(),
            customers: Vec::new(),
            by_bucket: BTreeMap::new(),
            total_outstanding: Decimal::ZERO,
            warnings: Vec::new(),
        }
    }
}
