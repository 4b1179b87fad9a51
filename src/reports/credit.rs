//! Overdue credit sales with aging buckets.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{AgingBucket, CreditReport, CreditSale, CustomerExposure, OverdueInvoice};

/// Age every unpaid invoice past its due date as of `as_of`.
///
/// Settled invoices (nothing outstanding) and invoices not yet due are left
/// out. `as_of` is explicit so the same inputs always age the same way.
pub fn overdue_credit(sales: &[CreditSale], as_of: NaiveDate) -> CreditReport {
    let mut report = CreditReport::empty(as_of);
    let mut customers: BTreeMap<i64, CustomerExposure> = BTreeMap::new();

    for sale in sales {
        let outstanding = sale.amount - sale.paid_amount;
        if outstanding <= Decimal::ZERO {
            continue;
        }
        let days_overdue = (as_of - sale.due_date).num_days();
        let bucket = AgingBucket::for_days_overdue(days_overdue);
        if bucket == AgingBucket::Current {
            continue;
        }

        let exposure = customers
            .entry(sale.customer_id)
            .or_insert_with(|| CustomerExposure {
                customer_id: sale.customer_id,
                customer_name: sale.customer_name.clone(),
                invoices: 0,
                by_bucket: BTreeMap::new(),
                total_outstanding: Decimal::ZERO,
                oldest_days_overdue: 0,
            });
        exposure.invoices += 1;
        *exposure.by_bucket.entry(bucket).or_default() += outstanding;
        exposure.total_outstanding += outstanding;
        exposure.oldest_days_overdue = exposure.oldest_days_overdue.max(days_overdue);

        *report.by_bucket.entry(bucket).or_default() += outstanding;
        report.total_outstanding += outstanding;

        report.invoices.push(OverdueInvoice {
            invoice_id: sale.invoice_id,
            customer_id: sale.customer_id,
            customer_name: sale.customer_name.clone(),
            due_date: sale.due_date,
            days_overdue,
            outstanding,
            bucket,
        });
    }

    report.invoices.sort_by(|a, b| {
        b.days_overdue
            .cmp(&a.days_overdue)
            .then(a.invoice_id.cmp(&b.invoice_id))
    });

    report.customers = customers.into_values().collect();
    report.customers.sort_by(|a, b| {
        b.total_outstanding
            .cmp(&a.total_outstanding)
            .then_with(|| a.customer_name.cmp(&b.customer_name))
    });

    report
}
