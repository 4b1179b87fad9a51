//! Per-pump throughput and revenue.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{
    DateRange, DispensingRecord, PriceBook, PumpPerformance, PumpReport, ReportFilter,
    ReportWarning,
};

#[derive(Default)]
struct PumpTally {
    transactions: usize,
    volume: Decimal,
    revenue: Decimal,
}

/// Summarize dispensing per pump.
///
/// Every pump named in `pump_names` is listed, idle ones with zeros, unless
/// `filter.pump_id` selects a single pump. Each record is priced at the entry
/// active when it was dispensed.
pub fn pump_performance(
    records: &[DispensingRecord],
    prices: &PriceBook,
    pump_names: &BTreeMap<i64, String>,
    date_range: DateRange,
    filter: &ReportFilter,
) -> PumpReport {
    let mut report = PumpReport::empty(date_range);
    let mut tallies: BTreeMap<i64, PumpTally> = pump_names
        .keys()
        .filter(|id| filter.pump_id.map_or(true, |p| p == **id))
        .map(|id| (*id, PumpTally::default()))
        .collect();
    let mut unassigned = 0usize;
    let mut gaps: BTreeMap<i64, (String, Decimal)> = BTreeMap::new();

    for record in records {
        if !date_range.contains(record.dispensed_at)
            || !filter.matches(record)
            || record.volume < Decimal::ZERO
        {
            continue;
        }
        let Some(pump_id) = record.pump_id else {
            unassigned += 1;
            continue;
        };

        let tally = tallies.entry(pump_id).or_default();
        tally.transactions += 1;
        tally.volume += record.volume;
        match prices.active_at(record.fuel_type_id, record.dispensed_at) {
            Some(entry) => tally.revenue += record.volume * entry.price,
            None => {
                gaps.entry(record.fuel_type_id)
                    .or_insert_with(|| (record.fuel_name.clone(), Decimal::ZERO))
                    .1 += record.volume;
            }
        }
    }

    if unassigned > 0 {
        warn!(records = unassigned, "dispensing records without a pump");
        report.warnings.push(ReportWarning::skipped(
            "dispensing",
            format!("{} records have no pump", unassigned),
        ));
    }
    for (fuel_type_id, (fuel_name, volume)) in gaps {
        warn!(fuel_type_id, volume = %volume, "pump volume without an active price");
        report.warnings.push(ReportWarning::PriceGap {
            period: None,
            fuel_type_id,
            fuel_name,
            volume,
        });
    }

    report.total_transactions = tallies.values().map(|t| t.transactions).sum();
    report.total_volume = tallies.values().map(|t| t.volume).sum();
    report.total_revenue = tallies.values().map(|t| t.revenue).sum();

    let station_volume = report.total_volume;
    report.pumps = tallies
        .into_iter()
        .map(|(pump_id, tally)| PumpPerformance {
            pump_id,
            pump_name: pump_names
                .get(&pump_id)
                .cloned()
                .unwrap_or_else(|| format!("Pump #{}", pump_id)),
            transactions: tally.transactions,
            average_volume: if tally.transactions == 0 {
                Decimal::ZERO
            } else {
                (tally.volume / Decimal::from(tally.transactions)).round_dp(2)
            },
            volume_share: if station_volume.is_zero() {
                Decimal::ZERO
            } else {
                (tally.volume / station_volume * Decimal::ONE_HUNDRED).round_dp(2)
            },
            total_volume: tally.volume,
            total_revenue: tally.revenue,
        })
        .collect();

    report.pumps.sort_by(|a, b| {
        b.total_volume
            .cmp(&a.total_volume)
            .then(a.pump_id.cmp(&b.pump_id))
    });
    report
}
