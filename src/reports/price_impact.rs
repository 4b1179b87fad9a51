//! Effect of each price change on sales while the new price was in force.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{
    DateRange, DispensingRecord, PriceBook, PriceChange, PriceImpactReport, ReportFilter,
};
use crate::reports::sales::lost_profit;

/// One row per price entry that took effect inside `date_range`.
///
/// `fuel_names` supplies display names; fuels missing from it are shown as
/// `Fuel #<id>`. Only `filter.fuel_type_id` narrows the fuels listed; the
/// staff and pump restrictions narrow the volume counted.
pub fn price_impact(
    records: &[DispensingRecord],
    prices: &PriceBook,
    fuel_names: &BTreeMap<i64, String>,
    date_range: DateRange,
    filter: &ReportFilter,
) -> PriceImpactReport {
    let mut report = PriceImpactReport::empty(date_range);
    let range_start = date_range.start();
    let range_end = date_range.end_exclusive();

    for (fuel_type_id, timeline) in prices.timelines() {
        if filter.fuel_type_id.is_some_and(|id| id != fuel_type_id) {
            continue;
        }

        let sales: Vec<&DispensingRecord> = records
            .iter()
            .filter(|r| {
                r.fuel_type_id == fuel_type_id
                    && date_range.contains(r.dispensed_at)
                    && filter.matches(r)
                    && r.volume >= Decimal::ZERO
            })
            .collect();

        for entry in timeline.entries() {
            if !date_range.contains(entry.effective_at) {
                continue;
            }
            // An entry replaced at the same instant never applied.
            let applied = timeline
                .active_at(entry.effective_at)
                .is_some_and(|active| std::ptr::eq(active, entry));
            if !applied {
                continue;
            }

            let previous_price = timeline.previous(entry).map_or(entry.price, |p| p.price);
            let superseded_at = timeline.next(entry).map(|n| n.effective_at);
            let window_start = entry.effective_at.max(range_start);
            let window_end = superseded_at.map_or(range_end, |at| at.min(range_end));

            let volume: Decimal = sales
                .iter()
                .filter(|r| r.dispensed_at >= window_start && r.dispensed_at < window_end)
                .map(|r| r.volume)
                .sum();

            let delta = entry.price - previous_price;
            let delta_percent = if previous_price.is_zero() {
                Decimal::ZERO
            } else {
                (delta / previous_price * Decimal::ONE_HUNDRED).round_dp(2)
            };

            let change = PriceChange {
                fuel_type_id,
                fuel_name: fuel_names
                    .get(&fuel_type_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Fuel #{}", fuel_type_id)),
                effective_at: entry.effective_at,
                superseded_at,
                previous_price,
                new_price: entry.price,
                delta,
                delta_percent,
                volume,
                revenue: volume * entry.price,
                lost_profit: lost_profit(volume, previous_price, entry.price),
            };
            report.total_revenue += change.revenue;
            report.total_lost_profit += change.lost_profit;
            report.changes.push(change);
        }
    }

    report.changes.sort_by(|a, b| {
        a.fuel_name
            .cmp(&b.fuel_name)
            .then(a.fuel_type_id.cmp(&b.fuel_type_id))
            .then(a.effective_at.cmp(&b.effective_at))
    });
    report
}
