//! Period-based sales aggregation with lost-profit calculation.
//!
//! Records are bucketed by day, ISO week or calendar month and grouped by
//! fuel. Each group is priced at the entry active at its anchor instant and
//! compared with the entry that preceded it; a price drop turns the
//! difference on the sold volume into lost profit.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{MissingPricePolicy, PriceAnchor, ReportConfig};
use crate::models::{
    DateRange, DispensingRecord, Granularity, PeriodBucket, PeriodFuelAggregate, PeriodKey,
    PriceBook, PriceEntry, ReportFilter, ReportWarning, SalesReport, Totals,
};

/// Revenue foregone by selling `volume` at `current` instead of `previous`.
///
/// Zero unless the price went down.
pub fn lost_profit(volume: Decimal, previous: Decimal, current: Decimal) -> Decimal {
    if current < previous {
        volume * (previous - current)
    } else {
        Decimal::ZERO
    }
}

/// Aggregate with the default options (first-sale anchor, groups without a
/// price excluded).
pub fn aggregate(
    records: &[DispensingRecord],
    prices: &PriceBook,
    granularity: Granularity,
    date_range: DateRange,
    filter: &ReportFilter,
) -> SalesReport {
    Aggregator::default().aggregate(records, prices, granularity, date_range, filter)
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregator {
    pub price_anchor: PriceAnchor,
    pub missing_price: MissingPricePolicy,
}

struct Group {
    fuel_name: String,
    total_volume: Decimal,
    first_sale_at: NaiveDateTime,
    records: usize,
}

impl Aggregator {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            price_anchor: config.price_anchor,
            missing_price: config.missing_price,
        }
    }

    pub fn with_price_anchor(mut self, anchor: PriceAnchor) -> Self {
        self.price_anchor = anchor;
        self
    }

    pub fn with_missing_price(mut self, policy: MissingPricePolicy) -> Self {
        self.missing_price = policy;
        self
    }

    /// Bucket `records` by period and fuel, price each group and total it all.
    ///
    /// Records outside `date_range` or rejected by `filter` are ignored, so
    /// callers may pass an unfiltered set. Never fails: negative volumes and
    /// price gaps end up in [`SalesReport::warnings`].
    pub fn aggregate(
        &self,
        records: &[DispensingRecord],
        prices: &PriceBook,
        granularity: Granularity,
        date_range: DateRange,
        filter: &ReportFilter,
    ) -> SalesReport {
        let mut report = SalesReport::empty(granularity, date_range);
        let groups = group_records(records, granularity, &date_range, filter, &mut report.warnings);
        let group_count = groups.len();

        let mut buckets: BTreeMap<PeriodKey, Vec<PeriodFuelAggregate>> = BTreeMap::new();
        for ((period, fuel_type_id), group) in groups {
            if let Some(agg) = self.price_group(period, fuel_type_id, group, prices, &mut report.warnings) {
                buckets.entry(period).or_default().push(agg);
            }
        }

        for (period, mut fuels) in buckets {
            fuels.sort_by(|a, b| {
                a.fuel_name
                    .cmp(&b.fuel_name)
                    .then(a.fuel_type_id.cmp(&b.fuel_type_id))
            });
            let mut totals = Totals::default();
            for fuel in &fuels {
                totals.add(&Totals::from(fuel));
            }
            report.totals.add(&totals);
            report.buckets.push(PeriodBucket {
                period,
                fuels,
                totals,
            });
        }

        debug!(
            granularity = %granularity,
            groups = group_count,
            buckets = report.buckets.len(),
            "aggregated sales"
        );
        report
    }

    fn price_group(
        &self,
        period: PeriodKey,
        fuel_type_id: i64,
        group: Group,
        prices: &PriceBook,
        warnings: &mut Vec<ReportWarning>,
    ) -> Option<PeriodFuelAggregate> {
        let anchor = match self.price_anchor {
            PriceAnchor::FirstSale => group.first_sale_at,
            PriceAnchor::PeriodStart => period.start_at(),
        };

        let timeline = prices.timeline(fuel_type_id);
        let current: Option<&PriceEntry> = timeline.and_then(|t| t.active_at(anchor));

        let Some(current) = current else {
            warn!(
                period = %period,
                fuel_type_id,
                volume = %group.total_volume,
                "no price active for dispensed fuel"
            );
            warnings.push(ReportWarning::PriceGap {
                period: Some(period.label()),
                fuel_type_id,
                fuel_name: group.fuel_name.clone(),
                volume: group.total_volume,
            });
            return match self.missing_price {
                MissingPricePolicy::Exclude => None,
                MissingPricePolicy::ZeroPrice => Some(PeriodFuelAggregate {
                    period,
                    fuel_type_id,
                    fuel_name: group.fuel_name,
                    total_volume: group.total_volume,
                    current_price: Decimal::ZERO,
                    previous_price: Decimal::ZERO,
                    total_revenue: Decimal::ZERO,
                    lost_profit: Decimal::ZERO,
                    price_effective_at: None,
                    first_sale_at: group.first_sale_at,
                    records: group.records,
                }),
            };
        };

        // First-ever price has nothing to compare against.
        let previous_price = timeline
            .and_then(|t| t.previous(current))
            .map_or(current.price, |p| p.price);

        Some(PeriodFuelAggregate {
            period,
            fuel_type_id,
            total_revenue: group.total_volume * current.price,
            lost_profit: lost_profit(group.total_volume, previous_price, current.price),
            fuel_name: group.fuel_name,
            total_volume: group.total_volume,
            current_price: current.price,
            previous_price,
            price_effective_at: Some(current.effective_at),
            first_sale_at: group.first_sale_at,
            records: group.records,
        })
    }
}

fn group_records(
    records: &[DispensingRecord],
    granularity: Granularity,
    date_range: &DateRange,
    filter: &ReportFilter,
    warnings: &mut Vec<ReportWarning>,
) -> BTreeMap<(PeriodKey, i64), Group> {
    let mut groups: BTreeMap<(PeriodKey, i64), Group> = BTreeMap::new();

    for record in records {
        if !date_range.contains(record.dispensed_at) || !filter.matches(record) {
            continue;
        }
        if record.volume < Decimal::ZERO {
            warnings.push(ReportWarning::skipped(
                "dispensing",
                format!(
                    "negative volume {} for fuel {} at {}",
                    record.volume, record.fuel_type_id, record.dispensed_at
                ),
            ));
            continue;
        }

        let period = granularity.period_of(record.dispensed_at.date());
        let group = groups
            .entry((period, record.fuel_type_id))
            .or_insert_with(|| Group {
                fuel_name: record.fuel_name.clone(),
                total_volume: Decimal::ZERO,
                first_sale_at: record.dispensed_at,
                records: 0,
            });
        group.total_volume += record.volume;
        group.first_sale_at = group.first_sale_at.min(record.dispensed_at);
        group.records += 1;
    }

    groups
}
