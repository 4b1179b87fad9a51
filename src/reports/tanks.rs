//! Tank fill levels and per-fuel stock.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::TankThresholds;
use crate::models::{FuelStock, ReportWarning, Tank, TankLevel, TankReport, TankStatus};

/// Percentage of `capacity` held by `stored`, rounded to 2 places.
///
/// A tank without capacity reads as empty.
pub fn fill_percent(stored: Decimal, capacity: Decimal) -> Decimal {
    if capacity <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (stored / capacity * Decimal::ONE_HUNDRED).round_dp(2)
}

pub fn classify(fill_percent: Decimal, thresholds: &TankThresholds) -> TankStatus {
    if fill_percent <= thresholds.critical_percent {
        TankStatus::Critical
    } else if fill_percent <= thresholds.low_percent {
        TankStatus::Low
    } else if fill_percent >= thresholds.full_percent {
        TankStatus::Full
    } else {
        TankStatus::Normal
    }
}

pub fn tank_levels(tanks: &[Tank], thresholds: &TankThresholds) -> TankReport {
    let mut report = TankReport::default();
    let mut stocks: BTreeMap<i64, FuelStock> = BTreeMap::new();

    for tank in tanks {
        if tank.capacity < Decimal::ZERO || tank.current_volume < Decimal::ZERO {
            report.warnings.push(ReportWarning::skipped(
                "tanks",
                format!(
                    "tank {} has negative capacity or volume ({} / {})",
                    tank.tank_id, tank.current_volume, tank.capacity
                ),
            ));
            continue;
        }

        let fill = fill_percent(tank.current_volume, tank.capacity);
        let free_space = (tank.capacity - tank.current_volume).max(Decimal::ZERO);
        report.tanks.push(TankLevel {
            tank_id: tank.tank_id,
            fuel_type_id: tank.fuel_type_id,
            fuel_name: tank.fuel_name.clone(),
            capacity: tank.capacity,
            current_volume: tank.current_volume,
            free_space,
            fill_percent: fill,
            status: classify(fill, thresholds),
        });

        let stock = stocks.entry(tank.fuel_type_id).or_insert_with(|| FuelStock {
            fuel_type_id: tank.fuel_type_id,
            fuel_name: tank.fuel_name.clone(),
            tanks: 0,
            capacity: Decimal::ZERO,
            stored: Decimal::ZERO,
            free_space: Decimal::ZERO,
            fill_percent: Decimal::ZERO,
        });
        stock.tanks += 1;
        stock.capacity += tank.capacity;
        stock.stored += tank.current_volume;
        stock.free_space += free_space;
    }

    report.tanks.sort_by(|a, b| {
        a.fuel_name
            .cmp(&b.fuel_name)
            .then(a.tank_id.cmp(&b.tank_id))
    });

    report.fuels = stocks
        .into_values()
        .map(|mut stock| {
            stock.fill_percent = fill_percent(stock.stored, stock.capacity);
            stock
        })
        .collect();
    report.fuels.sort_by(|a, b| {
        a.fuel_name
            .cmp(&b.fuel_name)
            .then(a.fuel_type_id.cmp(&b.fuel_type_id))
    });

    report
}
