//! Price timeline lookups.

use chrono::NaiveDateTime;
use fuel_reports::models::{PriceBook, PriceEntry, PriceTimeline};
use rust_decimal_macros::dec;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn entry(fuel_type_id: i64, effective_at: &str, price: rust_decimal::Decimal) -> PriceEntry {
    PriceEntry {
        fuel_type_id,
        effective_at: at(effective_at),
        price,
    }
}

fn diesel() -> PriceTimeline {
    // Deliberately out of order.
    PriceTimeline::new(vec![
        entry(2, "2024-01-10 00:00:00", dec!(95)),
        entry(2, "2023-12-01 00:00:00", dec!(100)),
        entry(2, "2024-01-01 00:00:00", dec!(90)),
    ])
}

#[test]
fn entries_are_sorted_by_effective_instant() {
    let timeline = diesel();
    let prices: Vec<_> = timeline.entries().iter().map(|e| e.price).collect();
    assert_eq!(prices, vec![dec!(100), dec!(90), dec!(95)]);
}

#[test]
fn active_at_picks_latest_entry_not_after_instant() {
    let timeline = diesel();

    assert!(timeline.active_at(at("2023-11-30 23:59:59")).is_none());
    assert_eq!(timeline.active_at(at("2023-12-01 00:00:00")).unwrap().price, dec!(100));
    assert_eq!(timeline.active_at(at("2024-01-09 23:59:59")).unwrap().price, dec!(90));
    assert_eq!(timeline.active_at(at("2024-06-01 00:00:00")).unwrap().price, dec!(95));
}

#[test]
fn previous_and_next_skip_the_entry_itself() {
    let timeline = diesel();
    let cut = timeline.active_at(at("2024-01-05 12:00:00")).unwrap();

    assert_eq!(timeline.previous(cut).unwrap().price, dec!(100));
    assert_eq!(timeline.next(cut).unwrap().price, dec!(95));

    let first = &timeline.entries()[0];
    assert!(timeline.previous(first).is_none());
    let last = &timeline.entries()[2];
    assert!(timeline.next(last).is_none());
}

#[test]
fn book_keeps_fuels_apart() {
    let book = PriceBook::new(vec![
        entry(1, "2024-01-01 00:00:00", dec!(52.5)),
        entry(2, "2024-01-01 00:00:00", dec!(100)),
        entry(1, "2024-01-08 00:00:00", dec!(51)),
    ]);

    assert_eq!(book.timeline(1).unwrap().entries().len(), 2);
    assert_eq!(book.active_at(2, at("2024-01-09 00:00:00")).unwrap().price, dec!(100));
    assert!(book.active_at(3, at("2024-01-09 00:00:00")).is_none());

    let ids: Vec<i64> = book.timelines().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn empty_book_has_no_prices() {
    let book = PriceBook::new(Vec::new());
    assert!(book.is_empty());
    assert!(book.timeline(1).is_none());
}

#[test]
fn deserialized_timeline_is_sorted() {
    let json = serde_json::json!([
        {"fuel_type_id": 2, "effective_at": "2024-01-10T00:00:00", "price": "95"},
        {"fuel_type_id": 2, "effective_at": "2023-12-01T00:00:00", "price": "100"},
        {"fuel_type_id": 2, "effective_at": "2024-01-01T00:00:00", "price": "90"},
    ]);

    let timeline: PriceTimeline = serde_json::from_value(json).unwrap();

    assert_eq!(timeline, diesel());
    let active = timeline.active_at(at("2024-01-05 12:00:00")).unwrap();
    assert_eq!(active.price, dec!(90));

    let round_trip: PriceTimeline =
        serde_json::from_value(serde_json::to_value(&timeline).unwrap()).unwrap();
    assert_eq!(round_trip, timeline);
}
