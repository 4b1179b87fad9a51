use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceEntry - a selling price effective from a given instant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub fuel_type_id: i64,
    pub effective_at: NaiveDateTime,
    pub price: Decimal,
}

// ---------------------------------------------------------------------------
// PriceTimeline - one fuel's price history, sorted by effective instant
// ---------------------------------------------------------------------------

/// Price history of a single fuel type.
///
/// Entries are kept sorted by `effective_at`; entries sharing an instant keep
/// their insertion order, and the last of them wins lookups at that instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PriceEntry>", into = "Vec<PriceEntry>")]
pub struct PriceTimeline {
    entries: Vec<PriceEntry>,
}

impl From<Vec<PriceEntry>> for PriceTimeline {
    fn from(entries: Vec<PriceEntry>) -> Self {
        Self::new(entries)
    }
}

impl From<PriceTimeline> for Vec<PriceEntry> {
    fn from(timeline: PriceTimeline) -> Self {
        timeline.entries
    }
}

impl PriceTimeline {
    pub fn new(mut entries: Vec<PriceEntry>) -> Self {
        entries.sort_by_key(|e| e.effective_at);
        Self { entries }
    }

    pub fn entries(&self) -> &[PriceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry active at `at`: the latest one with `effective_at <= at`.
    pub fn active_at(&self, at: NaiveDateTime) -> Option<&PriceEntry> {
        let idx = self.entries.partition_point(|e| e.effective_at <= at);
        idx.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// The latest entry effective strictly before `entry` took effect.
    pub fn previous(&self, entry: &PriceEntry) -> Option<&PriceEntry> {
        let idx = self
            .entries
            .partition_point(|e| e.effective_at < entry.effective_at);
        idx.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// The first entry effective strictly after `entry`.
    pub fn next(&self, entry: &PriceEntry) -> Option<&PriceEntry> {
        let idx = self
            .entries
            .partition_point(|e| e.effective_at <= entry.effective_at);
        self.entries.get(idx)
    }
}

// ---------------------------------------------------------------------------
// PriceBook - timelines for every fuel type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBook {
    timelines: BTreeMap<i64, PriceTimeline>,
}

impl PriceBook {
    /// Group entries by fuel type and sort each timeline.
    pub fn new(entries: impl IntoIterator<Item = PriceEntry>) -> Self {
        let mut grouped: BTreeMap<i64, Vec<PriceEntry>> = BTreeMap::new();
        for entry in entries {
            grouped.entry(entry.fuel_type_id).or_default().push(entry);
        }
        Self {
            timelines: grouped
                .into_iter()
                .map(|(id, entries)| (id, PriceTimeline::new(entries)))
                .collect(),
        }
    }

    pub fn timeline(&self, fuel_type_id: i64) -> Option<&PriceTimeline> {
        self.timelines.get(&fuel_type_id)
    }

    pub fn timelines(&self) -> impl Iterator<Item = (i64, &PriceTimeline)> {
        self.timelines.iter().map(|(id, t)| (*id, t))
    }

    /// Price entry for `fuel_type_id` active at `at`.
    pub fn active_at(&self, fuel_type_id: i64, at: NaiveDateTime) -> Option<&PriceEntry> {
        self.timeline(fuel_type_id).and_then(|t| t.active_at(at))
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }
}
