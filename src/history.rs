// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Weekly Ledger Engine - Cycle History Log

//! Helpers for the append-only, cycle-key-deduplicated history of past
//! weekly totals.

use chrono::{Datelike, NaiveDate};

use crate::gold::AccountTotals;
use crate::types::WeeklyGoldRecord;

/// Display label for a cycle key: `"2026-08-19"` -> `"8/19"`. An unparseable
/// key is shown as-is rather than dropped.
pub fn week_label(cycle_key: &str) -> String {
    match NaiveDate::parse_from_str(cycle_key, "%Y-%m-%d") {
        Ok(date) => format!("{}/{}", date.month(), date.day()),
        Err(_) => cycle_key.to_string(),
    }
}

/// Build the immutable snapshot for one outgoing cycle.
pub fn build_record(cycle_key: &str, totals: &AccountTotals) -> WeeklyGoldRecord {
    WeeklyGoldRecord {
        week_start: cycle_key.to_string(),
        week_label: week_label(cycle_key),
        total_gold: totals.total_gold,
        raid_gold: totals.raid_gold,
        additional_gold: totals.additional_gold,
        character_count: totals.character_count,
    }
}

/// Append a record unless one already exists for the same `week_start`.
/// Returns whether the record was appended.
pub fn append_record(history: &mut Vec<WeeklyGoldRecord>, record: WeeklyGoldRecord) -> bool {
    if history.iter().any(|r| r.week_start == record.week_start) {
        return false;
    }
    history.push(record);
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gold;

    fn totals(raid: i64, additional: i64) -> AccountTotals {
        AccountTotals {
            raid_gold: Gold::from_i64(raid),
            additional_gold: Gold::from_i64(additional),
            total_gold: Gold::from_i64(raid + additional),
            character_count: 4,
        }
    }

    #[test]
    fn label_strips_zero_padding() {
        assert_eq!(week_label("2026-08-19"), "8/19");
        assert_eq!(week_label("2026-12-02"), "12/2");
    }

    #[test]
    fn label_falls_back_to_raw_key() {
        assert_eq!(week_label("not-a-date"), "not-a-date");
    }

    #[test]
    fn build_record_copies_the_split() {
        let record = build_record("2026-08-19", &totals(12000, 500));
        assert_eq!(record.week_start, "2026-08-19");
        assert_eq!(record.week_label, "8/19");
        assert_eq!(record.total_gold, Gold::from_i64(12500));
        assert_eq!(record.raid_gold, Gold::from_i64(12000));
        assert_eq!(record.additional_gold, Gold::from_i64(500));
        assert_eq!(record.character_count, 4);
    }

    #[test]
    fn duplicate_cycle_key_is_rejected() {
        let mut history = Vec::new();
        assert!(append_record(&mut history, build_record("2026-08-12", &totals(8000, 0))));
        assert!(!append_record(&mut history, build_record("2026-08-12", &totals(9999, 1))));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].total_gold, Gold::from_i64(8000));

        // A different cycle key is fine.
        assert!(append_record(&mut history, build_record("2026-08-19", &totals(7000, 0))));
        assert_eq!(history.len(), 2);
    }
}
