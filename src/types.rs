// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Weekly Ledger Engine - Type Definitions

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

// ─── Gold ────────────────────────────────────────────────────────────────────

/// Gold denomination backed by `rust_decimal::Decimal`.
///
/// All reward arithmetic goes through this newtype; raw floats never touch
/// currency values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gold(pub Decimal);

impl Gold {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn from_decimal(d: Decimal) -> Self {
        Self(d)
    }

    pub fn from_i64(n: i64) -> Self {
        Self(Decimal::from(n))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Add for Gold {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Gold {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Gold {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Gold {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Gold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g", self.0)
    }
}

// ─── Character ───────────────────────────────────────────────────────────────

/// Identity and stats snapshot for one tracked character.
///
/// Owned by the account and replaced wholesale on a manual refresh (an
/// external collaborator); the engine never partially mutates one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Unique key within the account.
    pub name: String,
    pub server: String,
    pub r#class: String,
    pub item_level: f64,
    pub combat_level: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    pub last_updated: DateTime<Utc>,
}

// ─── DailyContentState ───────────────────────────────────────────────────────

/// Number of day slots in one cycle, indexed from the cycle-boundary day.
pub const DAYS_PER_CYCLE: usize = 7;

/// Rest-pool units consumed by one completed day.
pub const REST_COST: u32 = 20;

/// Rest-pool granularity; gauges are always multiples of this.
pub const REST_STEP: u32 = 10;

/// External cap on the rest pool.
pub const REST_CAP: u32 = 100;

/// Per-character state of one daily-cadence activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyContentState {
    /// Completion flags for days 0..6, day 0 being the cycle-boundary day.
    pub checks: [bool; DAYS_PER_CYCLE],
    /// Resource pool before this cycle's consumption is replayed.
    /// Non-negative multiple of [`REST_STEP`], capped externally at [`REST_CAP`].
    pub rest_gauge: u32,
}

/// Selects one of the two daily-cadence fields on a [`WeeklyState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DailyContent {
    ChaosDungeon,
    GuardianRaid,
}

// ─── WeeklyState ─────────────────────────────────────────────────────────────

/// One character's completion record for the current cycle.
///
/// Created empty when a character is first tracked or when the cycle rolls,
/// mutated in place by user actions, read (never mutated) by the reset
/// transition when computing the outgoing snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyState {
    /// Activity-instance name -> per-stage completion flags. Array length is
    /// fixed at creation to the catalog entry's stage count.
    #[serde(default)]
    pub raids: BTreeMap<String, Vec<bool>>,
    /// Per-activity surcharge elections; absent means not elected.
    #[serde(default)]
    pub raid_more_gold_exclude: BTreeMap<String, bool>,
    /// Manually entered adjustment, added on top of raid gold.
    #[serde(default)]
    pub additional_gold: Gold,
    #[serde(default)]
    pub paradise: bool,
    #[serde(default)]
    pub sand_of_time: bool,
    #[serde(default)]
    pub chaos_dungeon: DailyContentState,
    #[serde(default)]
    pub guardian_raid: DailyContentState,
    /// Legacy whole-character surcharge flag from old persisted records.
    /// Superseded by `raid_more_gold_exclude`; dropped from new writes once
    /// migrated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_more_gold: Option<bool>,
}

impl WeeklyState {
    /// Fresh state for a newly tracked character or a just-rolled cycle.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn daily(&self, field: DailyContent) -> &DailyContentState {
        match field {
            DailyContent::ChaosDungeon => &self.chaos_dungeon,
            DailyContent::GuardianRaid => &self.guardian_raid,
        }
    }

    pub fn daily_mut(&mut self, field: DailyContent) -> &mut DailyContentState {
        match field {
            DailyContent::ChaosDungeon => &mut self.chaos_dungeon,
            DailyContent::GuardianRaid => &mut self.guardian_raid,
        }
    }

    /// Whether the given activity's surcharge election is set.
    pub fn surcharge_elected(&self, activity: &str) -> bool {
        self.raid_more_gold_exclude
            .get(activity)
            .copied()
            .unwrap_or(false)
    }
}

// ─── CommonContentState ──────────────────────────────────────────────────────

/// Account-wide (cross-character) weekly record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonContentState {
    /// Cycle-start key (`YYYY-MM-DD` in the reference timezone).
    pub date: String,
    /// Composite key `"{day}-{activity}"` -> checked flag.
    #[serde(default)]
    pub checks: BTreeMap<String, bool>,
}

impl CommonContentState {
    /// Empty state keyed to the given cycle.
    pub fn for_cycle(cycle_key: impl Into<String>) -> Self {
        Self {
            date: cycle_key.into(),
            checks: BTreeMap::new(),
        }
    }
}

// ─── WeeklyGoldRecord ────────────────────────────────────────────────────────

/// Immutable snapshot of one past cycle's totals. Created exactly once per
/// cycle transition; the history log rejects a second record for the same
/// `week_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoldRecord {
    pub week_start: String,
    pub week_label: String,
    pub total_gold: Gold,
    pub raid_gold: Gold,
    pub additional_gold: Gold,
    pub character_count: u32,
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// The full persisted profile document: everything the engine reads and
/// writes. Persistence itself is owned by the surrounding application, which
/// flushes the whole document last-writer-wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub characters: Vec<Character>,
    /// Character name -> weekly state.
    #[serde(default)]
    pub weekly_checklist: BTreeMap<String, WeeklyState>,
    #[serde(default)]
    pub common_content: CommonContentState,
    #[serde(default)]
    pub weekly_gold_history: Vec<WeeklyGoldRecord>,
    #[serde(default)]
    pub last_weekly_reset: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn gold_arithmetic() {
        let a = Gold::from_i64(1000);
        let b = Gold(dec!(300));
        assert_eq!(a - b, Gold(dec!(700)));
        assert_eq!(a + b, Gold(dec!(1300)));
        assert!(a.is_positive());
        assert!(Gold::zero().is_zero());
    }

    #[test]
    fn gold_sums_over_iterators() {
        let total: Gold = [Gold::from_i64(1), Gold::from_i64(2), Gold::from_i64(3)]
            .into_iter()
            .sum();
        assert_eq!(total, Gold::from_i64(6));
    }

    #[test]
    fn empty_weekly_state_shape() {
        let state = WeeklyState::empty();
        assert!(state.raids.is_empty());
        assert!(state.raid_more_gold_exclude.is_empty());
        assert!(state.additional_gold.is_zero());
        assert!(!state.paradise);
        assert!(!state.sand_of_time);
        assert_eq!(state.chaos_dungeon.checks, [false; DAYS_PER_CYCLE]);
        assert_eq!(state.chaos_dungeon.rest_gauge, 0);
        assert_eq!(state.guardian_raid, DailyContentState::default());
        assert!(state.exclude_more_gold.is_none());
    }

    #[test]
    fn weekly_state_serde_uses_wire_names() {
        let mut state = WeeklyState::empty();
        state.raids.insert("Valtan Hard".to_string(), vec![true, false]);
        state.additional_gold = Gold::from_i64(500);

        let json = serde_json::to_string(&state).expect("serialize");
        assert!(json.contains("\"raidMoreGoldExclude\""));
        assert!(json.contains("\"additionalGold\""));
        assert!(json.contains("\"chaosDungeon\""));
        // Legacy flag must not appear on new writes
        assert!(!json.contains("excludeMoreGold"));

        let back: WeeklyState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, state);
    }

    #[test]
    fn legacy_flag_still_deserializes() {
        let json = r#"{"raids":{},"excludeMoreGold":true}"#;
        let state: WeeklyState = serde_json::from_str(json).expect("deserialize");
        assert_eq!(state.exclude_more_gold, Some(true));
    }

    #[test]
    fn profile_tolerates_missing_sections() {
        let profile: Profile = serde_json::from_str("{}").expect("deserialize");
        assert!(profile.characters.is_empty());
        assert!(profile.weekly_checklist.is_empty());
        assert!(profile.weekly_gold_history.is_empty());
        assert!(profile.last_weekly_reset.is_none());
    }
}
