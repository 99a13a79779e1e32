// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Weekly Ledger Engine - Weekly Checklist Mutators

//! Mutators over the per-character weekly checklist.
//!
//! All of these are pure in-memory transformations: no I/O, no clock. The
//! caller (the engine) owns the single writable checklist and marks the
//! profile dirty after a successful mutation. A mutator targeting a character
//! with no state yet lazily materializes an empty [`WeeklyState`]; whether
//! the name is a *valid* character is the caller's concern (the character
//! list is the source of truth).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::RaidEntry;
use crate::types::{DailyContent, Gold, WeeklyState, DAYS_PER_CYCLE};

/// Character name -> weekly state, as persisted on the profile.
pub type WeeklyChecklist = BTreeMap<String, WeeklyState>;

/// Selects one of the level-gated single-toggle activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SingleContent {
    Paradise,
    SandOfTime,
}

fn state_mut<'a>(checklist: &'a mut WeeklyChecklist, character: &str) -> &'a mut WeeklyState {
    checklist
        .entry(character.to_string())
        .or_insert_with(WeeklyState::empty)
}

// ---------------------------------------------------------------------------
// Raid mutators
// ---------------------------------------------------------------------------

/// All-or-nothing toggle of an activity instance, never partial.
///
/// A fully checked instance becomes fully unchecked; anything else (missing,
/// partially checked, or a stale array length after a catalog change) becomes
/// fully checked at `stage_count` stages.
pub fn toggle_raid(
    checklist: &mut WeeklyChecklist,
    character: &str,
    activity: &str,
    stage_count: usize,
) {
    let state = state_mut(checklist, character);
    let fully_checked = state
        .raids
        .get(activity)
        .map(|stages| !stages.is_empty() && stages.iter().all(|s| *s))
        .unwrap_or(false);
    state
        .raids
        .insert(activity.to_string(), vec![!fully_checked; stage_count]);
}

/// Swap an activity instance for another difficulty of the same encounter.
///
/// Completion carries over all-or-nothing: the old instance's "fully checked"
/// reading is broadcast uniformly over the new stage count. The surcharge
/// election follows the instance to its new name.
pub fn change_raid_difficulty(
    checklist: &mut WeeklyChecklist,
    character: &str,
    old_activity: &str,
    new_entry: &RaidEntry,
) {
    let state = state_mut(checklist, character);
    let was_complete = state
        .raids
        .remove(old_activity)
        .map(|stages| !stages.is_empty() && stages.iter().all(|s| *s))
        .unwrap_or(false);
    state
        .raids
        .insert(new_entry.name.clone(), vec![was_complete; new_entry.stage_count()]);

    if let Some(elected) = state.raid_more_gold_exclude.remove(old_activity) {
        state
            .raid_more_gold_exclude
            .insert(new_entry.name.clone(), elected);
    }
}

/// Flip the per-activity surcharge election; absent counts as false.
pub fn toggle_surcharge(checklist: &mut WeeklyChecklist, character: &str, activity: &str) {
    let state = state_mut(checklist, character);
    let elected = state.surcharge_elected(activity);
    state
        .raid_more_gold_exclude
        .insert(activity.to_string(), !elected);
}

// ---------------------------------------------------------------------------
// Daily-cadence mutators
// ---------------------------------------------------------------------------

/// Flip exactly one day's check for a daily-cadence field. The rest gauge is
/// untouched. Returns false (state unchanged) for an out-of-range day index.
pub fn toggle_daily_check(
    checklist: &mut WeeklyChecklist,
    character: &str,
    field: DailyContent,
    day: usize,
) -> bool {
    if day >= DAYS_PER_CYCLE {
        return false;
    }
    let daily = state_mut(checklist, character).daily_mut(field);
    daily.checks[day] = !daily.checks[day];
    true
}

/// Overwrite the rest gauge directly (manual correction path). The value must
/// already be a non-negative multiple of 10; clamping is the caller's job.
pub fn set_rest_gauge(
    checklist: &mut WeeklyChecklist,
    character: &str,
    field: DailyContent,
    value: u32,
) {
    state_mut(checklist, character).daily_mut(field).rest_gauge = value;
}

// ---------------------------------------------------------------------------
// Simple toggles and adjustments
// ---------------------------------------------------------------------------

pub fn toggle_single(checklist: &mut WeeklyChecklist, character: &str, field: SingleContent) {
    let state = state_mut(checklist, character);
    match field {
        SingleContent::Paradise => state.paradise = !state.paradise,
        SingleContent::SandOfTime => state.sand_of_time = !state.sand_of_time,
    }
}

/// Overwrite the manually entered gold adjustment.
pub fn set_additional_gold(checklist: &mut WeeklyChecklist, character: &str, value: Gold) {
    state_mut(checklist, character).additional_gold = value;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
