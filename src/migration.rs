// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Weekly Ledger Engine - Persisted-Record Migration

//! One-shot migrations applied when a persisted profile is loaded.
//!
//! Old records carried a single whole-character surcharge flag
//! (`excludeMoreGold`); newer records elect the surcharge per activity. On
//! load, a legacy flag with no per-activity map is expanded into per-activity
//! entries once, and the legacy field is dropped from new writes.

use crate::types::{Profile, WeeklyState};

/// Migrate one weekly state in place. Returns whether anything changed.
pub fn migrate_weekly_state(state: &mut WeeklyState) -> bool {
    let Some(legacy) = state.exclude_more_gold.take() else {
        return false;
    };

    // Only synthesize when the per-activity map never existed; a populated
    // map is newer data and wins.
    if legacy && state.raid_more_gold_exclude.is_empty() {
        for name in state.raids.keys() {
            state.raid_more_gold_exclude.insert(name.clone(), true);
        }
    }
    true
}

/// Migrate every character's state. Returns whether the profile changed and
/// therefore needs a save.
pub fn migrate_profile(profile: &mut Profile) -> bool {
    let mut changed = false;
    for state in profile.weekly_checklist.values_mut() {
        changed |= migrate_weekly_state(state);
    }
    changed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_true_expands_to_every_tracked_raid() {
        let mut state = WeeklyState::empty();
        state.raids.insert("Valtan Hard".to_string(), vec![false; 2]);
        state.raids.insert("Vykas Hard".to_string(), vec![false; 3]);
        state.exclude_more_gold = Some(true);

        assert!(migrate_weekly_state(&mut state));
        assert!(state.exclude_more_gold.is_none());
        assert!(state.surcharge_elected("Valtan Hard"));
        assert!(state.surcharge_elected("Vykas Hard"));
    }

    #[test]
    fn legacy_false_is_dropped_without_elections() {
        let mut state = WeeklyState::empty();
        state.raids.insert("Valtan Hard".to_string(), vec![false; 2]);
        state.exclude_more_gold = Some(false);

        assert!(migrate_weekly_state(&mut state));
        assert!(state.exclude_more_gold.is_none());
        assert!(state.raid_more_gold_exclude.is_empty());
    }

    #[test]
    fn per_activity_map_wins_over_legacy_flag() {
        let mut state = WeeklyState::empty();
        state.raids.insert("Valtan Hard".to_string(), vec![false; 2]);
        state.raids.insert("Vykas Hard".to_string(), vec![false; 3]);
        state
            .raid_more_gold_exclude
            .insert("Vykas Hard".to_string(), true);
        state.exclude_more_gold = Some(true);

        assert!(migrate_weekly_state(&mut state));
        // The existing map is newer data; nothing synthesized over it.
        assert!(!state.surcharge_elected("Valtan Hard"));
        assert!(state.surcharge_elected("Vykas Hard"));
    }

    #[test]
    fn already_migrated_state_reports_no_change() {
        let mut state = WeeklyState::empty();
        state.raids.insert("Valtan Hard".to_string(), vec![false; 2]);
        assert!(!migrate_weekly_state(&mut state));
    }

    #[test]
    fn profile_migration_flags_need_for_save() {
        let mut profile = Profile::default();
        let mut legacy = WeeklyState::empty();
        legacy.raids.insert("Argos".to_string(), vec![false; 3]);
        legacy.exclude_more_gold = Some(true);
        profile.weekly_checklist.insert("Main".to_string(), legacy);
        profile
            .weekly_checklist
            .insert("Alt".to_string(), WeeklyState::empty());

        assert!(migrate_profile(&mut profile));
        assert!(profile.weekly_checklist["Main"].surcharge_elected("Argos"));
        // Second pass is a no-op.
        assert!(!migrate_profile(&mut profile));
    }
}
