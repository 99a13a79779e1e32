// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Weekly Ledger Engine - Account-Wide Content Counter

//! Account-wide (cross-character) activity checks with optional weekly caps.
//!
//! Checks live in one flat map keyed `"{day}-{activity}"` on the
//! [`CommonContentState`]; the cap counts `true` entries for an activity
//! across all days.

use crate::types::{CommonContentState, DAYS_PER_CYCLE};

/// Composite key for one day-slot of one activity.
pub fn check_key(day: usize, activity: &str) -> String {
    format!("{day}-{activity}")
}

/// Number of `true` checks bearing this activity name, across all days.
pub fn checked_count(state: &CommonContentState, activity: &str) -> u32 {
    let suffix = format!("-{activity}");
    state
        .checks
        .iter()
        .filter(|(key, checked)| **checked && key.ends_with(&suffix))
        .count() as u32
}

/// Toggle one day-slot of an account-wide activity.
///
/// Unchecking is always permitted. Checking is refused -- state unchanged,
/// returns false -- when `max_checks` is set and the activity already has
/// that many checks across all days. There is no bump-the-oldest-out
/// behavior; the action is simply refused.
pub fn toggle_common_check(
    state: &mut CommonContentState,
    day: usize,
    activity: &str,
    max_checks: Option<u32>,
) -> bool {
    if day >= DAYS_PER_CYCLE {
        return false;
    }

    let key = check_key(day, activity);
    let currently = state.checks.get(&key).copied().unwrap_or(false);

    if currently {
        state.checks.insert(key, false);
        return true;
    }

    if let Some(cap) = max_checks {
        if checked_count(state, activity) >= cap {
            return false;
        }
    }

    state.checks.insert(key, true);
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CommonContentState {
        CommonContentState::for_cycle("2026-08-19")
    }

    #[test]
    fn counts_only_matching_true_entries() {
        let mut s = state();
        assert!(toggle_common_check(&mut s, 0, "Field Boss", None));
        assert!(toggle_common_check(&mut s, 2, "Field Boss", None));
        assert!(toggle_common_check(&mut s, 2, "Chaos Gate", None));
        // Checked then unchecked again: the false entry must not count.
        assert!(toggle_common_check(&mut s, 4, "Field Boss", None));
        assert!(toggle_common_check(&mut s, 4, "Field Boss", None));

        assert_eq!(checked_count(&s, "Field Boss"), 2);
        assert_eq!(checked_count(&s, "Chaos Gate"), 1);
        assert_eq!(checked_count(&s, "Ghost Ship"), 0);
    }

    #[test]
    fn cap_refuses_the_extra_check() {
        let mut s = state();
        for day in 0..3 {
            assert!(toggle_common_check(&mut s, day, "Field Boss", Some(3)));
        }
        let before = s.clone();

        // A 4th distinct day is refused and the state is untouched.
        assert!(!toggle_common_check(&mut s, 5, "Field Boss", Some(3)));
        assert_eq!(s, before);

        // Unchecking one of the 3 then re-checking a 4th day succeeds.
        assert!(toggle_common_check(&mut s, 1, "Field Boss", Some(3)));
        assert!(toggle_common_check(&mut s, 5, "Field Boss", Some(3)));
        assert_eq!(checked_count(&s, "Field Boss"), 3);
    }

    #[test]
    fn unchecking_is_always_permitted_at_cap() {
        let mut s = state();
        for day in 0..2 {
            assert!(toggle_common_check(&mut s, day, "Ghost Ship", Some(2)));
        }
        assert!(toggle_common_check(&mut s, 0, "Ghost Ship", Some(2)));
        assert_eq!(checked_count(&s, "Ghost Ship"), 1);
    }

    #[test]
    fn cap_is_per_activity_not_global() {
        let mut s = state();
        for day in 0..3 {
            assert!(toggle_common_check(&mut s, day, "Field Boss", Some(3)));
        }
        // Another activity is unaffected by Field Boss being at cap.
        assert!(toggle_common_check(&mut s, 0, "Chaos Gate", Some(3)));
    }

    #[test]
    fn out_of_range_day_is_refused() {
        let mut s = state();
        assert!(!toggle_common_check(&mut s, DAYS_PER_CYCLE, "Field Boss", None));
        assert!(s.checks.is_empty());
    }
}
