// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Cycle-boundary detection and the weekly reset transition.
//!
//! The recurring boundary is a fixed weekday and hour in a fixed reference
//! timezone (Wednesday 06:00, UTC+9). The engine never reads the wall clock:
//! every function takes `now` from the caller, which keeps the whole state
//! machine unit-testable against fixed instants.
//!
//! The transition is made idempotent by the history log's cycle-key
//! de-duplication rather than a lock; the persistence layer offers nothing
//! stronger than whole-document overwrite.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};

use crate::gold::{self, GoldError};
use crate::history;
use crate::types::{CommonContentState, Profile, WeeklyState};

// ---------------------------------------------------------------------------
// Boundary
// ---------------------------------------------------------------------------

/// Weekday of the recurring cycle boundary, in the reference timezone.
pub const RESET_WEEKDAY: Weekday = Weekday::Wed;

/// Hour of the recurring cycle boundary, in the reference timezone.
pub const RESET_HOUR: u32 = 6;

/// The reference timezone is UTC+9, which observes no DST.
const REFERENCE_OFFSET_SECS: i32 = 9 * 3600;

fn reference_zone() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECS).expect("static offset is valid")
}

fn boundary_on(date: NaiveDate) -> DateTime<Utc> {
    let naive = date
        .and_hms_opt(RESET_HOUR, 0, 0)
        .expect("static hour is valid");
    reference_zone()
        .from_local_datetime(&naive)
        .single()
        .expect("fixed offsets are unambiguous")
        .with_timezone(&Utc)
}

/// The most recent occurrence of the cycle boundary at or before `now`.
pub fn most_recent_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    let local = now.with_timezone(&reference_zone());
    let days_back = (local.weekday().num_days_from_monday() + 7
        - RESET_WEEKDAY.num_days_from_monday())
        % 7;
    let candidate = boundary_on(local.date_naive() - Duration::days(i64::from(days_back)));
    if candidate > now {
        // Boundary weekday, but before the boundary hour.
        candidate - Duration::days(7)
    } else {
        candidate
    }
}

/// Cycle key of an instant: its calendar date in the reference timezone.
pub fn cycle_key(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&reference_zone())
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

/// Key of the cycle containing `now` (the date of its starting boundary).
pub fn current_cycle_key(now: DateTime<Utc>) -> String {
    cycle_key(most_recent_reset(now))
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Read-only classification of a profile's reset stamp against `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// The stamp falls within the present cycle; nothing to do.
    Current,
    /// The stamp is absent or falls in a prior cycle; the transition is due.
    Stale,
}

/// Detection only -- never mutates anything.
pub fn detect_cycle_state(last_reset: Option<DateTime<Utc>>, now: DateTime<Utc>) -> CycleState {
    match last_reset {
        Some(stamp) if stamp >= most_recent_reset(now) => CycleState::Current,
        _ => CycleState::Stale,
    }
}

pub fn needs_weekly_reset(last_reset: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    detect_cycle_state(last_reset, now) == CycleState::Stale
}

/// Roll the profile over to a new cycle if the boundary has been crossed.
///
/// Returns whether the transition was applied. When it is:
/// 1. the outgoing cycle's totals are computed from the pre-reset checklist,
/// 2. a history record is appended unless one exists for that cycle key or
///    the total is zero,
/// 3. every tracked character gets a fresh [`WeeklyState`] (entries for
///    characters no longer tracked are dropped),
/// 4. the account-wide state is replaced, keyed to the new cycle,
/// 5. `last_weekly_reset` is stamped with `now`.
///
/// The caller persists the whole profile as a single logical update; on
/// persistence failure the in-memory copy must not be treated as rolled (keep
/// the dirty flag set and retry the full transition on next load).
pub fn apply_weekly_reset(
    profile: &mut Profile,
    catalog: &crate::catalog::RaidCatalog,
    now: DateTime<Utc>,
) -> Result<bool, GoldError> {
    if detect_cycle_state(profile.last_weekly_reset, now) == CycleState::Current {
        return Ok(false);
    }

    let outgoing_key = match profile.last_weekly_reset {
        Some(stamp) => cycle_key(stamp),
        None => current_cycle_key(now),
    };

    let totals = gold::account_totals(&profile.characters, &profile.weekly_checklist, catalog)?;
    if totals.total_gold.is_positive() {
        history::append_record(
            &mut profile.weekly_gold_history,
            history::build_record(&outgoing_key, &totals),
        );
    }

    profile.weekly_checklist = profile
        .characters
        .iter()
        .map(|c| (c.name.clone(), WeeklyState::empty()))
        .collect();
    profile.common_content = CommonContentState::for_cycle(current_cycle_key(now));
    profile.last_weekly_reset = Some(now);

    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    // 2026-08-19 is a Wednesday; its boundary (06:00 UTC+9) is
    // 2026-08-18T21:00:00Z.

    #[test]
    fn boundary_from_mid_cycle() {
        // Monday after the 8/19 boundary.
        let now = utc(2026, 8, 24, 12, 0);
        assert_eq!(most_recent_reset(now), utc(2026, 8, 18, 21, 0));
        assert_eq!(current_cycle_key(now), "2026-08-19");
    }

    #[test]
    fn boundary_instant_belongs_to_the_new_cycle() {
        let now = utc(2026, 8, 18, 21, 0);
        assert_eq!(most_recent_reset(now), now);
    }

    #[test]
    fn boundary_weekday_before_the_hour_is_previous_week() {
        // Wednesday 05:00 reference time = Tuesday 20:00 UTC.
        let now = utc(2026, 8, 18, 20, 0);
        assert_eq!(most_recent_reset(now), utc(2026, 8, 11, 21, 0));
        assert_eq!(current_cycle_key(now), "2026-08-12");
    }

    #[test]
    fn cycle_key_uses_reference_timezone_date() {
        // 2026-08-18T21:00Z is already the 19th in UTC+9.
        assert_eq!(cycle_key(utc(2026, 8, 18, 21, 0)), "2026-08-19");
        assert_eq!(cycle_key(utc(2026, 8, 18, 12, 0)), "2026-08-18");
    }

    #[test]
    fn detection_is_read_only_classification() {
        let before = utc(2026, 8, 18, 12, 0);
        let after = utc(2026, 8, 18, 21, 30);
        let now = utc(2026, 8, 20, 9, 0);

        assert_eq!(detect_cycle_state(Some(before), now), CycleState::Stale);
        assert_eq!(detect_cycle_state(Some(after), now), CycleState::Current);
        assert_eq!(detect_cycle_state(None, now), CycleState::Stale);
        assert!(needs_weekly_reset(Some(before), now));
        assert!(!needs_weekly_reset(Some(after), now));
    }

    #[test]
    fn reset_within_same_cycle_is_a_noop() {
        let mut profile = Profile {
            last_weekly_reset: Some(utc(2026, 8, 19, 3, 0)),
            ..Profile::default()
        };
        let catalog = crate::catalog::RaidCatalog::default();
        let rolled =
            apply_weekly_reset(&mut profile, &catalog, utc(2026, 8, 21, 10, 0)).expect("apply");
        assert!(!rolled);
        assert!(profile.weekly_gold_history.is_empty());
        assert_eq!(profile.last_weekly_reset, Some(utc(2026, 8, 19, 3, 0)));
    }

    #[test]
    fn missing_stamp_rolls_without_history() {
        let mut profile = Profile::default();
        let catalog = crate::catalog::RaidCatalog::default();
        let now = utc(2026, 8, 21, 10, 0);

        let rolled = apply_weekly_reset(&mut profile, &catalog, now).expect("apply");
        assert!(rolled);
        // Zero-total cycles are not recorded, but the stamp still advances.
        assert!(profile.weekly_gold_history.is_empty());
        assert_eq!(profile.last_weekly_reset, Some(now));
        assert_eq!(profile.common_content.date, "2026-08-19");
    }
}
