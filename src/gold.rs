// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Gold aggregation formulas.
//!
//! Every "projected total" surfaced anywhere must come from these functions;
//! the formula is never re-derived ad hoc, so it cannot drift between
//! surfaces. All functions here are pure and stateless.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{RaidCatalog, RaidStage};
use crate::types::{Character, Gold, WeeklyState};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Data-shape violations. These indicate a missed catalog-migration step
/// (a completion array that no longer matches its catalog entry), so they
/// fail fast rather than being coerced.
#[derive(Debug, thiserror::Error)]
pub enum GoldError {
    #[error("stage count mismatch for {activity:?}: catalog has {expected}, state has {actual}")]
    StageCountMismatch {
        activity: String,
        expected: usize,
        actual: usize,
    },
}

// ---------------------------------------------------------------------------
// Per-activity
// ---------------------------------------------------------------------------

/// Gold earned from one activity instance.
///
/// Each checked stage contributes its base reward, or base minus the stage's
/// surcharge when the surcharge is elected. (Electing the surcharge reduces
/// the payout -- the observed arithmetic of the persisted records, kept even
/// though the field naming suggests otherwise.)
///
/// The two slices must be the same length; a mismatch is a programmer error
/// surfaced as [`GoldError::StageCountMismatch`].
pub fn activity_gold(
    activity: &str,
    stages: &[RaidStage],
    completion: &[bool],
    surcharge_elected: bool,
) -> Result<Gold, GoldError> {
    if stages.len() != completion.len() {
        return Err(GoldError::StageCountMismatch {
            activity: activity.to_string(),
            expected: stages.len(),
            actual: completion.len(),
        });
    }

    let total = stages
        .iter()
        .zip(completion)
        .filter(|(_, done)| **done)
        .map(|(stage, _)| {
            if surcharge_elected {
                stage.gold - stage.surcharge
            } else {
                stage.gold
            }
        })
        .sum();

    Ok(total)
}

// ---------------------------------------------------------------------------
// Per-character
// ---------------------------------------------------------------------------

/// Raid gold for one character: every `raids` entry whose name resolves in
/// the catalog. Unresolved names (a removed catalog entry) are skipped, not
/// errored.
pub fn character_raid_gold(
    state: &WeeklyState,
    catalog: &RaidCatalog,
) -> Result<Gold, GoldError> {
    let mut total = Gold::zero();
    for (name, completion) in &state.raids {
        let Some(entry) = catalog.lookup(name) else {
            continue;
        };
        total += activity_gold(
            name,
            &entry.stages,
            completion,
            state.surcharge_elected(name),
        )?;
    }
    Ok(total)
}

/// Raid gold plus the character's manual adjustment.
pub fn character_gold(state: &WeeklyState, catalog: &RaidCatalog) -> Result<Gold, GoldError> {
    Ok(character_raid_gold(state, catalog)? + state.additional_gold)
}

// ---------------------------------------------------------------------------
// Per-account
// ---------------------------------------------------------------------------

/// Account-level totals for the current cycle, split the way the history
/// snapshot records them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTotals {
    pub raid_gold: Gold,
    pub additional_gold: Gold,
    pub total_gold: Gold,
    pub character_count: u32,
}

/// Totals across all tracked characters. A character without a checklist
/// entry contributes nothing.
pub fn account_totals(
    characters: &[Character],
    checklist: &BTreeMap<String, WeeklyState>,
    catalog: &RaidCatalog,
) -> Result<AccountTotals, GoldError> {
    let mut raid_gold = Gold::zero();
    let mut additional_gold = Gold::zero();

    for character in characters {
        let Some(state) = checklist.get(&character.name) else {
            continue;
        };
        raid_gold += character_raid_gold(state, catalog)?;
        additional_gold += state.additional_gold;
    }

    Ok(AccountTotals {
        raid_gold,
        additional_gold,
        total_gold: raid_gold + additional_gold,
        character_count: characters.len() as u32,
    })
}

/// This cycle's projected account total. The single source for that number.
pub fn account_gold(
    characters: &[Character],
    checklist: &BTreeMap<String, WeeklyState>,
    catalog: &RaidCatalog,
) -> Result<Gold, GoldError> {
    Ok(account_totals(characters, checklist, catalog)?.total_gold)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RaidEntry;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn four_stage_entry() -> RaidEntry {
        RaidEntry {
            name: "Brelshaza Normal".to_string(),
            required_level: 1490.0,
            stages: (0..4)
                .map(|_| RaidStage {
                    gold: Gold::from_i64(1000),
                    surcharge: Gold::from_i64(300),
                })
                .collect(),
        }
    }

    fn catalog() -> RaidCatalog {
        RaidCatalog::new([four_stage_entry()])
    }

    fn character(name: &str) -> Character {
        Character {
            name: name.to_string(),
            server: "Nineveh".to_string(),
            r#class: "Bard".to_string(),
            item_level: 1540.0,
            combat_level: 60,
            image_url: None,
            last_updated: Utc.with_ymd_and_hms(2026, 8, 19, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn worked_example_base_and_surcharge() {
        // 4 stages, base 1000, surcharge 300, first 2 checked.
        let entry = four_stage_entry();
        let completion = [true, true, false, false];

        let base = activity_gold(&entry.name, &entry.stages, &completion, false).expect("base");
        assert_eq!(base, Gold(dec!(2000)));

        let elected = activity_gold(&entry.name, &entry.stages, &completion, true).expect("elected");
        assert_eq!(elected, Gold(dec!(1400)));
    }

    #[test]
    fn stage_count_mismatch_fails_fast() {
        let entry = four_stage_entry();
        let err = activity_gold(&entry.name, &entry.stages, &[true, true], false)
            .expect_err("mismatched lengths must error");
        assert!(matches!(
            err,
            GoldError::StageCountMismatch {
                expected: 4,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn character_gold_skips_unresolved_names() {
        let mut state = WeeklyState::empty();
        state
            .raids
            .insert("Brelshaza Normal".to_string(), vec![true, true, true, true]);
        // A raid removed from the catalog: skipped, not an error.
        state
            .raids
            .insert("Retired Raid".to_string(), vec![true, true]);
        state.additional_gold = Gold::from_i64(500);

        let total = character_gold(&state, &catalog()).expect("total");
        assert_eq!(total, Gold(dec!(4500)));
    }

    #[test]
    fn per_activity_election_beats_nothing_elected() {
        let mut state = WeeklyState::empty();
        state
            .raids
            .insert("Brelshaza Normal".to_string(), vec![true; 4]);
        state
            .raid_more_gold_exclude
            .insert("Brelshaza Normal".to_string(), true);

        let total = character_raid_gold(&state, &catalog()).expect("total");
        assert_eq!(total, Gold(dec!(2800))); // 4 * (1000 - 300)
    }

    #[test]
    fn account_gold_is_sum_of_character_gold() {
        let characters = vec![character("Alpha"), character("Beta"), character("Gamma")];
        let mut checklist = BTreeMap::new();

        let mut a = WeeklyState::empty();
        a.raids
            .insert("Brelshaza Normal".to_string(), vec![true, true, false, false]);
        checklist.insert("Alpha".to_string(), a);

        let mut b = WeeklyState::empty();
        b.additional_gold = Gold::from_i64(750);
        checklist.insert("Beta".to_string(), b);
        // Gamma has no checklist entry at all.

        let cat = catalog();
        let by_hand: Gold = characters
            .iter()
            .filter_map(|c| checklist.get(&c.name))
            .map(|s| character_gold(s, &cat).expect("character"))
            .sum();

        let account = account_gold(&characters, &checklist, &cat).expect("account");
        assert_eq!(account, by_hand);
        assert_eq!(account, Gold(dec!(2750)));
    }

    #[test]
    fn account_totals_split_matches_total() {
        let characters = vec![character("Alpha")];
        let mut checklist = BTreeMap::new();
        let mut a = WeeklyState::empty();
        a.raids
            .insert("Brelshaza Normal".to_string(), vec![true; 4]);
        a.additional_gold = Gold::from_i64(1200);
        checklist.insert("Alpha".to_string(), a);

        let totals = account_totals(&characters, &checklist, &catalog()).expect("totals");
        assert_eq!(totals.raid_gold, Gold(dec!(4000)));
        assert_eq!(totals.additional_gold, Gold(dec!(1200)));
        assert_eq!(totals.total_gold, totals.raid_gold + totals.additional_gold);
        assert_eq!(totals.character_count, 1);
    }

    #[test]
    fn empty_account_is_zero() {
        let totals = account_totals(&[], &BTreeMap::new(), &catalog()).expect("totals");
        assert!(totals.total_gold.is_zero());
        assert_eq!(totals.character_count, 0);
    }
}
