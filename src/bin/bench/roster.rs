// Synthetic accounts and the randomized cycle driver.
// Every random choice flows through one seedable ChaCha8Rng per account, so
// any failing account is reproducible from its seed alone.

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;

use ledger_engine::catalog::{CommonActivity, CommonCatalog, RaidCatalog, RaidEntry, RaidStage};
use ledger_engine::checklist::SingleContent;
use ledger_engine::{
    Character, DailyContent, Gold, TrackerEngine, DAYS_PER_CYCLE, REST_CAP, REST_STEP,
};

use crate::report::AccountResult;

// ─── Fixture Catalogs ───────────────────────────────────────────────────────

const SERVERS: [&str; 4] = ["Nineveh", "Lazenith", "Karta", "Abrelshud"];
const CLASSES: [&str; 6] = [
    "Berserker",
    "Sorceress",
    "Gunslinger",
    "Bard",
    "Shadowhunter",
    "Artillerist",
];

fn raid(name: &str, level: f64, stages: &[(i64, i64)]) -> RaidEntry {
    RaidEntry {
        name: name.to_string(),
        required_level: level,
        stages: stages
            .iter()
            .map(|&(gold, surcharge)| RaidStage {
                gold: Gold::from_i64(gold),
                surcharge: Gold::from_i64(surcharge),
            })
            .collect(),
    }
}

pub fn bench_raid_catalog() -> RaidCatalog {
    RaidCatalog::new([
        raid("Argos", 1370.0, &[(300, 100), (300, 150), (400, 150)]),
        raid("Valtan Normal", 1415.0, &[(500, 300), (700, 400)]),
        raid("Valtan Hard", 1445.0, &[(700, 450), (1100, 600)]),
        raid("Vykas Hard", 1460.0, &[(900, 500), (1500, 650)]),
        raid("Kakul-Saydon", 1475.0, &[(600, 300), (900, 500), (1500, 700)]),
        raid(
            "Brelshaza Normal",
            1490.0,
            &[(1000, 400), (1000, 400), (1000, 500), (2000, 800)],
        ),
        raid(
            "Brelshaza Hard",
            1540.0,
            &[(1200, 500), (1200, 500), (1200, 600), (2400, 900)],
        ),
    ])
}

pub fn bench_common_catalog() -> CommonCatalog {
    CommonCatalog::new([
        CommonActivity {
            name: "Field Boss".to_string(),
            days: [false, true, false, true, false, true, false],
            max_checks: Some(3),
        },
        CommonActivity {
            name: "Chaos Gate".to_string(),
            days: [true, false, true, false, true, false, true],
            max_checks: None,
        },
    ])
}

// ─── Roster Generation ──────────────────────────────────────────────────────

pub fn roster(rng: &mut ChaCha8Rng, account: usize) -> Vec<Character> {
    let size = rng.gen_range(1..=6);
    (0..size)
        .map(|i| Character {
            name: format!("Acct{account}-{}", CLASSES[i % CLASSES.len()]),
            server: SERVERS[rng.gen_range(0..SERVERS.len())].to_string(),
            r#class: CLASSES[i % CLASSES.len()].to_string(),
            item_level: rng.gen_range(1380.0..1620.0),
            combat_level: rng.gen_range(50..=60),
            image_url: None,
            last_updated: first_boundary(),
        })
        .collect()
}

/// 2026-01-07 is a Wednesday; noon UTC is past that day's 06:00 UTC+9
/// boundary, so this instant sits just inside a fresh cycle.
pub fn first_boundary() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 7, 12, 0, 0).unwrap()
}

// ─── Cycle Driver ───────────────────────────────────────────────────────────

/// Apply one cycle's worth of random user activity. Returns the number of
/// mutations issued through the facade.
fn mutate_cycle(engine: &mut TrackerEngine, rng: &mut ChaCha8Rng, roster: &[Character]) -> u64 {
    let mut mutations = 0u64;

    for character in roster {
        let eligible: Vec<String> = engine
            .raid_catalog()
            .eligible_for(character.item_level)
            .map(|e| e.name.clone())
            .collect();

        for _ in 0..rng.gen_range(0..=3) {
            if eligible.is_empty() {
                break;
            }
            let name = &eligible[rng.gen_range(0..eligible.len())];
            if rng.gen_bool(0.25) {
                engine.toggle_surcharge(&character.name, name);
                mutations += 1;
            }
            engine
                .toggle_raid(&character.name, name)
                .expect("catalog name");
            mutations += 1;
        }

        for field in [DailyContent::ChaosDungeon, DailyContent::GuardianRaid] {
            let gauge = rng.gen_range(0..=REST_CAP / REST_STEP) * REST_STEP;
            engine.set_rest_gauge(&character.name, field, gauge);
            mutations += 1;
            for day in 0..DAYS_PER_CYCLE {
                if rng.gen_bool(0.4) {
                    engine.toggle_daily_check(&character.name, field, day);
                    mutations += 1;
                }
            }
        }

        if rng.gen_bool(0.3) {
            engine.toggle_single(&character.name, SingleContent::Paradise);
            mutations += 1;
        }
        if rng.gen_bool(0.3) {
            engine.toggle_single(&character.name, SingleContent::SandOfTime);
            mutations += 1;
        }
        if rng.gen_bool(0.5) {
            let amount = Gold::from_i64(rng.gen_range(0..2000));
            engine.set_additional_gold(&character.name, amount);
            mutations += 1;
        }
    }

    for activity in ["Field Boss", "Chaos Gate"] {
        for day in 0..DAYS_PER_CYCLE {
            if rng.gen_bool(0.25) && engine.toggle_common_check(day, activity) {
                mutations += 1;
            }
        }
    }

    mutations
}

fn gold_f64(gold: Gold) -> f64 {
    gold.0.to_f64().unwrap_or(0.0)
}

/// Drive one account through `cycles` full weekly cycles, checking the
/// accounting invariants after every cycle.
pub fn run_account(account: usize, cycles: usize, base_seed: u64) -> AccountResult {
    let start = Instant::now();
    let seed = base_seed.wrapping_add(account as u64 * 7919);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut engine = TrackerEngine::new(bench_raid_catalog(), bench_common_catalog());
    let roster = roster(&mut rng, account);
    engine.set_characters(roster.clone());

    let mut now = first_boundary();
    engine.try_weekly_reset(now).expect("initial stamp");

    let mut mutations = 0u64;
    let mut rolls = 0u64;
    let mut recorded_cycles = 0u64;
    let mut zero_cycles = 0u64;
    let mut additivity_violations = 0u64;
    let mut rollup_violations = 0u64;
    let mut idempotence_violations = 0u64;
    let mut history_violations = 0u64;
    let mut round_trip_violations = 0u64;
    let mut weekly_samples = Vec::with_capacity(cycles);

    for _ in 0..cycles {
        mutations += mutate_cycle(&mut engine, &mut rng, &roster);

        // Totals must decompose exactly, and the account figure must equal
        // the per-character rollup.
        let totals = engine.account_totals().expect("totals");
        if totals.total_gold != totals.raid_gold + totals.additional_gold {
            additivity_violations += 1;
        }
        let rollup: Gold = roster
            .iter()
            .map(|c| engine.character_gold(&c.name).expect("character gold"))
            .sum();
        if rollup != totals.total_gold {
            rollup_violations += 1;
        }

        // Exported profile must reload into the same figures without
        // triggering a spurious cycle roll.
        let exported = engine.export_profile_json().expect("export");
        let mut reloaded = TrackerEngine::new(bench_raid_catalog(), bench_common_catalog());
        let rolled_on_reload = reloaded.load_profile_json(&exported, now).expect("reload");
        if rolled_on_reload || reloaded.account_gold().expect("reloaded gold") != totals.total_gold
        {
            round_trip_violations += 1;
        }

        weekly_samples.push(gold_f64(totals.total_gold));
        let positive = totals.total_gold.is_positive();
        let history_before = engine.profile().weekly_gold_history.len();

        // Cross the boundary: the transition must apply exactly once.
        now += Duration::days(7);
        if engine.try_weekly_reset(now).expect("roll") {
            rolls += 1;
        } else {
            idempotence_violations += 1;
        }
        if engine.try_weekly_reset(now).expect("re-roll") {
            idempotence_violations += 1;
        }

        // One record per positive cycle, none for zero cycles, and the fresh
        // cycle must read zero.
        let grew = engine.profile().weekly_gold_history.len() - history_before;
        if grew != usize::from(positive) {
            history_violations += 1;
        }
        if positive {
            recorded_cycles += 1;
        } else {
            zero_cycles += 1;
        }
        if !engine.account_gold().expect("post-roll gold").is_zero() {
            history_violations += 1;
        }
    }

    let history = &engine.profile().weekly_gold_history;
    let unique_keys: BTreeSet<&str> = history.iter().map(|r| r.week_start.as_str()).collect();
    if unique_keys.len() != history.len() {
        history_violations += 1;
    }

    let peak = weekly_samples.iter().cloned().fold(0.0_f64, f64::max);
    let mean = if weekly_samples.is_empty() {
        0.0
    } else {
        weekly_samples.iter().sum::<f64>() / weekly_samples.len() as f64
    };

    let mut result = AccountResult {
        account,
        seed,
        roster_size: roster.len(),
        cycles,
        mutations,
        rolls,
        history_len: history.len(),
        recorded_cycles,
        zero_cycles,
        peak_weekly_gold: peak,
        mean_weekly_gold: mean,
        additivity_violations,
        rollup_violations,
        idempotence_violations,
        history_violations,
        round_trip_violations,
        elapsed_ms: start.elapsed().as_millis(),
        pass: false,
    };
    result.pass = result.violation_total() == 0;
    result
}
