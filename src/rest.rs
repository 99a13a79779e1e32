// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Weekly Ledger Engine - Rest Pool Replay

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{DailyContentState, DAYS_PER_CYCLE, REST_COST};

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Outcome of replaying one cycle's daily checks against a rest pool.
///
/// `remaining` and `consumed` come from the same single pass, so the two can
/// never disagree about which days drew from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestReplay {
    /// Pool left after all seven days are replayed.
    pub remaining: u32,
    /// Which specific days drew [`REST_COST`] from the pool.
    pub consumed: [bool; DAYS_PER_CYCLE],
}

/// Replay days 0..6 in index order against the stored pool.
///
/// A checked day with at least [`REST_COST`] in the running pool consumes
/// [`REST_COST`]; otherwise the pool is left unchanged and the day gains no
/// benefit (but stays marked complete). Deterministic, never mutates its
/// argument, never returns a pool larger than the input.
pub fn replay_rest(state: &DailyContentState) -> RestReplay {
    let mut pool = state.rest_gauge;
    let mut consumed = [false; DAYS_PER_CYCLE];

    for (day, checked) in state.checks.iter().enumerate() {
        if *checked && pool >= REST_COST {
            pool -= REST_COST;
            consumed[day] = true;
        }
    }

    RestReplay {
        remaining: pool,
        consumed,
    }
}

/// The pool remaining after this cycle's consumption is replayed.
pub fn compute_current_rest(state: &DailyContentState) -> u32 {
    replay_rest(state).remaining
}

/// Charges shown to the user: pool / 20, possibly fractional (a pool of 10
/// displays as 0.5 charges).
pub fn charges(pool: u32) -> Decimal {
    Decimal::from(pool) / Decimal::from(REST_COST)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
